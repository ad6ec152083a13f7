use crate::{address, metadata::TokenMetadata};

/// Descriptive data for one fungible token class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FungibleTokenData {
    pub code: String,
    pub description: String,
    pub image_url: String,
    pub decimals: u32,
    /// Fully-qualified token id; empty for the native token.
    pub full_id: String,
}

impl FungibleTokenData {
    /// The chain's native token.
    pub fn native() -> Self {
        FungibleTokenData {
            code: "STX".to_string(),
            description: "Stacks blockchain token".to_string(),
            image_url: String::new(),
            decimals: 6,
            full_id: String::new(),
        }
    }

    /// Builds token data from resolved metadata, falling back to parts of
    /// the token id for fields the metadata does not carry.
    pub fn from_metadata(full_id: &str, meta: &TokenMetadata) -> Self {
        let token_name = address::parse_full_token_id(full_id)
            .map(|id| id.token)
            .unwrap_or_default();
        let code = meta
            .currency
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or(token_name);
        let description = meta
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| meta.name.clone())
            .unwrap_or_default();
        FungibleTokenData {
            code,
            description,
            image_url: meta.image.clone().unwrap_or_default(),
            decimals: meta.decimals,
            full_id: full_id.to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.full_id.is_empty()
    }

    pub fn format_amount(&self, amount: u64) -> String {
        format_balance(amount, self.decimals, &self.code)
    }
}

/// A balance of one fungible token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FungibleToken {
    pub balance: u64,
    pub data: FungibleTokenData,
}

impl FungibleToken {
    pub fn new(balance: u64, data: FungibleTokenData) -> Self {
        FungibleToken { balance, data }
    }

    pub fn format(&self) -> String {
        self.data.format_amount(self.balance)
    }
}

/// Renders a raw unit count as a decimal amount with its currency code.
pub fn format_balance(amount: u64, decimals: u32, code: &str) -> String {
    if decimals == 0 {
        return format!("{amount} {code}");
    }
    let scale = 10u64.pow(decimals.min(19));
    let whole = amount / scale;
    let frac = amount % scale;
    let frac = format!("{frac:0width$}", width = decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole} {code}")
    } else {
        format!("{whole}.{frac} {code}")
    }
}
