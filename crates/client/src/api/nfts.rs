use model::address;
use serde::Deserialize;

/// One page of the NFT holdings endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NftHoldingsPage {
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
    pub results: Vec<NftHolding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftHolding {
    /// `<address>.<contract>::<asset>`.
    pub asset_identifier: String,
    pub value: NftValue,
    #[serde(default)]
    pub block_height: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftValue {
    #[serde(default)]
    pub hex: String,
    /// Clarity value rendering, e.g. `u1234` for uint ids.
    pub repr: String,
}

impl NftHolding {
    /// Owner address, contract name and asset name from the identifier.
    pub fn identity(&self) -> Option<(String, String, String)> {
        let id = address::parse_full_token_id(&self.asset_identifier)?;
        Some((id.address, id.contract, id.token))
    }

    /// Token id with the Clarity uint sigil stripped.
    pub fn token_id(&self) -> String {
        self.value
            .repr
            .strip_prefix('u')
            .filter(|rest| rest.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(&self.value.repr)
            .to_string()
    }
}
