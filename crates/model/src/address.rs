/// Fully-qualified fungible token id: `<address>.<contract>::<token>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenId {
    pub address: String,
    pub contract: String,
    pub token: String,
}

impl TokenId {
    /// Contract principal (`<address>.<contract>`) owning this token.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.address, self.contract)
    }

    pub fn full_id(&self) -> String {
        format!("{}.{}::{}", self.address, self.contract, self.token)
    }
}

/// Parses `<address>.<contract>::<token>` into its parts.
pub fn parse_full_token_id(full_id: &str) -> Option<TokenId> {
    let (contract_id, token) = full_id.split_once("::")?;
    let (address, contract) = parse_contract_id(contract_id)?;
    if token.is_empty() {
        return None;
    }
    Some(TokenId {
        address,
        contract,
        token: token.to_string(),
    })
}

/// Parses a contract principal `<address>.<contract>`.
pub fn parse_contract_id(contract_id: &str) -> Option<(String, String)> {
    let (address, contract) = contract_id.split_once('.')?;
    if !is_valid_principal(address) || contract.is_empty() || contract.contains('.') {
        return None;
    }
    Some((address.to_string(), contract.to_string()))
}

/// Basic shape check for a standard C32 principal.
///
/// Does not verify the checksum; the remote API is the authority on that.
pub fn is_valid_principal(address: &str) -> bool {
    const C32_ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";
    address.len() > 2
        && address.starts_with('S')
        && address.chars().all(|c| C32_ALPHABET.contains(c))
}
