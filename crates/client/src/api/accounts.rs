use crate::api::u64_from_string;
use serde::Deserialize;
use std::collections::HashMap;

/// Response of the address balances endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountBalances {
    pub stx: StxBalance,
    #[serde(default)]
    pub fungible_tokens: HashMap<String, TokenBalance>,
    #[serde(default)]
    pub non_fungible_tokens: HashMap<String, NftBalance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StxBalance {
    #[serde(deserialize_with = "u64_from_string")]
    pub balance: u64,
    #[serde(default, deserialize_with = "u64_from_string")]
    pub locked: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenBalance {
    #[serde(deserialize_with = "u64_from_string")]
    pub balance: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftBalance {
    #[serde(deserialize_with = "u64_from_string")]
    pub count: u64,
}
