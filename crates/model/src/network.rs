/// Target chain selection.
///
/// Network-specific behavior is carried as data on the profile rather than
/// as separate client types, so one client implementation serves every
/// network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Custom {
        name: String,
        base_url: String,
        address_version: u8,
    },
}

/// Resolved parameters for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    /// Base URL of the chain web API, without a trailing slash.
    pub base_url: String,
    /// Single-sig address version byte. Address rendering lives behind the
    /// signer seam; implementations take this from the profile.
    pub address_version: u8,
}

impl Network {
    pub fn profile(&self) -> NetworkProfile {
        match self {
            Network::Mainnet => NetworkProfile {
                name: "mainnet".to_string(),
                base_url: "https://api.hiro.so".to_string(),
                address_version: 22,
            },
            Network::Testnet => NetworkProfile {
                name: "testnet".to_string(),
                base_url: "https://api.testnet.hiro.so".to_string(),
                address_version: 26,
            },
            Network::Custom {
                name,
                base_url,
                address_version,
            } => NetworkProfile {
                name: name.clone(),
                base_url: base_url.trim_end_matches('/').to_string(),
                address_version: *address_version,
            },
        }
    }
}
