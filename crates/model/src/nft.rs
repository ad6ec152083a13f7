/// One NFT held by an address, with whatever metadata has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftRecord {
    /// Fully-qualified asset id: `<address>.<contract>::<asset>`.
    pub asset_identifier: String,
    /// Token value within the asset class, as rendered by the API.
    pub token_id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl NftRecord {
    /// A record carrying only on-chain identity, no resolved metadata.
    pub fn bare(asset_identifier: String, token_id: String, asset_name: String) -> Self {
        NftRecord {
            asset_identifier,
            token_id,
            name: asset_name,
            description: String::new(),
            image_url: String::new(),
        }
    }
}
