use serde::Deserialize;

/// Response of the fungible-token metadata endpoint. Every field is
/// optional; the indexer returns whatever it has managed to resolve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FtMetadataResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub image_canonical_uri: Option<String>,
}

impl FtMetadataResponse {
    /// Preferred image URL, if any was indexed.
    pub fn image(&self) -> Option<String> {
        self.image_uri
            .clone()
            .filter(|uri| !uri.is_empty())
            .or_else(|| {
                self.image_canonical_uri
                    .clone()
                    .filter(|uri| !uri.is_empty())
            })
    }
}

/// Response of the NFT metadata endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NftMetadataResponse {
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub metadata: Option<NftMetadataPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NftMetadataPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cached_image: Option<String>,
}

impl NftMetadataPayload {
    pub fn image(&self) -> Option<String> {
        self.cached_image
            .clone()
            .filter(|uri| !uri.is_empty())
            .or_else(|| self.image.clone().filter(|uri| !uri.is_empty()))
    }
}
