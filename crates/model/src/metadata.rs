use serde::Deserialize;
use tracing::debug;

/// Resolved token metadata, independent of where it was fetched from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMetadata {
    pub currency: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub decimals: u32,
}

/// Shape of an off-chain metadata JSON file referenced by a token URI.
#[derive(Debug, Default, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    properties: Option<MetadataFileProperties>,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataFileProperties {
    #[serde(default)]
    description: Option<String>,
}

impl TokenMetadata {
    /// Parses a metadata JSON file, degrading to an empty record on
    /// malformed payloads rather than failing the caller.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<MetadataFile>(raw) {
            Ok(file) => {
                let description = file
                    .description
                    .or_else(|| file.properties.and_then(|p| p.description));
                TokenMetadata {
                    currency: None,
                    name: file.name,
                    description,
                    image: file.image,
                    decimals: 0,
                }
            }
            Err(err) => {
                debug!(%err, "failed to parse token metadata file");
                TokenMetadata::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.currency.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_metadata_file() {
        let meta = TokenMetadata::from_json(
            r#"{"name":"Wrapped Foo","image":"ipfs://abc","properties":{"description":"A token"}}"#,
        );
        assert_eq!(meta.name.as_deref(), Some("Wrapped Foo"));
        assert_eq!(meta.description.as_deref(), Some("A token"));
        assert_eq!(meta.image.as_deref(), Some("ipfs://abc"));
    }

    #[test]
    fn top_level_description_wins() {
        let meta = TokenMetadata::from_json(
            r#"{"description":"top","properties":{"description":"nested"}}"#,
        );
        assert_eq!(meta.description.as_deref(), Some("top"));
    }

    #[test]
    fn malformed_json_yields_empty_record() {
        let meta = TokenMetadata::from_json("not json at all");
        assert!(meta.is_empty());
    }
}
