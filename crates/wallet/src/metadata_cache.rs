use client::chain::ChainClient;
use futures::FutureExt;
use model::address;
use model::error::ApiError;
use model::token::FungibleTokenData;
use std::sync::Arc;
use stream::memo::MemoCache;
use tracing::warn;

/// Memoizing token-metadata lookup keyed by full token id.
///
/// Each id is resolved against the chain at most once per cache lifetime;
/// concurrent lookups for the same id share one in-flight resolution. A
/// failed resolution is evicted, so transient API errors stay retryable.
pub struct TokenMetadataCache {
    cache: MemoCache<String, FungibleTokenData>,
}

impl TokenMetadataCache {
    pub fn new(chain: Arc<ChainClient>) -> Self {
        let cache = MemoCache::new(move |full_id: String| {
            let chain = chain.clone();
            async move {
                let token = address::parse_full_token_id(&full_id)
                    .ok_or_else(|| ApiError::Logical(format!("invalid token id: {full_id}")))?;
                let meta = chain.token_metadata(&token.contract_id()).await?;
                Ok(FungibleTokenData::from_metadata(&full_id, &meta))
            }
            .boxed()
        });
        TokenMetadataCache { cache }
    }

    pub async fn get(&self, full_id: &str) -> Result<FungibleTokenData, ApiError> {
        self.cache.get(full_id.to_string()).await
    }

    /// Best-effort lookup: on failure, a display record derived from the
    /// token id itself so listings can still render.
    pub async fn get_or_fallback(&self, full_id: &str) -> FungibleTokenData {
        match self.get(full_id).await {
            Ok(data) => data,
            Err(err) => {
                warn!(full_id, %err, "metadata lookup failed, using fallback record");
                fallback_record(full_id)
            }
        }
    }
}

fn fallback_record(full_id: &str) -> FungibleTokenData {
    let code = address::parse_full_token_id(full_id)
        .map(|id| id.token)
        .unwrap_or_else(|| full_id.to_string());
    FungibleTokenData {
        code,
        description: String::new(),
        image_url: String::new(),
        decimals: 0,
        full_id: full_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_uses_token_name_when_parsable() {
        let record =
            fallback_record("SP2C2YFP12AJZB4MABJBAJ55XECVS7E4PMMZ89YZR.usda-token::usda");
        assert_eq!(record.code, "usda");
        assert_eq!(record.decimals, 0);
    }

    #[test]
    fn fallback_uses_raw_id_otherwise() {
        let record = fallback_record("garbage-id");
        assert_eq!(record.code, "garbage-id");
    }
}
