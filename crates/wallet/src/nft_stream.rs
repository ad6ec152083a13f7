use async_trait::async_trait;
use client::chain::ChainClient;
use model::nft::NftRecord;
use std::sync::Arc;
use stream::error::StreamError;
use stream::lazy::RangeSource;
use tracing::debug;

/// Range source over the NFT holdings endpoint for one principal.
///
/// With `resolve_metadata` set, each holding's display metadata is fetched
/// as well; lookups that fail leave a bare record rather than failing the
/// page.
pub struct NftHoldingsSource {
    chain: Arc<ChainClient>,
    principal: String,
    asset_identifier: Option<String>,
    resolve_metadata: bool,
}

impl NftHoldingsSource {
    pub fn new(
        chain: Arc<ChainClient>,
        principal: String,
        asset_identifier: Option<String>,
        resolve_metadata: bool,
    ) -> Self {
        NftHoldingsSource {
            chain,
            principal,
            asset_identifier,
            resolve_metadata,
        }
    }
}

#[async_trait]
impl RangeSource<NftRecord> for NftHoldingsSource {
    async fn fetch_range(
        &mut self,
        offset: u64,
        count: usize,
    ) -> Result<Vec<NftRecord>, StreamError> {
        let page = self
            .chain
            .nft_holdings(
                &self.principal,
                self.asset_identifier.as_deref(),
                count,
                offset,
            )
            .await
            .map_err(StreamError::from)?;

        let mut records = Vec::with_capacity(page.results.len());
        for holding in page.results {
            let token_id = holding.token_id();
            let asset_name = holding
                .identity()
                .map(|(_, _, asset)| asset)
                .unwrap_or_default();
            let mut record =
                NftRecord::bare(holding.asset_identifier.clone(), token_id, asset_name);

            if self.resolve_metadata
                && let Some((address, contract, _)) = holding.identity()
            {
                let contract_id = format!("{address}.{contract}");
                match self.chain.nft_metadata(&contract_id, &record.token_id).await {
                    Ok(response) => {
                        if let Some(meta) = response.metadata {
                            record.image_url = meta.image().unwrap_or_default();
                            if let Some(name) = meta.name {
                                record.name = name;
                            }
                            record.description = meta.description.unwrap_or_default();
                        }
                    }
                    Err(err) => {
                        debug!(asset = holding.asset_identifier, %err, "nft metadata lookup failed");
                    }
                }
            }

            records.push(record);
        }
        Ok(records)
    }
}
