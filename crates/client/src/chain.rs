use crate::api::accounts::AccountBalances;
use crate::api::metadata::{FtMetadataResponse, NftMetadataResponse};
use crate::api::nfts::NftHoldingsPage;
use crate::api::transactions::{BroadcastCheck, TransactionResponse, parse_txid};
use crate::http::{HttpClient, build_url, http_url_from};
use crate::retry::{NoRetry, RetryStrategy};
use model::error::ApiError;
use model::metadata::TokenMetadata;
use model::network::{Network, NetworkProfile};
use model::transaction::{PreparedTransaction, TransactionInfo};
use std::sync::Arc;
use tracing::{debug, info};

/// Typed access to one chain's web API.
///
/// Network specifics are plain data on the profile; the same client type
/// serves mainnet, testnet and custom deployments. The transport and the
/// default retry strategy are injected so callers control pooling and
/// pacing process-wide.
pub struct ChainClient {
    profile: NetworkProfile,
    http: Arc<HttpClient>,
    retry: Arc<dyn RetryStrategy>,
}

impl ChainClient {
    pub fn new(network: &Network, http: Arc<HttpClient>) -> Self {
        ChainClient {
            profile: network.profile(),
            http,
            retry: Arc::new(NoRetry),
        }
    }

    /// Replaces the default per-request strategy for API reads.
    pub fn with_retry(mut self, retry: Arc<dyn RetryStrategy>) -> Self {
        self.retry = retry;
        self
    }

    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.profile.base_url)
    }

    /// Native and per-token balances for one principal.
    pub async fn balances(&self, principal: &str) -> Result<AccountBalances, ApiError> {
        let url = self.endpoint(&format!("/extended/v1/address/{principal}/balances"));
        let body = self.http.get(&url, self.retry.as_ref()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// One page of NFT holdings for a principal, optionally filtered to a
    /// single asset class.
    pub async fn nft_holdings(
        &self,
        principal: &str,
        asset_identifier: Option<&str>,
        limit: usize,
        offset: u64,
    ) -> Result<NftHoldingsPage, ApiError> {
        let url = build_url(
            &self.endpoint("/extended/v1/tokens/nft/holdings"),
            &[
                ("principal", Some(principal.to_string())),
                (
                    "asset_identifiers",
                    asset_identifier.map(|id| id.to_string()),
                ),
                ("limit", Some(limit.to_string())),
                ("offset", Some(offset.to_string())),
            ],
        )?;
        let body = self.http.get(&url, self.retry.as_ref()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Raw indexer metadata for a fungible token contract.
    pub async fn ft_metadata(&self, contract_id: &str) -> Result<FtMetadataResponse, ApiError> {
        let url = self.endpoint(&format!("/metadata/v1/ft/{contract_id}"));
        let body = self.http.get(&url, self.retry.as_ref()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Indexer metadata for one NFT.
    pub async fn nft_metadata(
        &self,
        contract_id: &str,
        token_id: &str,
    ) -> Result<NftMetadataResponse, ApiError> {
        let url = self.endpoint(&format!("/metadata/v1/nft/{contract_id}/{token_id}"));
        let body = self.http.get(&url, self.retry.as_ref()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolved token metadata: indexer fields first, then the off-chain
    /// metadata file behind `token_uri` for anything still missing.
    pub async fn token_metadata(&self, contract_id: &str) -> Result<TokenMetadata, ApiError> {
        let raw = self.ft_metadata(contract_id).await?;
        let mut meta = TokenMetadata {
            currency: raw.symbol.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            image: raw.image(),
            decimals: raw.decimals.unwrap_or(0),
        };

        if meta.image.is_none()
            && let Some(token_uri) = raw.token_uri.as_deref().filter(|uri| !uri.is_empty())
        {
            // Best effort: a dead metadata file must not fail the lookup.
            match self.http.get(&http_url_from(token_uri), &NoRetry).await {
                Ok(body) => {
                    let file = TokenMetadata::from_json(&body);
                    if meta.description.is_none() {
                        meta.description = file.description;
                    }
                    meta.image = file.image;
                }
                Err(err) => {
                    debug!(contract_id, %err, "token uri fetch failed");
                }
            }
        }

        Ok(meta)
    }

    /// Submits a signed transaction; returns its txid.
    pub async fn broadcast(&self, tx: &PreparedTransaction) -> Result<String, ApiError> {
        let url = self.endpoint("/v2/transactions");
        let body = self
            .http
            .post_bytes(&url, tx.payload.clone(), &BroadcastCheck)
            .await?;
        let txid = parse_txid(&body)?;
        info!(txid, sender = tx.sender, fee = tx.fee, nonce = tx.nonce, "transaction broadcast");
        Ok(txid)
    }

    /// Latest remote status of a submitted transaction.
    pub async fn transaction_status(&self, txid: &str) -> Result<TransactionInfo, ApiError> {
        let url = self.endpoint(&format!("/extended/v1/tx/0x{}", txid.trim_start_matches("0x")));
        let body = self.http.get(&url, self.retry.as_ref()).await?;
        let response: TransactionResponse = serde_json::from_str(&body)?;
        Ok(response.into_info())
    }
}
