use crate::error::WalletError;
use crate::metadata_cache::TokenMetadataCache;
use crate::nft_stream::NftHoldingsSource;
use crate::observer::{BalanceChange, ObserverRegistry};
use crate::tracker::{TrackerState, TransactionTracker};
use client::chain::ChainClient;
use model::address;
use model::error::ApiError;
use model::nft::NftRecord;
use model::token::{FungibleToken, FungibleTokenData};
use std::sync::Arc;
use stream::cached::CachedStream;
use stream::lazy::LazyStream;

/// Read-only view of one address: balances, tokens and NFT holdings.
pub struct WalletInfo {
    chain: Arc<ChainClient>,
    metadata: Arc<TokenMetadataCache>,
    address: String,
    observers: ObserverRegistry,
}

impl WalletInfo {
    /// Fails on addresses that are neither standard principals nor
    /// contract principals.
    pub fn new(
        chain: Arc<ChainClient>,
        metadata: Arc<TokenMetadataCache>,
        address: String,
    ) -> Result<Self, WalletError> {
        let valid = address::is_valid_principal(&address)
            || address::parse_contract_id(&address).is_some();
        if !valid {
            return Err(WalletError::InvalidAddress(address));
        }
        Ok(WalletInfo {
            chain,
            metadata,
            address,
            observers: ObserverRegistry::new(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// Balance of one token: the native token when `token_id` is empty,
    /// otherwise the fungible token with that full id. `None` when the
    /// address holds no such token.
    pub async fn token(&self, token_id: &str) -> Result<Option<FungibleToken>, ApiError> {
        let balances = self.chain.balances(&self.address).await?;

        if token_id.is_empty() || token_id == FungibleTokenData::native().code {
            let native = FungibleToken::new(balances.stx.balance, FungibleTokenData::native());
            return Ok(Some(native));
        }

        match balances.fungible_tokens.get(token_id) {
            Some(entry) => {
                let data = self.metadata.get_or_fallback(token_id).await;
                Ok(Some(FungibleToken::new(entry.balance, data)))
            }
            None => Ok(None),
        }
    }

    /// The native balance plus every fungible token with a non-zero
    /// balance, metadata resolved best-effort.
    pub async fn all_tokens(&self) -> Result<Vec<FungibleToken>, ApiError> {
        let balances = self.chain.balances(&self.address).await?;

        let mut tokens = Vec::with_capacity(1 + balances.fungible_tokens.len());
        tokens.push(FungibleToken::new(
            balances.stx.balance,
            FungibleTokenData::native(),
        ));

        for (full_id, entry) in &balances.fungible_tokens {
            if entry.balance == 0 {
                continue;
            }
            let data = self.metadata.get_or_fallback(full_id).await;
            tokens.push(FungibleToken::new(entry.balance, data));
        }
        Ok(tokens)
    }

    /// Refreshes a tracker through this wallet, telling balance observers
    /// when the transaction lands in an anchored block. The fee alone
    /// changes the native balance, so confirmation always counts as a
    /// balance-affecting event.
    pub async fn refresh_tracker(
        &self,
        tracker: &mut TransactionTracker,
    ) -> Result<TrackerState, WalletError> {
        let before = tracker.state();
        let state = tracker.refresh().await?;
        if state == TrackerState::Confirmed && before != TrackerState::Confirmed {
            self.observers
                .notify(BalanceChange {
                    address: self.address.clone(),
                    token_id: String::new(),
                })
                .await;
        }
        Ok(state)
    }

    /// Lazily-paginated NFT holdings, shared through a caching stream so
    /// multiple consumers can read independently without duplicate
    /// network fetches.
    pub fn nfts(
        &self,
        asset_identifier: Option<String>,
        resolve_metadata: bool,
    ) -> CachedStream<NftRecord> {
        let source = NftHoldingsSource::new(
            self.chain.clone(),
            self.address.clone(),
            asset_identifier,
            resolve_metadata,
        );
        CachedStream::new(LazyStream::new(source))
    }
}
