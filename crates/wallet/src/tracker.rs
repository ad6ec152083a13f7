use crate::error::WalletError;
use async_trait::async_trait;
use client::chain::ChainClient;
use model::error::ApiError;
use model::transaction::{PreparedTransaction, TransactionInfo};
use std::sync::Arc;
use tracing::{info, warn};

/// Stable local view of a submitted transaction's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Submitted (or prepared) but no remote status observed yet.
    Unknown,
    /// The chain reports the transaction as in progress.
    Pending,
    /// Accepted but not yet in an anchored block; still reversible.
    PreConfirmed,
    /// Accepted and anchored; irreversible.
    Confirmed,
    /// Submission failed or the chain reports a terminal failure.
    Failed,
}

/// Capability to submit a transaction and query its remote status.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, tx: &PreparedTransaction) -> Result<TransactionInfo, ApiError>;

    async fn status(&self, txid: &str) -> Result<TransactionInfo, ApiError>;
}

/// Submitter backed by the chain web API: broadcast, then poll the
/// transaction endpoint.
pub struct ChainSubmitter {
    chain: Arc<ChainClient>,
}

impl ChainSubmitter {
    pub fn new(chain: Arc<ChainClient>) -> Self {
        ChainSubmitter { chain }
    }
}

#[async_trait]
impl TransactionSubmitter for ChainSubmitter {
    async fn submit(&self, tx: &PreparedTransaction) -> Result<TransactionInfo, ApiError> {
        let txid = self.chain.broadcast(tx).await?;
        Ok(TransactionInfo::pending(txid))
    }

    async fn status(&self, txid: &str) -> Result<TransactionInfo, ApiError> {
        self.chain.transaction_status(txid).await
    }
}

/// Tracks one locally-submitted transaction against its remote lifecycle.
///
/// The state is a pure function of the stored submission/status snapshot
/// and is re-derived on every read; `send` and `refresh` are the only
/// operations that replace the snapshot.
pub struct TransactionTracker {
    submitter: Option<Arc<dyn TransactionSubmitter>>,
    prepared: Option<PreparedTransaction>,
    last_info: Option<TransactionInfo>,
    last_error: Option<ApiError>,
}

impl TransactionTracker {
    /// A tracker for a submission that already failed. Terminal.
    pub fn failed(error: ApiError) -> Self {
        TransactionTracker {
            submitter: None,
            prepared: None,
            last_info: None,
            last_error: Some(error),
        }
    }

    /// A tracker for a prepared transaction that has not been sent yet.
    pub fn prepared(submitter: Arc<dyn TransactionSubmitter>, tx: PreparedTransaction) -> Self {
        TransactionTracker {
            submitter: Some(submitter),
            prepared: Some(tx),
            last_info: None,
            last_error: None,
        }
    }

    /// A tracker seeded with the outcome of an earlier submission.
    pub fn with_result(
        submitter: Arc<dyn TransactionSubmitter>,
        tx: Option<PreparedTransaction>,
        result: Result<TransactionInfo, ApiError>,
    ) -> Self {
        let (last_info, last_error) = match result {
            Ok(info) => (Some(info), None),
            Err(err) => (None, Some(err)),
        };
        TransactionTracker {
            submitter: Some(submitter),
            prepared: tx,
            last_info,
            last_error,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.derive().0
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.derive().1
    }

    pub fn txid(&self) -> Option<&str> {
        self.last_info.as_ref().map(|info| info.txid.as_str())
    }

    /// (Re-)submits the prepared transaction, optionally overriding its fee
    /// first. Illegal once the chain has accepted the transaction; the
    /// stored snapshot is untouched in that case.
    pub async fn send(&mut self, override_fee: Option<u64>) -> Result<(), WalletError> {
        match self.state() {
            TrackerState::PreConfirmed | TrackerState::Confirmed => {
                warn!("send rejected: transaction already accepted");
                return Err(WalletError::InvalidState);
            }
            _ => {}
        }

        let submitter = self
            .submitter
            .clone()
            .ok_or(WalletError::NothingToSubmit)?;
        let tx = self.prepared.as_mut().ok_or(WalletError::NothingToSubmit)?;

        if let Some(fee) = override_fee {
            let nonce = tx.nonce;
            tx.update_fee_and_nonce(fee, nonce);
        }

        match submitter.submit(tx).await {
            Ok(result) => {
                info!(txid = result.txid, "transaction submitted");
                self.last_info = Some(result);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_info = None;
                self.last_error = Some(err.clone());
                Err(WalletError::Api(err))
            }
        }
    }

    /// Queries the latest remote status and stores it. A failed query
    /// keeps the previous snapshot.
    pub async fn refresh(&mut self) -> Result<TrackerState, WalletError> {
        let txid = self
            .last_info
            .as_ref()
            .map(|info| info.txid.clone())
            .ok_or(WalletError::NothingToSubmit)?;
        let submitter = self
            .submitter
            .clone()
            .ok_or(WalletError::NothingToSubmit)?;

        let info = submitter.status(&txid).await?;
        self.last_info = Some(info);
        Ok(self.state())
    }

    fn derive(&self) -> (TrackerState, Option<ApiError>) {
        if let Some(err) = &self.last_error {
            return (TrackerState::Failed, Some(err.clone()));
        }

        match &self.last_info {
            None if self.prepared.is_some() => (TrackerState::Unknown, None),
            None => (TrackerState::Failed, None),
            Some(info) => {
                if info.status.is_success() {
                    if info.anchored {
                        (TrackerState::Confirmed, None)
                    } else {
                        (TrackerState::PreConfirmed, None)
                    }
                } else if info.status.is_terminal_failure() {
                    (
                        TrackerState::Failed,
                        Some(ApiError::Logical(info.status.as_str().to_string())),
                    )
                } else {
                    (TrackerState::Pending, None)
                }
            }
        }
    }
}
