use crate::retry::RetryStrategy;
use chrono::Utc;
use model::error::ApiError;
use model::transaction::{TransactionInfo, TransactionStatus};
use serde::Deserialize;
use std::time::Duration;

/// Response of the transaction lookup endpoint, reduced to the fields the
/// lifecycle tracker consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    pub tx_id: String,
    pub tx_status: TransactionStatus,
    #[serde(default)]
    pub is_unanchored: bool,
}

impl TransactionResponse {
    pub fn into_info(self) -> TransactionInfo {
        let anchored = self.tx_status.is_success() && !self.is_unanchored;
        TransactionInfo {
            txid: self.tx_id,
            status: self.tx_status,
            anchored,
            observed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BroadcastRejection {
    error: String,
    #[serde(default)]
    reason: Option<String>,
}

/// Extracts the txid from a successful broadcast body.
pub fn parse_txid(body: &str) -> Result<String, ApiError> {
    let txid: String = serde_json::from_str(body)
        .map_err(|_| ApiError::Decode(format!("unexpected broadcast response: {body}")))?;
    Ok(txid.trim_start_matches("0x").to_string())
}

/// Broadcast strategy: never retries (a second submit could double-spend
/// the nonce) and classifies rejection bodies the node returns with a 2xx.
pub struct BroadcastCheck;

impl RetryStrategy for BroadcastCheck {
    fn classify(&self, body: &str) -> Option<ApiError> {
        let rejection: BroadcastRejection = serde_json::from_str(body).ok()?;
        let detail = match rejection.reason {
            Some(reason) => format!("{}: {reason}", rejection.error),
            None => rejection.error,
        };
        Some(ApiError::Logical(detail))
    }

    fn next_delay(&self, _attempt: u32, _last: &ApiError) -> Option<Duration> {
        None
    }
}
