use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Remote transaction status as reported by the chain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Success,
    AbortByResponse,
    AbortByPostCondition,
    DroppedReplaceByFee,
    DroppedReplaceAcrossFork,
    DroppedTooExpensive,
    DroppedStaleGarbageCollect,
    DroppedProblematic,
}

impl TransactionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionStatus::Success)
    }

    /// Whether this status means the transaction can never be confirmed.
    pub fn is_terminal_failure(&self) -> bool {
        !matches!(
            self,
            TransactionStatus::Pending | TransactionStatus::Success
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::AbortByResponse => "abort_by_response",
            TransactionStatus::AbortByPostCondition => "abort_by_post_condition",
            TransactionStatus::DroppedReplaceByFee => "dropped_replace_by_fee",
            TransactionStatus::DroppedReplaceAcrossFork => "dropped_replace_across_fork",
            TransactionStatus::DroppedTooExpensive => "dropped_too_expensive",
            TransactionStatus::DroppedStaleGarbageCollect => "dropped_stale_garbage_collect",
            TransactionStatus::DroppedProblematic => "dropped_problematic",
        }
    }
}

/// Snapshot of one submitted transaction as last observed remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInfo {
    pub txid: String,
    pub status: TransactionStatus,
    /// True once the transaction is in an anchored (irreversible) block.
    pub anchored: bool,
    /// When this snapshot was taken locally.
    pub observed_at: DateTime<Utc>,
}

impl TransactionInfo {
    pub fn pending(txid: String) -> Self {
        TransactionInfo {
            txid,
            status: TransactionStatus::Pending,
            anchored: false,
            observed_at: Utc::now(),
        }
    }
}

/// A signed transaction ready for (re-)submission.
///
/// The payload encoding is opaque to this SDK; only the fee and nonce are
/// meaningful here because re-submission may override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub payload: Vec<u8>,
    pub sender: String,
    pub fee: u64,
    pub nonce: u64,
}

impl PreparedTransaction {
    pub fn update_fee_and_nonce(&mut self, fee: u64, nonce: u64) {
        self.fee = fee;
        self.nonce = nonce;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_snake_case_statuses() {
        let status: TransactionStatus = serde_json::from_str("\"abort_by_response\"").unwrap();
        assert_eq!(status, TransactionStatus::AbortByResponse);
        assert!(status.is_terminal_failure());
        assert!(!TransactionStatus::Pending.is_terminal_failure());
        assert!(TransactionStatus::Success.is_success());
    }
}
