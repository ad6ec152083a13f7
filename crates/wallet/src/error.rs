use model::error::ApiError;
use stream::error::StreamError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The operation is not legal in the transaction's current state.
    /// Caller misuse, never transient.
    #[error("operation not valid in the current transaction state")]
    InvalidState,

    /// No prepared transaction or capability available to act on.
    #[error("no prepared transaction available")]
    NothingToSubmit,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}
