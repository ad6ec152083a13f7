use thiserror::Error;

/// Remote-access error taxonomy shared by the client and stream layers.
///
/// Variants are `Clone` because errors fan out through shared in-flight
/// futures to every waiter of a coalesced fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request could not complete at the transport level.
    #[error("network error: {0}")]
    Network(String),

    /// Transport succeeded but the server answered with a non-success status.
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport succeeded but the payload encodes an application failure.
    #[error("logical error: {0}")]
    Logical(String),

    /// A well-formed response could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// An in-flight operation's task ended without producing a result.
    #[error("operation aborted")]
    Aborted,
}

impl ApiError {
    /// Whether default strategies should treat this error as transient.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status == 429 || *status >= 500,
            ApiError::Logical(_) | ApiError::Decode(_) | ApiError::Aborted => false,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
