use model::error::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A read was issued while a previous read on the same stream instance
    /// had not completed. This is caller misuse, never a transient
    /// condition; the offending call fails without touching stream state.
    #[error("read already in progress on this stream")]
    ReadInProgress,

    /// The underlying source fetch failed. Cached data stays intact and
    /// the caller may retry the same read.
    #[error(transparent)]
    Fetch(#[from] ApiError),

    /// The shared fetch task ended without reporting a result.
    #[error("fetch task aborted")]
    Aborted,
}
