//! Errors surfaced by the limit-order accessor.

use thiserror::Error;

/// Boxed reader failure, kept intact for the caller.
pub type ReadError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PoolError {
    /// The storage reader failed or timed out. No retry happens here.
    #[error("limit order read at point {point} failed")]
    ExternalReadFailure {
        point: i32,
        #[source]
        source: ReadError,
    },
}
