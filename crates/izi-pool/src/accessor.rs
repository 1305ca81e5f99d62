//! Limit-order accessor.
//!
//! Turns the raw storage words a [`PoolStorageReader`] returns into a
//! [`LimitOrderState`] of exact decimals. One read per point, no caching, no
//! retry: a reader failure surfaces as [`PoolError::ExternalReadFailure`].

use crate::error::PoolError;
use crate::reader::PoolStorageReader;
use crate::types::LimitOrderState;

#[derive(Debug, Clone)]
pub struct LimitOrderAccessor<R> {
    reader: R,
}

impl<R: PoolStorageReader> LimitOrderAccessor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Limit-order snapshot at `point`.
    ///
    /// # Errors
    /// [`PoolError::ExternalReadFailure`] wrapping whatever the reader
    /// returned.
    #[tracing::instrument(skip(self))]
    pub async fn limit_order(&self, point: i32) -> Result<LimitOrderState, PoolError> {
        let raw = self
            .reader
            .read_limit_order(point)
            .await
            .map_err(|e| PoolError::ExternalReadFailure {
                point,
                source: e.into(),
            })?;
        Ok(LimitOrderState::from(raw))
    }

    /// Snapshots for several points, read in order. The first failure aborts.
    pub async fn limit_orders(&self, points: &[i32]) -> Result<Vec<LimitOrderState>, PoolError> {
        let mut states = Vec::with_capacity(points.len());
        for &point in points {
            states.push(self.limit_order(point).await?);
        }
        tracing::debug!(count = states.len(), "read limit orders");
        Ok(states)
    }
}
