use async_trait::async_trait;
use std::error::Error;
use std::future::Future;
use std::time::Duration;

use crate::flight::{FlightId, FlightRecord};
use crate::{CoreError, CoreResult};

pub type StoreResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Result of an upsert against the latest-per-flight store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The record is now the latest for its flight
    Applied,
    /// A record with a newer-or-equal `observed_at` was already stored
    Superseded,
}

impl UpsertOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, UpsertOutcome::Applied)
    }
}

/// Repository trait for latest-known flight records
///
/// Implementations keep one record per flight id. `find_latest` returns
/// `Ok(None)` for flights never seen and only errors on genuine I/O failure.
/// `upsert` must be an atomic compare-and-set on `observed_at` per flight id,
/// so concurrent and out-of-order writers converge on the newest observation.
#[async_trait]
pub trait FlightRecordRepository: Send + Sync {
    async fn find_latest(&self, flight_id: &FlightId) -> StoreResult<Option<FlightRecord>>;

    async fn upsert(&self, record: &FlightRecord) -> StoreResult<UpsertOutcome>;
}

/// Runs a store call under `limit`, folding I/O errors and timeouts into
/// `CoreError::StoreUnavailable`.
pub(crate) async fn bounded<T, F>(limit: Duration, operation: &str, call: F) -> CoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(CoreError::StoreUnavailable(format!("{} failed: {}", operation, e))),
        Err(_) => Err(CoreError::StoreUnavailable(format!(
            "{} timed out after {}ms",
            operation,
            limit.as_millis()
        ))),
    }
}
