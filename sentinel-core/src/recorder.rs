use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::flight::FlightRecord;
use crate::repository::{bounded, FlightRecordRepository, UpsertOutcome};
use crate::CoreResult;

/// Write side of the record store: hands observations to the repository
/// under the same deadline the resolver uses for reads.
pub struct StatusRecorder {
    repository: Arc<dyn FlightRecordRepository>,
    store_timeout: Duration,
}

impl StatusRecorder {
    pub fn new(repository: Arc<dyn FlightRecordRepository>, store_timeout: Duration) -> Self {
        Self {
            repository,
            store_timeout,
        }
    }

    pub async fn record(&self, record: &FlightRecord) -> CoreResult<UpsertOutcome> {
        let outcome = bounded(self.store_timeout, "upsert", self.repository.upsert(record)).await?;
        debug!(
            flight = %record.flight_id(),
            observed_at = %record.observed_at(),
            ?outcome,
            "Recorded observation"
        );
        Ok(outcome)
    }
}
