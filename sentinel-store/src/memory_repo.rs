use std::collections::HashMap;

use async_trait::async_trait;
use sentinel_core::repository::StoreResult;
use sentinel_core::{FlightId, FlightRecord, FlightRecordRepository, UpsertOutcome};
use tokio::sync::RwLock;
use tracing::debug;

/// In-process latest-record store
///
/// The write lock makes the `observed_at` comparison and the insert a single
/// step, so concurrent upserts for one flight cannot interleave.
#[derive(Default)]
pub struct InMemoryFlightRecordRepository {
    records: RwLock<HashMap<FlightId, FlightRecord>>,
}

impl InMemoryFlightRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRecordRepository for InMemoryFlightRecordRepository {
    async fn find_latest(&self, flight_id: &FlightId) -> StoreResult<Option<FlightRecord>> {
        Ok(self.records.read().await.get(flight_id).cloned())
    }

    async fn upsert(&self, record: &FlightRecord) -> StoreResult<UpsertOutcome> {
        let mut records = self.records.write().await;
        if let Some(current) = records.get(record.flight_id()) {
            if !record.supersedes(current) {
                debug!(
                    flight = %record.flight_id(),
                    stored = %current.observed_at(),
                    incoming = %record.observed_at(),
                    "Ignoring older observation"
                );
                return Ok(UpsertOutcome::Superseded);
            }
        }
        records.insert(record.flight_id().clone(), record.clone());
        Ok(UpsertOutcome::Applied)
    }
}
