use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::flight::{FlightId, FlightRecord, StatusQueryResult};
use crate::repository::{bounded, FlightRecordRepository};
use crate::CoreResult;

/// Staleness threshold and store deadline applied by [`StatusResolver`].
#[derive(Debug, Clone, Copy)]
pub struct StalenessPolicy {
    pub threshold: Duration,
    pub store_timeout: StdDuration,
}

impl StalenessPolicy {
    pub fn new(threshold: Duration, store_timeout: StdDuration) -> Self {
        Self {
            threshold,
            store_timeout,
        }
    }

    /// A record observed in the future counts as fresh.
    pub fn is_stale(&self, observed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(observed_at) > self.threshold
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            threshold: Duration::minutes(15),
            store_timeout: StdDuration::from_millis(500),
        }
    }
}

/// Resolves the best-available status for a flight.
///
/// Holds no mutable state: every call is one bounded read against the
/// repository, so a single resolver is shared freely across request tasks.
pub struct StatusResolver {
    repository: Arc<dyn FlightRecordRepository>,
    clock: Arc<dyn Clock>,
    policy: StalenessPolicy,
}

impl StatusResolver {
    pub fn new(
        repository: Arc<dyn FlightRecordRepository>,
        clock: Arc<dyn Clock>,
        policy: StalenessPolicy,
    ) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &StalenessPolicy {
        &self.policy
    }

    /// Resolve the latest status for `raw_flight_id`.
    ///
    /// - blank or malformed id: `InvalidIdentifier`, the store is not touched
    /// - no stored record: an UNKNOWN placeholder, `stale = false`
    /// - stored record: returned unchanged, `stale` set once it is older than the threshold
    /// - store error or timeout: `StoreUnavailable`
    pub async fn resolve(&self, raw_flight_id: &str) -> CoreResult<StatusQueryResult> {
        let flight_id = FlightId::parse(raw_flight_id)?;

        let latest = bounded(
            self.policy.store_timeout,
            "find_latest",
            self.repository.find_latest(&flight_id),
        )
        .await?;

        let now = self.clock.now();
        let result = match latest {
            None => {
                debug!(flight = %flight_id, "No record stored, reporting UNKNOWN");
                StatusQueryResult {
                    record: FlightRecord::unknown(flight_id, now),
                    stale: false,
                }
            }
            Some(record) => {
                let stale = self.policy.is_stale(record.observed_at(), now);
                debug!(
                    flight = %flight_id,
                    status = %record.status(),
                    observed_at = %record.observed_at(),
                    stale,
                    "Resolved latest record"
                );
                StatusQueryResult { record, stale }
            }
        };

        Ok(result)
    }
}
