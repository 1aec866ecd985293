use std::sync::Arc;

use sentinel_core::{Clock, FlightRecordRepository, StalenessPolicy, StatusRecorder, StatusResolver};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<StatusResolver>,
    pub recorder: Arc<StatusRecorder>,
}

impl AppState {
    /// Wires the read and write paths over one repository.
    pub fn new(
        repository: Arc<dyn FlightRecordRepository>,
        clock: Arc<dyn Clock>,
        policy: StalenessPolicy,
    ) -> Self {
        let recorder = StatusRecorder::new(repository.clone(), policy.store_timeout);
        let resolver = StatusResolver::new(repository, clock, policy);
        Self {
            resolver: Arc::new(resolver),
            recorder: Arc::new(recorder),
        }
    }
}
