pub mod clock;
pub mod flight;
pub mod projection;
pub mod recorder;
pub mod repository;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, FixedClock, SystemClock};
pub use flight::{FlightId, FlightRecord, FlightStatus, StatusQueryResult};
pub use projection::WireStatus;
pub use recorder::StatusRecorder;
pub use repository::{FlightRecordRepository, UpsertOutcome};
pub use resolver::{StalenessPolicy, StatusResolver};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid flight identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid flight record: {0}")]
    InvalidRecord(String),
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
