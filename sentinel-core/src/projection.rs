use serde::{Deserialize, Serialize};

use crate::flight::StatusQueryResult;

/// Externally visible shape of a resolved flight status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStatus {
    pub flight: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub delay_minutes: Option<u32>,
    pub stale: bool,
}

impl From<&StatusQueryResult> for WireStatus {
    fn from(result: &StatusQueryResult) -> Self {
        let record = &result.record;
        Self {
            flight: record.flight_id().to_string(),
            origin: record.origin().to_string(),
            destination: record.destination().to_string(),
            status: record.status().as_str().to_string(),
            delay_minutes: record.delay_minutes(),
            stale: result.stale,
        }
    }
}

impl From<StatusQueryResult> for WireStatus {
    fn from(result: StatusQueryResult) -> Self {
        Self::from(&result)
    }
}
