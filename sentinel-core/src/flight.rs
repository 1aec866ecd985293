use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

const MAX_FLIGHT_ID_LEN: usize = 10;

/// Normalized flight identifier (airline designator + number, e.g. "AF123").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FlightId(String);

impl FlightId {
    /// Trims and uppercases the raw identifier.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidIdentifier(
                "flight identifier must not be empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_FLIGHT_ID_LEN {
            return Err(CoreError::InvalidIdentifier(format!(
                "{} exceeds {} characters",
                trimmed, MAX_FLIGHT_ID_LEN
            )));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidIdentifier(format!(
                "{} contains characters other than letters and digits",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Departed,
    Delayed,
    Cancelled,
    Landed,
    Unknown,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "SCHEDULED",
            FlightStatus::Boarding => "BOARDING",
            FlightStatus::Departed => "DEPARTED",
            FlightStatus::Delayed => "DELAYED",
            FlightStatus::Cancelled => "CANCELLED",
            FlightStatus::Landed => "LANDED",
            FlightStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether a record in this status may carry a known delay.
    pub fn allows_delay(&self) -> bool {
        matches!(
            self,
            FlightStatus::Delayed | FlightStatus::Departed | FlightStatus::Landed
        )
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(FlightStatus::Scheduled),
            "BOARDING" => Ok(FlightStatus::Boarding),
            "DEPARTED" => Ok(FlightStatus::Departed),
            "DELAYED" => Ok(FlightStatus::Delayed),
            "CANCELLED" => Ok(FlightStatus::Cancelled),
            "LANDED" => Ok(FlightStatus::Landed),
            "UNKNOWN" => Ok(FlightStatus::Unknown),
            other => Err(CoreError::InvalidRecord(format!("unknown flight status: {}", other))),
        }
    }
}

/// Latest known state of a flight at `observed_at`.
///
/// Records are immutable. A newer observation is a new record; the store keeps
/// the one with the greatest `observed_at`. `observed_at` is truncated to
/// microseconds, the finest precision every store backend can compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    flight_id: FlightId,
    origin: String,
    destination: String,
    status: FlightStatus,
    delay_minutes: Option<u32>,
    observed_at: DateTime<Utc>,
}

impl FlightRecord {
    pub fn new(
        flight_id: FlightId,
        origin: &str,
        destination: &str,
        status: FlightStatus,
        delay_minutes: Option<u32>,
        observed_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let origin = parse_airport_code("origin", origin)?;
        let destination = parse_airport_code("destination", destination)?;

        if delay_minutes.is_some() && !status.allows_delay() {
            return Err(CoreError::InvalidRecord(format!(
                "delay is not allowed for status {}",
                status
            )));
        }

        Ok(Self {
            flight_id,
            origin,
            destination,
            status,
            delay_minutes,
            observed_at: observed_at.trunc_subsecs(6),
        })
    }

    /// Placeholder returned when the store has never seen `flight_id`.
    pub fn unknown(flight_id: FlightId, observed_at: DateTime<Utc>) -> Self {
        Self {
            flight_id,
            origin: String::new(),
            destination: String::new(),
            status: FlightStatus::Unknown,
            delay_minutes: None,
            observed_at: observed_at.trunc_subsecs(6),
        }
    }

    pub fn flight_id(&self) -> &FlightId {
        &self.flight_id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn delay_minutes(&self) -> Option<u32> {
        self.delay_minutes
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// True when `self` should replace `current` in the store.
    pub fn supersedes(&self, current: &FlightRecord) -> bool {
        self.observed_at > current.observed_at
    }
}

fn parse_airport_code(field: &str, raw: &str) -> CoreResult<String> {
    let code = raw.trim().to_ascii_uppercase();
    let valid_len = (3..=4).contains(&code.len());
    if !valid_len || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::InvalidRecord(format!(
            "{} must be a 3-4 letter airport code, got {:?}",
            field, raw
        )));
    }
    Ok(code)
}

/// Outcome of a single resolution. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusQueryResult {
    pub record: FlightRecord,
    pub stale: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn af123() -> FlightId {
        FlightId::parse("AF123").unwrap()
    }

    #[test]
    fn test_flight_id_normalization() {
        let id = FlightId::parse("  af123 ").unwrap();
        assert_eq!(id.as_str(), "AF123");
        assert_eq!(id, af123());
    }

    #[test]
    fn test_flight_id_rejects_blank_and_garbage() {
        assert!(matches!(FlightId::parse(""), Err(CoreError::InvalidIdentifier(_))));
        assert!(matches!(FlightId::parse("   \t"), Err(CoreError::InvalidIdentifier(_))));
        assert!(matches!(FlightId::parse("AF 123"), Err(CoreError::InvalidIdentifier(_))));
        assert!(matches!(
            FlightId::parse("AF12345678901"),
            Err(CoreError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        let status: FlightStatus = "delayed".parse().unwrap();
        assert_eq!(status, FlightStatus::Delayed);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"DELAYED\"");
        assert!("DIVERTED".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_record_validates_airport_codes() {
        let now = Utc::now();
        let record =
            FlightRecord::new(af123(), "cdg", "KJFK", FlightStatus::Scheduled, None, now).unwrap();
        assert_eq!(record.origin(), "CDG");
        assert_eq!(record.destination(), "KJFK");

        assert!(FlightRecord::new(af123(), "CD", "JFK", FlightStatus::Scheduled, None, now).is_err());
        assert!(FlightRecord::new(af123(), "CDG", "J4K", FlightStatus::Scheduled, None, now).is_err());
        assert!(FlightRecord::new(af123(), "CDG", "", FlightStatus::Scheduled, None, now).is_err());
    }

    #[test]
    fn test_delay_rejected_for_scheduled_and_unknown() {
        let now = Utc::now();
        for status in [FlightStatus::Scheduled, FlightStatus::Unknown, FlightStatus::Cancelled] {
            let result = FlightRecord::new(af123(), "CDG", "JFK", status, Some(10), now);
            assert!(matches!(result, Err(CoreError::InvalidRecord(_))), "{:?}", status);
        }
        for status in [FlightStatus::Delayed, FlightStatus::Departed, FlightStatus::Landed] {
            assert!(FlightRecord::new(af123(), "CDG", "JFK", status, Some(10), now).is_ok());
        }
    }

    #[test]
    fn test_supersedes_is_strict() {
        let now = Utc::now();
        let older = FlightRecord::new(af123(), "CDG", "JFK", FlightStatus::Scheduled, None, now - Duration::minutes(1)).unwrap();
        let newer = FlightRecord::new(af123(), "CDG", "JFK", FlightStatus::Boarding, None, now).unwrap();
        assert!(newer.supersedes(&older));
        assert!(!older.supersedes(&newer));
        assert!(!newer.supersedes(&newer.clone()));
    }

    #[test]
    fn test_observed_at_truncated_to_micros() {
        let base = DateTime::parse_from_rfc3339("2024-06-01T12:00:00.000001Z")
            .unwrap()
            .with_timezone(&Utc);
        let first = FlightRecord::new(af123(), "CDG", "JFK", FlightStatus::Boarding, None, base).unwrap();
        let sub_micro_later = FlightRecord::new(
            af123(),
            "CDG",
            "JFK",
            FlightStatus::Departed,
            None,
            base + Duration::nanoseconds(500),
        )
        .unwrap();

        assert_eq!(sub_micro_later.observed_at(), base);
        assert_eq!(sub_micro_later.observed_at().timestamp_subsec_nanos() % 1_000, 0);
        assert!(!sub_micro_later.supersedes(&first));

        let next_micro = FlightRecord::new(
            af123(),
            "CDG",
            "JFK",
            FlightStatus::Departed,
            None,
            base + Duration::microseconds(1),
        )
        .unwrap();
        assert!(next_micro.supersedes(&first));
    }

    #[test]
    fn test_unknown_placeholder_is_empty() {
        let record = FlightRecord::unknown(af123(), Utc::now());
        assert_eq!(record.status(), FlightStatus::Unknown);
        assert!(record.origin().is_empty());
        assert!(record.destination().is_empty());
        assert_eq!(record.delay_minutes(), None);
    }
}
