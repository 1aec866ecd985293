use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, RedisResult};
use sentinel_core::repository::StoreResult;
use sentinel_core::{FlightId, FlightRecord, FlightRecordRepository, FlightStatus, UpsertOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

// Writes only when the stored observation is strictly older (or missing).
// The comparison and the write run inside Redis as one atomic step.
const UPSERT_LATEST_SCRIPT: &str = r#"
    local current = redis.call("HGET", KEYS[1], "observed_at")
    if current and tonumber(current) >= tonumber(ARGV[1]) then
        return 0
    end
    redis.call("HSET", KEYS[1], "observed_at", ARGV[1], "record", ARGV[2])
    return 1
"#;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn get_latest_record(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.hget(key, "record").await
    }

    /// Returns `true` when `payload` replaced the stored record.
    pub async fn set_latest_record_if_newer(
        &self,
        key: &str,
        observed_at_micros: i64,
        payload: &str,
    ) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let script = redis::Script::new(UPSERT_LATEST_SCRIPT);
        let written: i32 = script
            .key(key)
            .arg(observed_at_micros)
            .arg(payload)
            .invoke_async(&mut conn)
            .await?;
        Ok(written == 1)
    }
}

/// JSON form of a record as kept in the `record` hash field
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct StoredFlightRecord {
    flight: String,
    origin: String,
    destination: String,
    status: FlightStatus,
    delay_minutes: Option<u32>,
    observed_at: DateTime<Utc>,
}

impl From<&FlightRecord> for StoredFlightRecord {
    fn from(record: &FlightRecord) -> Self {
        Self {
            flight: record.flight_id().to_string(),
            origin: record.origin().to_string(),
            destination: record.destination().to_string(),
            status: record.status(),
            delay_minutes: record.delay_minutes(),
            observed_at: record.observed_at(),
        }
    }
}

impl StoredFlightRecord {
    /// Rebuilds through `FlightRecord::new`, so stored data is validated on read.
    fn into_record(self) -> Result<FlightRecord, sentinel_core::CoreError> {
        FlightRecord::new(
            FlightId::parse(&self.flight)?,
            &self.origin,
            &self.destination,
            self.status,
            self.delay_minutes,
            self.observed_at,
        )
    }
}

/// Redis-backed latest-record store, one hash per flight
pub struct RedisFlightRecordRepository {
    redis: RedisClient,
    key_prefix: String,
}

impl RedisFlightRecordRepository {
    pub fn new(redis: RedisClient, key_prefix: impl Into<String>) -> Self {
        Self {
            redis,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, flight_id: &FlightId) -> String {
        format!("{}:{}:latest", self.key_prefix, flight_id)
    }
}

#[async_trait]
impl FlightRecordRepository for RedisFlightRecordRepository {
    async fn find_latest(&self, flight_id: &FlightId) -> StoreResult<Option<FlightRecord>> {
        let payload = self.redis.get_latest_record(&self.key(flight_id)).await?;
        match payload {
            Some(json) => {
                let stored: StoredFlightRecord = serde_json::from_str(&json)?;
                Ok(Some(stored.into_record()?))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: &FlightRecord) -> StoreResult<UpsertOutcome> {
        let payload = serde_json::to_string(&StoredFlightRecord::from(record))?;
        let written = self
            .redis
            .set_latest_record_if_newer(
                &self.key(record.flight_id()),
                record.observed_at().timestamp_micros(),
                &payload,
            )
            .await?;

        if written {
            info!("Latest record stored: {} @ {}", record.flight_id(), record.observed_at());
            Ok(UpsertOutcome::Applied)
        } else {
            Ok(UpsertOutcome::Superseded)
        }
    }
}
