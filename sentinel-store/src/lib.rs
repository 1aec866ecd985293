pub mod app_config;
pub mod memory_repo;
pub mod redis_repo;

use std::sync::Arc;

use sentinel_core::FlightRecordRepository;
use tracing::info;

pub use app_config::{Config, StoreBackend};
pub use memory_repo::InMemoryFlightRecordRepository;
pub use redis_repo::{RedisClient, RedisFlightRecordRepository};

/// Builds the record store selected by `store.backend`.
pub async fn connect_repository(
    config: &Config,
) -> Result<Arc<dyn FlightRecordRepository>, redis::RedisError> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory record store");
            Ok(Arc::new(InMemoryFlightRecordRepository::new()))
        }
        StoreBackend::Redis => {
            info!("Using Redis record store at {}", config.redis.url);
            let client = RedisClient::new(&config.redis.url).await?;
            Ok(Arc::new(RedisFlightRecordRepository::new(
                client,
                config.redis.key_prefix.clone(),
            )))
        }
    }
}
