use serde::Deserialize;
use std::env;
use std::time::Duration;

use sentinel_core::StalenessPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_backend() -> StoreBackend { StoreBackend::Memory }
fn default_timeout_ms() -> u64 { 500 }

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_redis_url() -> String { "redis://127.0.0.1:6379".into() }
fn default_key_prefix() -> String { "flight".into() }

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverConfig {
    #[serde(default = "default_stale_threshold")]
    pub stale_threshold_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stale_threshold_seconds: default_stale_threshold(),
        }
    }
}

fn default_stale_threshold() -> u64 { 900 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SENTINEL__SERVER__PORT=9000` sets `server.port`
            .add_source(config::Environment::with_prefix("SENTINEL").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store.timeout_ms)
    }

    pub fn staleness_policy(&self) -> StalenessPolicy {
        // chrono::Duration caps at i64::MAX milliseconds
        let seconds = self.resolver.stale_threshold_seconds.min(i64::MAX as u64 / 1000);
        let threshold = chrono::Duration::seconds(seconds as i64);
        StalenessPolicy::new(threshold, self.store_timeout())
    }
}
