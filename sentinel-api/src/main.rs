use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sentinel_api::{app, AppState};
use sentinel_core::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel_api=debug,sentinel_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = sentinel_store::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Flight Sentinel API on port {}", config.server.port);

    let repository = sentinel_store::connect_repository(&config)
        .await
        .context("Failed to set up record store")?;

    let app_state = AppState::new(repository, Arc::new(SystemClock), config.staleness_policy());
    let policy = app_state.resolver.policy();
    tracing::info!(
        "Stale threshold {}s, store timeout {}ms",
        policy.threshold.num_seconds(),
        policy.store_timeout.as_millis()
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
