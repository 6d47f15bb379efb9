//! dpctld - REST control-plane adapter for a DCP-speaking dataplane.

use dpctl_client::{Client, UnixTransport};
use dpctl_http::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration (from file if DPCTL_CONFIG is set, then env overrides)
    let config = match Config::load() {
        Ok(config) => {
            if let Ok(path) = std::env::var("DPCTL_CONFIG") {
                tracing::info!("Loaded config from {path}");
            }
            config
        }
        Err(err) => {
            tracing::error!("Failed to load config: {err}");
            return Err(err.into());
        }
    };

    tracing::info!("Starting dpctld");
    tracing::info!("  Bind address: {}", config.http.bind_addr);
    tracing::info!("  Dataplane socket: {}", config.dataplane.socket.display());

    let transport = Arc::new(UnixTransport::new(&config.dataplane.socket));
    let client = Client::with_config(transport, config.client_config());
    let state = AppState::new(client);

    // Rebuild the VRF cache from the dataplane. Failure is not fatal: the
    // dataplane may still be starting and the cache fills on later writes.
    if let Err(err) = state.ip.warm_cache().await {
        tracing::warn!(%err, "VRF cache warm-up failed; starting with an empty cache");
    }

    dpctl_http::serve(&config, state).await?;

    tracing::info!("dpctld stopped");
    Ok(())
}
