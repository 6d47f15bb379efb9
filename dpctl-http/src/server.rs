//! HTTP server lifecycle.

use crate::config::Config;
use crate::routes;
use crate::state::AppState;

/// Serves the API until a shutdown signal arrives.
pub async fn serve(config: &Config, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.http.bind_addr).await?;
    tracing::info!(addr = %config.http.bind_addr, "HTTP API listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
