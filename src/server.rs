use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::ServerConfig;
use crate::context::ServiceContext;
use crate::error::{MedriskError, Result};

/// Bind the configured host and port. Host names (`localhost`) and bare IPv6
/// addresses (`::`) are resolved by the socket layer.
pub async fn bind_listener(server: &ServerConfig) -> Result<TcpListener> {
    TcpListener::bind((server.host.as_str(), server.port))
        .await
        .map_err(|e| {
            MedriskError::InvalidConfig(format!(
                "cannot bind {}:{}: {e}",
                server.host, server.port
            ))
        })
}

/// Start the API server and run until Ctrl-C / SIGTERM
pub async fn start_api_server(ctx: Arc<ServiceContext>, server: &ServerConfig) -> Result<()> {
    let listener = bind_listener(server).await?;
    let addr = listener.local_addr()?;
    let app = create_router(AppState::new(ctx));
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
