//! Serve command - runs the HTTP server

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use super::{load_config, ServeArgs};
use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};

/// Run the API server until Ctrl+C or SIGTERM
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config()?;
    args.apply(&mut config);

    init_tracing(&config.logging, &config.observability.tracing);

    let state = crate::create_app_state_with_config(&config).await?;
    let metrics = init_metrics(&config.observability.metrics);
    let app = create_router(state, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting climate API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    info!("Climate API server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
