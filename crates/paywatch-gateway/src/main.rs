use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use paywatch_core::config::PaywatchConfig;
use paywatch_gateway::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paywatch_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit PAYWATCH_CONFIG path > ./paywatch.toml > defaults
    let config_path = std::env::var("PAYWATCH_CONFIG").ok();
    let config = PaywatchConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        PaywatchConfig::default()
    });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let state = Arc::new(app::AppState::new(config));
    let router = app::build_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Paywatch gateway listening on {}", addr);

    if let Some(ref url) = state.config.gateway.public_url {
        info!("webhook ingress reachable at {}/webhook", url.trim_end_matches('/'));
    }
    info!(
        origin = %state.config.frontend.authoritative_origin(),
        production = state.config.frontend.production,
        "dashboard origin policy active"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
