//! canteen-server — campus canteen ordering backend
//!
//! Long-running service that:
//! - Serves the menu, order, loyalty and donation APIs (JWT authenticated)
//! - Pushes live order/surplus updates over WebSocket
//! - Sweeps expired notifications in the background

use canteen_server::{api, tasks, AppState, Config};
use tokio_util::sync::CancellationToken;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canteen_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting canteen-server (env: {})", config.environment);

    let state = AppState::new(config).await?;

    let shutdown = CancellationToken::new();

    // Expired-notification sweep
    tokio::spawn(tasks::notification_sweep(
        state.pool.clone(),
        state.config.notification_sweep_secs,
        shutdown.clone(),
    ));

    let app = api::create_router(state.clone());

    let addr = format!("0.0.0.0:{}", state.config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("canteen-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    tracing::info!("canteen-server stopped");
    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {e}");
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Shutdown signal received");
            token.cancel();
        }
        _ = token.cancelled() => {}
    }
}
