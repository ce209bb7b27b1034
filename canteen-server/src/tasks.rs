//! Background tasks

use std::time::Duration;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::db::repository::notifications;

/// Periodically remove expired notifications (surplus alerts past their
/// window). Runs until the token is cancelled.
pub async fn notification_sweep(pool: SqlitePool, interval_secs: u64, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    // First tick fires immediately; skip it so startup stays quiet
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match notifications::delete_expired(&pool, shared::util::now_millis()).await {
                    Ok(0) => {}
                    Ok(removed) => {
                        tracing::info!(removed, "Expired notifications swept");
                    }
                    Err(e) => {
                        tracing::warn!("Notification sweep failed: {e}");
                    }
                }
            }
            _ = shutdown.cancelled() => {
                tracing::info!("Notification sweep stopped");
                break;
            }
        }
    }
}
