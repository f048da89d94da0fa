use std::sync::Arc;
use std::time::Duration;

use crate::domain::user::ports::AuthServicePort;

/// Periodically delete expired refresh tokens until the task is dropped.
pub async fn purge_expired_refresh_tokens<S: AuthServicePort>(service: Arc<S>, every: Duration) {
    let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));

    loop {
        ticker.tick().await;

        match service.purge_expired_refresh_tokens().await {
            Ok(0) => tracing::debug!("No expired refresh tokens to purge"),
            Ok(purged) => tracing::info!(purged, "Purged expired refresh tokens"),
            Err(e) => tracing::error!(error = %e, "Failed to purge expired refresh tokens"),
        }
    }
}
