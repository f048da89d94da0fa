use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub const SERVICE_NAME: &str = "api-gateway";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: String,
    pub service: String,
    pub auth_service: String,
}

/// Healthy only while the auth service answers its own health check.
pub async fn health(State(state): State<AppState>) -> ApiSuccess<HealthData> {
    match state.auth_service.health_check().await {
        Ok(upstream) => ApiSuccess::new(
            StatusCode::OK,
            HealthData {
                status: "healthy".to_string(),
                service: SERVICE_NAME.to_string(),
                auth_service: upstream.status,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Auth service health check failed");
            ApiSuccess::new(
                StatusCode::SERVICE_UNAVAILABLE,
                HealthData {
                    status: "degraded".to_string(),
                    service: SERVICE_NAME.to_string(),
                    auth_service: "unavailable".to_string(),
                },
            )
        }
    }
}
