use chrono::Utc;

use crate::proto::common::HealthCheckResponse;

pub const SERVICE_NAME: &str = "auth-service";

pub fn health_check() -> HealthCheckResponse {
    HealthCheckResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }
}
