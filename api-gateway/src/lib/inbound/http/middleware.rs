use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::identity::errors::GatewayError;
use crate::domain::identity::models::RequestIdentity;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER: &str = "Bearer";

/// Resolve the bearer token with the auth service and attach a
/// `RequestIdentity` to the request. Any failure ends the request with 401,
/// carrying the auth service's reason when it gave one.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(BearerError::Missing) => {
            return Err(ApiError::Unauthorized(
                "Authorization header required".to_string(),
            ))
        }
        Err(BearerError::Malformed) => {
            return Err(ApiError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
        }
    };

    let user = state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(unauthorized)?;

    tracing::debug!(user_id = %user.id, "Request authenticated");
    req.extensions_mut().insert(RequestIdentity { user, token });

    Ok(next.run(req).await)
}

/// Attach a `RequestIdentity` when the caller presents a valid token.
/// Never rejects the request.
pub async fn optional_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Ok(token) = bearer_token(req.headers()) {
        let token = token.to_string();
        match state.auth_service.validate_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(RequestIdentity { user, token });
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring unusable token"),
        }
    }

    next.run(req).await
}

fn unauthorized(err: GatewayError) -> ApiError {
    tracing::warn!(error = %err, "Token validation failed");
    match err {
        GatewayError::Rejected { message, .. } => ApiError::Unauthorized(message),
        _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BearerError {
    Missing,
    Malformed,
}

/// `Authorization` must be exactly `Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers.get(AUTHORIZATION).ok_or(BearerError::Missing)?;
    let value = value.to_str().map_err(|_| BearerError::Malformed)?;

    match value.split(' ').collect::<Vec<_>>().as_slice() {
        [BEARER, token] if !token.is_empty() => Ok(*token),
        _ => Err(BearerError::Malformed),
    }
}
