use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::require_fields;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::RotatedTokens;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RefreshRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl From<RotatedTokens> for RefreshResponseData {
    fn from(tokens: RotatedTokens) -> Self {
        Self {
            access_token: tokens.access_token.token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.access_token.expires_at,
        }
    }
}

/// Trade a refresh token for a fresh pair. The presented token is spent.
pub async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let Json(body) = body?;
    require_fields(&[("refresh_token", body.refresh_token.as_str())])?;

    state
        .auth_service
        .refresh_token(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::OK, tokens.into()))
}
