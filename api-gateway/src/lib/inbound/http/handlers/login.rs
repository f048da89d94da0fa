use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::require_fields;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::Session;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl From<Session> for LoginResponseData {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            access_token: session.access_token.token,
            refresh_token: session.refresh_token,
            expires_at: session.access_token.expires_at,
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body?;
    require_fields(&[
        ("email", body.email.as_str()),
        ("password", body.password.as_str()),
    ])?;

    let session = state
        .auth_service
        .login(Credentials {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from_login)?;

    tracing::info!(user_id = %session.user.id, "User logged in");

    Ok(ApiSuccess::new(StatusCode::OK, session.into()))
}
