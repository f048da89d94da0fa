use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::require_fields;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::PasswordChange;
use crate::domain::identity::models::RequestIdentity;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequestBody {
    current_password: String,
    new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    body: Result<Json<ChangePasswordRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<ChangePasswordResponseData>, ApiError> {
    let Json(body) = body?;
    require_fields(&[
        ("current_password", body.current_password.as_str()),
        ("new_password", body.new_password.as_str()),
    ])?;

    let change = PasswordChange {
        current_password: body.current_password,
        new_password: body.new_password,
    };

    state
        .auth_service
        .change_password(&identity.user.id, &identity.token, change)
        .await?;

    tracing::info!(user_id = %identity.user.id, "Password changed");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ChangePasswordResponseData {
            message: "Password changed successfully".to_string(),
        },
    ))
}
