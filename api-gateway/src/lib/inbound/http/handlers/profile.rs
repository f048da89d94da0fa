use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::identity::models::ProfileUpdate;
use crate::domain::identity::models::RequestIdentity;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Blank or absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequestBody {
    first_name: String,
    last_name: String,
    username: String,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .auth_service
        .get_user(&identity.user.id, &identity.token)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    body: Result<Json<UpdateProfileRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let Json(body) = body?;

    let update = ProfileUpdate {
        first_name: body.first_name,
        last_name: body.last_name,
        username: body.username,
    };

    state
        .auth_service
        .update_profile(&identity.user.id, &identity.token, update)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, user.into()))
}
