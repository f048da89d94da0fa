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
use crate::domain::identity::models::RegisteredUser;
use crate::domain::identity::models::Registration;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequestBody {
    email: String,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl RegisterRequestBody {
    fn try_into_registration(self) -> Result<Registration, ApiError> {
        require_fields(&[
            ("email", self.email.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ])?;

        Ok(Registration {
            email: self.email,
            username: self.username,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user: UserData,
    pub access_token: String,
    pub expires_at: i64,
}

impl From<RegisteredUser> for RegisterResponseData {
    fn from(registered: RegisteredUser) -> Self {
        Self {
            user: registered.user.into(),
            access_token: registered.access_token.token,
            expires_at: registered.access_token.expires_at,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = body?;
    let registration = body.try_into_registration()?;

    state
        .auth_service
        .register(registration)
        .await
        .map_err(ApiError::from)
        .map(|registered| ApiSuccess::new(StatusCode::CREATED, registered.into()))
}
