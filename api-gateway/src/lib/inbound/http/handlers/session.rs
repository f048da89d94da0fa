use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use super::UserData;
use crate::domain::identity::models::RequestIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserData>,
}

/// Report who the caller is, if anyone. Never fails on a bad token.
pub async fn session(identity: Option<Extension<RequestIdentity>>) -> ApiSuccess<SessionData> {
    let user = identity.map(|Extension(identity)| UserData::from(identity.user));

    ApiSuccess::new(
        StatusCode::OK,
        SessionData {
            authenticated: user.is_some(),
            user,
        },
    )
}
