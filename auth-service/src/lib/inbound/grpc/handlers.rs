use tonic::Status;

use crate::domain::user::errors::AuthError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::ADMIN_ROLE;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::common::ErrorCode;
use crate::proto::common::Response as Envelope;

pub mod change_password;
pub mod get_user;
pub mod health_check;
pub mod login;
pub mod refresh_token;
pub mod register;
pub mod update_profile;
pub mod validate_token;

impl From<User> for crate::proto::auth::User {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

impl From<&AuthError> for ErrorCode {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::InvalidUserId(_)
            | AuthError::InvalidUsername(_)
            | AuthError::InvalidEmail(_)
            | AuthError::InvalidPassword(_)
            | AuthError::InvalidName(_)
            | AuthError::Validation(_) => ErrorCode::Validation,
            AuthError::EmailAlreadyExists(_) | AuthError::UsernameAlreadyExists(_) => {
                ErrorCode::AlreadyExists
            }
            AuthError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AuthError::AccountDisabled => ErrorCode::AccountDisabled,
            AuthError::NotFound(_) => ErrorCode::NotFound,
            AuthError::Token(auth::TokenError::Expired) => ErrorCode::TokenExpired,
            AuthError::Token(_) => ErrorCode::TokenMalformed,
            AuthError::InvalidToken => ErrorCode::InvalidToken,
            AuthError::Forbidden => ErrorCode::Forbidden,
            AuthError::Password(_) | AuthError::DatabaseError(_) | AuthError::Unknown(_) => {
                ErrorCode::Internal
            }
        }
    }
}

pub(crate) fn success(message: &str) -> Envelope {
    Envelope {
        success: true,
        message: message.to_string(),
        code: ErrorCode::Unspecified as i32,
    }
}

/// Business failures travel inside the envelope; internal ones become a
/// transport error so they are never mistaken for a caller mistake.
pub(crate) fn failure(err: AuthError) -> Result<Envelope, Status> {
    if err.is_internal() {
        tracing::error!(error = %err, "Request failed");
        return Err(Status::internal("Internal server error"));
    }

    tracing::debug!(error = %err, "Request rejected");
    let mut envelope = Envelope {
        success: false,
        message: err.to_string(),
        ..Default::default()
    };
    envelope.set_code(ErrorCode::from(&err));
    Ok(envelope)
}

/// Empty strings mean "leave unchanged" in partial updates.
pub(crate) fn provided(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Resolve the caller's token and check it may act on `user_id`.
///
/// Callers may act on themselves; `admin_may_read` additionally lets an
/// admin act on anyone.
pub(crate) async fn authorize<S: AuthServicePort>(
    service: &S,
    token: &str,
    user_id: &str,
    admin_may_read: bool,
) -> Result<UserId, AuthError> {
    let caller = service.validate_token(token).await?;
    let user_id = UserId::from_string(user_id)?;

    if caller.id == user_id || (admin_may_read && caller.role == ADMIN_ROLE) {
        Ok(user_id)
    } else {
        Err(AuthError::Forbidden)
    }
}
