use tonic::Status;

use super::failure;
use super::success;
use crate::domain::user::errors::AuthError;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::LoginRequest;
use crate::proto::auth::LoginResponse;

pub async fn login<S: AuthServicePort>(
    service: &S,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    tracing::info!(email = %request.email, "Login request");

    let outcome = if request.email.trim().is_empty() || request.password.is_empty() {
        Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ))
    } else {
        service.login(&request.email, &request.password).await
    };

    match outcome {
        Ok(session) => Ok(LoginResponse {
            response: Some(success("Login successful")),
            expires_at: session.access_token.expires_at.timestamp(),
            access_token: session.access_token.token,
            refresh_token: session.refresh_token.into_string(),
            user: Some(session.user.into()),
        }),
        Err(e) => Ok(LoginResponse {
            response: Some(failure(e)?),
            ..Default::default()
        }),
    }
}
