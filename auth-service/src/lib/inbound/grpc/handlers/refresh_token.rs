use tonic::Status;

use super::failure;
use super::success;
use crate::domain::user::errors::AuthError;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::RefreshTokenRequest;
use crate::proto::auth::RefreshTokenResponse;

pub async fn refresh_token<S: AuthServicePort>(
    service: &S,
    request: RefreshTokenRequest,
) -> Result<RefreshTokenResponse, Status> {
    let outcome = if request.refresh_token.is_empty() {
        Err(AuthError::Validation("Refresh token is required".to_string()))
    } else {
        service.refresh_token(&request.refresh_token).await
    };

    match outcome {
        Ok(rotated) => Ok(RefreshTokenResponse {
            response: Some(success("Token refreshed successfully")),
            expires_at: rotated.access_token.expires_at.timestamp(),
            access_token: rotated.access_token.token,
            refresh_token: rotated.refresh_token.into_string(),
        }),
        Err(e) => Ok(RefreshTokenResponse {
            response: Some(failure(e)?),
            ..Default::default()
        }),
    }
}
