use tonic::Status;

use super::failure;
use super::success;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::ValidateTokenRequest;
use crate::proto::auth::ValidateTokenResponse;

pub async fn validate_token<S: AuthServicePort>(
    service: &S,
    request: ValidateTokenRequest,
) -> Result<ValidateTokenResponse, Status> {
    match service.validate_token(&request.token).await {
        Ok(user) => Ok(ValidateTokenResponse {
            response: Some(success("Token is valid")),
            valid: true,
            user: Some(user.into()),
        }),
        Err(e) => Ok(ValidateTokenResponse {
            response: Some(failure(e)?),
            valid: false,
            user: None,
        }),
    }
}
