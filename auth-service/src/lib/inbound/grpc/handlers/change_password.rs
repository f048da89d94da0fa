use tonic::Status;

use super::authorize;
use super::failure;
use super::success;
use crate::domain::user::errors::AuthError;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::ChangePasswordRequest;
use crate::proto::auth::ChangePasswordResponse;

pub async fn change_password<S: AuthServicePort>(
    service: &S,
    request: ChangePasswordRequest,
) -> Result<ChangePasswordResponse, Status> {
    let outcome = async move {
        let user_id = authorize(service, &request.token, &request.user_id, false).await?;
        if request.current_password.is_empty() {
            return Err(AuthError::Validation(
                "Current password is required".to_string(),
            ));
        }
        let command = ChangePasswordCommand {
            current_password: request.current_password,
            new_password: Password::new(request.new_password)?,
        };
        service.change_password(&user_id, command).await
    }
    .await;

    let response = match outcome {
        Ok(()) => success("Password changed successfully"),
        Err(e) => failure(e)?,
    };

    Ok(ChangePasswordResponse {
        response: Some(response),
    })
}
