use tonic::Status;

use super::authorize;
use super::failure;
use super::success;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::GetUserRequest;
use crate::proto::auth::GetUserResponse;

pub async fn get_user<S: AuthServicePort>(
    service: &S,
    request: GetUserRequest,
) -> Result<GetUserResponse, Status> {
    let outcome = match authorize(service, &request.token, &request.user_id, true).await {
        Ok(user_id) => service.get_user(&user_id).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(user) => Ok(GetUserResponse {
            response: Some(success("User retrieved successfully")),
            user: Some(user.into()),
        }),
        Err(e) => Ok(GetUserResponse {
            response: Some(failure(e)?),
            user: None,
        }),
    }
}
