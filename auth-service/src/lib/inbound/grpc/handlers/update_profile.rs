use tonic::Status;

use super::authorize;
use super::failure;
use super::provided;
use super::success;
use crate::domain::user::errors::AuthError;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::UpdateProfileRequest;
use crate::proto::auth::UpdateProfileResponse;

impl TryFrom<&UpdateProfileRequest> for UpdateProfileCommand {
    type Error = AuthError;

    fn try_from(request: &UpdateProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: provided(request.first_name.clone())
                .map(PersonName::new)
                .transpose()?,
            last_name: provided(request.last_name.clone())
                .map(PersonName::new)
                .transpose()?,
            username: provided(request.username.clone())
                .map(Username::new)
                .transpose()?,
        })
    }
}

pub async fn update_profile<S: AuthServicePort>(
    service: &S,
    request: UpdateProfileRequest,
) -> Result<UpdateProfileResponse, Status> {
    let outcome = async move {
        let user_id = authorize(service, &request.token, &request.user_id, false).await?;
        let command = UpdateProfileCommand::try_from(&request)?;
        service.update_profile(&user_id, command).await
    }
    .await;

    match outcome {
        Ok(user) => Ok(UpdateProfileResponse {
            response: Some(success("Profile updated successfully")),
            user: Some(user.into()),
        }),
        Err(e) => Ok(UpdateProfileResponse {
            response: Some(failure(e)?),
            user: None,
        }),
    }
}
