use tonic::Status;

use super::failure;
use super::success;
use crate::domain::user::errors::AuthError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::RegisterRequest;
use crate::proto::auth::RegisterResponse;

impl TryFrom<RegisterRequest> for RegisterCommand {
    type Error = AuthError;

    fn try_from(request: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: EmailAddress::new(request.email)?,
            username: Username::new(request.username)?,
            password: Password::new(request.password)?,
            first_name: PersonName::new(request.first_name)?,
            last_name: PersonName::new(request.last_name)?,
        })
    }
}

pub async fn register<S: AuthServicePort>(
    service: &S,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    tracing::info!(email = %request.email, username = %request.username, "Register request");

    let outcome = match RegisterCommand::try_from(request) {
        Ok(command) => service.register(command).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(registration) => Ok(RegisterResponse {
            response: Some(success("User registered successfully")),
            expires_at: registration.access_token.expires_at.timestamp(),
            access_token: registration.access_token.token,
            user: Some(registration.user.into()),
        }),
        Err(e) => Ok(RegisterResponse {
            response: Some(failure(e)?),
            ..Default::default()
        }),
    }
}
