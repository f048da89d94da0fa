use std::future::Future;
use std::time::Duration;

use anyhow::Error;
use tonic::transport::Channel;
use tonic::transport::Endpoint;
use tonic::Code;
use tonic::Request;
use tonic::Response;
use tonic::Status;

use crate::config::AuthServiceConfig;
use crate::domain::identity::errors::FailureKind;
use crate::domain::identity::errors::GatewayError;
use crate::domain::identity::models::AccessToken;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::PasswordChange;
use crate::domain::identity::models::ProfileUpdate;
use crate::domain::identity::models::RegisteredUser;
use crate::domain::identity::models::Registration;
use crate::domain::identity::models::RotatedTokens;
use crate::domain::identity::models::Session;
use crate::domain::identity::models::UpstreamHealth;
use crate::domain::identity::models::User;
use crate::domain::identity::ports::AuthServicePort;
use crate::proto::auth::auth_service_client::AuthServiceClient;
use crate::proto::auth::ChangePasswordRequest;
use crate::proto::auth::GetUserRequest;
use crate::proto::auth::LoginRequest;
use crate::proto::auth::RefreshTokenRequest;
use crate::proto::auth::RegisterRequest;
use crate::proto::auth::UpdateProfileRequest;
use crate::proto::auth::User as ProtoUser;
use crate::proto::auth::ValidateTokenRequest;
use crate::proto::common::ErrorCode;
use crate::proto::common::HealthCheckRequest;
use crate::proto::common::Response as Envelope;

pub struct GrpcAuthServiceClient {
    client: AuthServiceClient<Channel>,
    validate_timeout: Duration,
    request_timeout: Duration,
}

impl GrpcAuthServiceClient {
    /// Build a client that connects on first use, so the gateway can start
    /// before the auth service does.
    pub fn new(config: &AuthServiceConfig) -> Result<Self, Error> {
        let channel = Endpoint::from_shared(config.grpc_url.clone())?.connect_lazy();
        Ok(Self {
            client: AuthServiceClient::new(channel),
            validate_timeout: config.validate_timeout(),
            request_timeout: config.request_timeout(),
        })
    }

    fn request<T>(message: T, deadline: Duration) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(deadline);
        request
    }

    /// Run one call under a local deadline; dropping the future cancels it.
    async fn call<T, F>(deadline: Duration, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<Response<T>, Status>>,
    {
        match tokio::time::timeout(deadline, call).await {
            Ok(Ok(response)) => Ok(response.into_inner()),
            Ok(Err(status)) => Err(GatewayError::from(status)),
            Err(_) => Err(GatewayError::Timeout),
        }
    }
}

impl From<Status> for GatewayError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::Unavailable => GatewayError::Unavailable(status.message().to_string()),
            Code::DeadlineExceeded => GatewayError::Timeout,
            _ => GatewayError::Transport(status.message().to_string()),
        }
    }
}

impl From<ErrorCode> for FailureKind {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Validation => FailureKind::Validation,
            ErrorCode::AlreadyExists => FailureKind::AlreadyExists,
            ErrorCode::InvalidCredentials => FailureKind::InvalidCredentials,
            ErrorCode::AccountDisabled => FailureKind::AccountDisabled,
            ErrorCode::NotFound => FailureKind::NotFound,
            ErrorCode::TokenExpired => FailureKind::TokenExpired,
            ErrorCode::TokenMalformed => FailureKind::TokenMalformed,
            ErrorCode::InvalidToken => FailureKind::InvalidToken,
            ErrorCode::Forbidden => FailureKind::Forbidden,
            ErrorCode::Internal => FailureKind::Internal,
            ErrorCode::Unspecified => FailureKind::Unspecified,
        }
    }
}

impl From<ProtoUser> for User {
    fn from(user: ProtoUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Turn a `{success: false}` envelope into a typed rejection.
fn check(envelope: Option<Envelope>) -> Result<(), GatewayError> {
    let envelope = envelope
        .ok_or_else(|| GatewayError::InvalidResponse("missing response envelope".to_string()))?;

    if envelope.success {
        Ok(())
    } else {
        Err(GatewayError::rejected(
            envelope.code().into(),
            envelope.message,
        ))
    }
}

fn require_user(user: Option<ProtoUser>) -> Result<User, GatewayError> {
    user.map(User::from)
        .ok_or_else(|| GatewayError::InvalidResponse("missing user".to_string()))
}

#[async_trait::async_trait]
impl AuthServicePort for GrpcAuthServiceClient {
    async fn register(&self, registration: Registration) -> Result<RegisteredUser, GatewayError> {
        let request = Self::request(
            RegisterRequest {
                email: registration.email,
                username: registration.username,
                password: registration.password,
                first_name: registration.first_name,
                last_name: registration.last_name,
            },
            self.request_timeout,
        );

        let mut client = self.client.clone();
        let response = Self::call(self.request_timeout, client.register(request)).await?;
        check(response.response)?;

        Ok(RegisteredUser {
            user: require_user(response.user)?,
            access_token: AccessToken {
                token: response.access_token,
                expires_at: response.expires_at,
            },
        })
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, GatewayError> {
        let request = Self::request(
            LoginRequest {
                email: credentials.email,
                password: credentials.password,
            },
            self.request_timeout,
        );

        let mut client = self.client.clone();
        let response = Self::call(self.request_timeout, client.login(request)).await?;
        check(response.response)?;

        Ok(Session {
            user: require_user(response.user)?,
            access_token: AccessToken {
                token: response.access_token,
                expires_at: response.expires_at,
            },
            refresh_token: response.refresh_token,
        })
    }

    async fn validate_token(&self, token: &str) -> Result<User, GatewayError> {
        let request = Self::request(
            ValidateTokenRequest {
                token: token.to_string(),
            },
            self.validate_timeout,
        );

        let mut client = self.client.clone();
        let response = Self::call(self.validate_timeout, client.validate_token(request)).await?;
        check(response.response)?;

        if !response.valid {
            return Err(GatewayError::rejected(
                FailureKind::InvalidToken,
                "Invalid token",
            ));
        }

        require_user(response.user)
    }

    async fn get_user(&self, user_id: &str, token: &str) -> Result<User, GatewayError> {
        let request = Self::request(
            GetUserRequest {
                user_id: user_id.to_string(),
                token: token.to_string(),
            },
            self.request_timeout,
        );

        let mut client = self.client.clone();
        let response = Self::call(self.request_timeout, client.get_user(request)).await?;
        check(response.response)?;

        require_user(response.user)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        token: &str,
        update: ProfileUpdate,
    ) -> Result<User, GatewayError> {
        let request = Self::request(
            UpdateProfileRequest {
                user_id: user_id.to_string(),
                token: token.to_string(),
                first_name: update.first_name,
                last_name: update.last_name,
                username: update.username,
            },
            self.request_timeout,
        );

        let mut client = self.client.clone();
        let response = Self::call(self.request_timeout, client.update_profile(request)).await?;
        check(response.response)?;

        require_user(response.user)
    }

    async fn change_password(
        &self,
        user_id: &str,
        token: &str,
        change: PasswordChange,
    ) -> Result<(), GatewayError> {
        let request = Self::request(
            ChangePasswordRequest {
                user_id: user_id.to_string(),
                token: token.to_string(),
                current_password: change.current_password,
                new_password: change.new_password,
            },
            self.request_timeout,
        );

        let mut client = self.client.clone();
        let response = Self::call(self.request_timeout, client.change_password(request)).await?;
        check(response.response)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RotatedTokens, GatewayError> {
        let request = Self::request(
            RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            },
            self.request_timeout,
        );

        let mut client = self.client.clone();
        let response = Self::call(self.request_timeout, client.refresh_token(request)).await?;
        check(response.response)?;

        Ok(RotatedTokens {
            access_token: AccessToken {
                token: response.access_token,
                expires_at: response.expires_at,
            },
            refresh_token: response.refresh_token,
        })
    }

    async fn health_check(&self) -> Result<UpstreamHealth, GatewayError> {
        let request = Self::request(HealthCheckRequest {}, self.validate_timeout);

        let mut client = self.client.clone();
        let response = Self::call(self.validate_timeout, client.health_check(request)).await?;

        Ok(UpstreamHealth {
            status: response.status,
            service: response.service,
            timestamp: response.timestamp,
        })
    }
}
