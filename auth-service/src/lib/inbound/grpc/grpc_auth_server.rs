use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::change_password;
use super::handlers::get_user;
use super::handlers::health_check;
use super::handlers::login;
use super::handlers::refresh_token;
use super::handlers::register;
use super::handlers::update_profile;
use super::handlers::validate_token;
use crate::domain::user::ports::AuthServicePort;
use crate::proto::auth::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::auth::ChangePasswordRequest;
use crate::proto::auth::ChangePasswordResponse;
use crate::proto::auth::GetUserRequest;
use crate::proto::auth::GetUserResponse;
use crate::proto::auth::LoginRequest;
use crate::proto::auth::LoginResponse;
use crate::proto::auth::RefreshTokenRequest;
use crate::proto::auth::RefreshTokenResponse;
use crate::proto::auth::RegisterRequest;
use crate::proto::auth::RegisterResponse;
use crate::proto::auth::UpdateProfileRequest;
use crate::proto::auth::UpdateProfileResponse;
use crate::proto::auth::ValidateTokenRequest;
use crate::proto::auth::ValidateTokenResponse;
use crate::proto::common::HealthCheckRequest;
use crate::proto::common::HealthCheckResponse;

/// gRPC adapter over any `AuthServicePort` implementation.
pub struct AuthGrpcService<S: AuthServicePort> {
    service: Arc<S>,
}

impl<S: AuthServicePort> AuthGrpcService<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<S: AuthServicePort> AuthServiceProto for AuthGrpcService<S> {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let response = register::register(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let response = login::login(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn validate_token(
        &self,
        request: Request<ValidateTokenRequest>,
    ) -> Result<Response<ValidateTokenResponse>, Status> {
        let response =
            validate_token::validate_token(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let response = get_user::get_user(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn update_profile(
        &self,
        request: Request<UpdateProfileRequest>,
    ) -> Result<Response<UpdateProfileResponse>, Status> {
        let response =
            update_profile::update_profile(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn change_password(
        &self,
        request: Request<ChangePasswordRequest>,
    ) -> Result<Response<ChangePasswordResponse>, Status> {
        let response =
            change_password::change_password(self.service.as_ref(), request.into_inner())
                .await?;
        Ok(Response::new(response))
    }

    async fn refresh_token(
        &self,
        request: Request<RefreshTokenRequest>,
    ) -> Result<Response<RefreshTokenResponse>, Status> {
        let response =
            refresh_token::refresh_token(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn health_check(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        Ok(Response::new(health_check::health_check()))
    }
}
