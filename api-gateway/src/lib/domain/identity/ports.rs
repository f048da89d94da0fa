use async_trait::async_trait;

use crate::domain::identity::errors::GatewayError;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::PasswordChange;
use crate::domain::identity::models::ProfileUpdate;
use crate::domain::identity::models::RegisteredUser;
use crate::domain::identity::models::Registration;
use crate::domain::identity::models::RotatedTokens;
use crate::domain::identity::models::Session;
use crate::domain::identity::models::UpstreamHealth;
use crate::domain::identity::models::User;

/// Port for auth-service communication (via gRPC).
///
/// Token-gated calls forward the caller's own token so the auth service can
/// authorize them.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    async fn register(&self, registration: Registration) -> Result<RegisteredUser, GatewayError>;

    async fn login(&self, credentials: Credentials) -> Result<Session, GatewayError>;

    /// Resolve a bearer token to its user. Uses the short validation deadline.
    async fn validate_token(&self, token: &str) -> Result<User, GatewayError>;

    async fn get_user(&self, user_id: &str, token: &str) -> Result<User, GatewayError>;

    async fn update_profile(
        &self,
        user_id: &str,
        token: &str,
        update: ProfileUpdate,
    ) -> Result<User, GatewayError>;

    async fn change_password(
        &self,
        user_id: &str,
        token: &str,
        change: PasswordChange,
    ) -> Result<(), GatewayError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<RotatedTokens, GatewayError>;

    async fn health_check(&self) -> Result<UpstreamHealth, GatewayError>;
}
