use async_trait::async_trait;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginSession;
use crate::domain::user::models::RefreshToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Registration;
use crate::domain::user::models::RotatedTokens;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::AuthError;

/// Port for identity and session operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue an access token.
    ///
    /// No refresh token is issued at registration.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AuthError>;

    /// Authenticate with email and password.
    ///
    /// Email matching is case-insensitive. Issues an access token and a new
    /// refresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `AccountDisabled` - Account is inactive, whatever the password
    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthError>;

    /// Resolve an access token to its live, active user.
    ///
    /// # Errors
    /// * `Token` - Token is expired or malformed
    /// * `NotFound` - Subject no longer exists
    /// * `AccountDisabled` - Subject is inactive
    async fn validate_token(&self, token: &str) -> Result<User, AuthError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, AuthError>;

    /// Apply a partial profile update.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is held by another user
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, AuthError>;

    /// Replace the password after verifying the current one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `InvalidCredentials` - Current password is wrong
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError>;

    /// Exchange a refresh secret for a new access token and a new refresh
    /// secret. Once exchanged, the presented secret can never be used again.
    /// A refresh refused because of the owner leaves the secret untouched.
    ///
    /// # Errors
    /// * `InvalidToken` - Secret is unknown, expired, or already redeemed
    /// * `NotFound` - Owner no longer exists
    /// * `AccountDisabled` - Owner is inactive
    async fn refresh_token(&self, refresh_token: &str) -> Result<RotatedTokens, AuthError>;

    /// Delete expired refresh tokens. Returns the number removed.
    async fn purge_expired_refresh_tokens(&self) -> Result<u64, AuthError>;
}

/// Port for user persistence.
///
/// Implementations enforce email and username uniqueness and report
/// violations as `EmailAlreadyExists` / `UsernameAlreadyExists`.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn create(&self, user: User) -> Result<User, AuthError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;

    /// Persist profile fields, role and active flag.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update(&self, user: User) -> Result<User, AuthError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), AuthError>;

    /// Delete a user along with all of their refresh tokens.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn delete(&self, id: &UserId) -> Result<(), AuthError>;
}

/// Port for refresh token persistence.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, AuthError>;

    /// Unexpired token with this fingerprint, left in place.
    async fn find_valid(&self, token_hash: &str) -> Result<Option<RefreshToken>, AuthError>;

    /// Atomically delete and return the unexpired token with this
    /// fingerprint. Of several concurrent callers at most one gets `Some`.
    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshToken>, AuthError>;

    /// Delete every expired token. Returns the number removed.
    async fn delete_expired(&self) -> Result<u64, AuthError>;
}
