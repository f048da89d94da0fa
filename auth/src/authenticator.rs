use crate::jwt::Claims;
use crate::jwt::TokenError;
use crate::jwt::TokenManager;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::RefreshSecret;

/// Credential coordinator combining password hashing, token signing and
/// refresh secret generation.
///
/// Built once at startup from the signing secret and shared behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_manager: TokenManager,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for access token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_manager: TokenManager::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    ///
    /// A mismatch and an unreadable stored hash both yield
    /// `InvalidCredentials`; the caller never learns which.
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(AuthenticationError::InvalidCredentials),
        }
    }

    /// Sign an access token for the given claims.
    pub fn issue_access_token(&self, claims: &Claims) -> Result<String, TokenError> {
        self.token_manager.issue(claims)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `Expired` - Token is past its expiry
    /// * `Malformed` - Signature or structure is invalid
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_manager.validate(token)
    }

    /// Generate a fresh refresh secret.
    pub fn issue_refresh_secret(&self) -> RefreshSecret {
        RefreshSecret::generate()
    }
}
