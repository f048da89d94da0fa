//! Credential primitives shared by the auth service.
//!
//! - Password hashing (Argon2id)
//! - Access token issuance and validation (HS256 JWT)
//! - Refresh secret generation and fingerprinting (SHA-256)
//!
//! The service crates own the identity rules; this crate only knows how to
//! hash, sign and verify.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Claims, TokenManager};
//! use chrono::Duration;
//!
//! let manager = TokenManager::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::for_user("user123", "alice@example.com", "alice", "user", Duration::hours(24));
//! let token = manager.issue(&claims).unwrap();
//! let decoded = manager.validate(&token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```
//!
//! ## Refresh Secrets
//! ```
//! use auth::refresh::fingerprint;
//! use auth::RefreshSecret;
//!
//! let secret = RefreshSecret::generate();
//! assert_eq!(secret.fingerprint(), fingerprint(secret.as_str()));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod refresh;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenManager;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::RefreshSecret;
