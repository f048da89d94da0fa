#[cfg(feature = "test-utils")]
pub mod memory;
pub mod refresh_token;
pub mod user;

#[cfg(feature = "test-utils")]
pub use memory::InMemoryCredentialStore;
pub use refresh_token::PostgresRefreshTokenRepository;
pub use user::PostgresUserRepository;
