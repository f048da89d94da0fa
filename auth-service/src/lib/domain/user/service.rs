use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use auth::RefreshSecret;
use auth::TokenError;
use chrono::Utc;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginSession;
use crate::domain::user::models::RefreshToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Registration;
use crate::domain::user::models::RotatedTokens;
use crate::domain::user::models::TokenPolicy;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::DEFAULT_ROLE;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::RefreshTokenRepository;
use crate::user::ports::UserRepository;

/// Domain service implementation for identity and session operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: Arc<TR>,
    authenticator: Arc<Authenticator>,
    policy: TokenPolicy,
}

impl<UR, TR> AuthService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `authenticator` - Password hashing and token signing
    /// * `policy` - Access and refresh token lifetimes
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<TR>,
        authenticator: Arc<Authenticator>,
        policy: &TokenPolicy,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            authenticator,
            policy: *policy,
        }
    }

    fn issue_access_token(&self, user: &User) -> Result<AccessToken, AuthError> {
        let claims = Claims::for_user(
            user.id,
            user.email.as_str(),
            user.username.as_str(),
            &user.role,
            self.policy.access_token_ttl,
        );
        let token = self
            .authenticator
            .issue_access_token(&claims)
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?;

        Ok(AccessToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    async fn issue_refresh_token(&self, user_id: &UserId) -> Result<RefreshSecret, AuthError> {
        let secret = self.authenticator.issue_refresh_secret();
        let token = RefreshToken::new(
            *user_id,
            secret.fingerprint(),
            self.policy.refresh_token_ttl,
        );
        self.refresh_tokens.save(token).await?;
        Ok(secret)
    }

    async fn active_user(&self, id: &UserId) -> Result<User, AuthError> {
        let user = self.get_user(id).await?;
        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }
        Ok(user)
    }
}

#[async_trait]
impl<UR, TR> AuthServicePort for AuthService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AuthError> {
        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists(command.email.to_string()));
        }
        if self
            .users
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: command.email,
            username: command.username,
            password_hash,
            first_name: command.first_name.into_string(),
            last_name: command.last_name.into_string(),
            role: DEFAULT_ROLE.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        // The store's unique constraints still catch a concurrent duplicate.
        let user = self.users.create(user).await?;
        let access_token = self.issue_access_token(&user)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(Registration { user, access_token })
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthError> {
        let email =
            EmailAddress::new(email.to_string()).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        self.authenticator
            .verify_credentials(password, &user.password_hash)?;

        let access_token = self.issue_access_token(&user)?;
        let refresh_token = self.issue_refresh_token(&user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginSession {
            user,
            access_token,
            refresh_token,
        })
    }

    async fn validate_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .authenticator
            .validate_access_token(token)
            .map_err(AuthError::Token)?;

        let user_id = UserId::from_string(&claims.sub).map_err(|_| {
            AuthError::Token(TokenError::Malformed(
                "subject is not a user id".to_string(),
            ))
        })?;

        self.active_user(&user_id).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound(id.to_string()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, AuthError> {
        let mut user = self.get_user(id).await?;

        if let Some(first_name) = command.first_name {
            user.first_name = first_name.into_string();
        }

        if let Some(last_name) = command.last_name {
            user.last_name = last_name.into_string();
        }

        if let Some(username) = command.username {
            if username != user.username {
                if let Some(holder) = self.users.find_by_username(&username).await? {
                    if holder.id != user.id {
                        return Err(AuthError::UsernameAlreadyExists(username.to_string()));
                    }
                }
                user.username = username;
            }
        }

        user.updated_at = Utc::now();
        self.users.update(user).await
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError> {
        let user = self.get_user(id).await?;

        self.authenticator
            .verify_credentials(&command.current_password, &user.password_hash)?;

        let password_hash = self
            .authenticator
            .hash_password(command.new_password.as_str())?;
        self.users.update_password(&user.id, &password_hash).await?;

        tracing::info!(user_id = %user.id, "Password changed");

        Ok(())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RotatedTokens, AuthError> {
        let token_hash = auth::refresh::fingerprint(refresh_token);

        let stored = self
            .refresh_tokens
            .find_valid(&token_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let user = self.active_user(&stored.user_id).await?;

        // Only one concurrent redemption gets the row back.
        self.refresh_tokens
            .consume(&token_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let access_token = self.issue_access_token(&user)?;
        let refresh_token = self.issue_refresh_token(&user.id).await?;

        tracing::info!(user_id = %user.id, "Refresh token rotated");

        Ok(RotatedTokens {
            access_token,
            refresh_token,
        })
    }

    async fn purge_expired_refresh_tokens(&self) -> Result<u64, AuthError> {
        self.refresh_tokens.delete_expired().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::PersonName;
    use crate::domain::user::models::Username;

    const SECRET: &[u8] = b"unit_test_secret_key_of_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, AuthError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;
            async fn update(&self, user: User) -> Result<User, AuthError>;
            async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), AuthError>;
            async fn delete(&self, id: &UserId) -> Result<(), AuthError>;
        }
    }

    mock! {
        pub TestRefreshTokenRepository {}

        #[async_trait]
        impl RefreshTokenRepository for TestRefreshTokenRepository {
            async fn save(&self, token: RefreshToken) -> Result<RefreshToken, AuthError>;
            async fn find_valid(&self, token_hash: &str) -> Result<Option<RefreshToken>, AuthError>;
            async fn consume(&self, token_hash: &str) -> Result<Option<RefreshToken>, AuthError>;
            async fn delete_expired(&self) -> Result<u64, AuthError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET))
    }

    fn service(
        users: MockTestUserRepository,
        refresh_tokens: MockTestRefreshTokenRepository,
    ) -> AuthService<MockTestUserRepository, MockTestRefreshTokenRepository> {
        AuthService::new(
            Arc::new(users),
            Arc::new(refresh_tokens),
            authenticator(),
            &TokenPolicy::default(),
        )
    }

    fn user_with_password(password: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: authenticator().hash_password(password).unwrap(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            role: DEFAULT_ROLE.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand {
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            username: Username::new("alice".to_string()).unwrap(),
            password: Password::new("secret123".to_string()).unwrap(),
            first_name: PersonName::new("Alice".to_string()).unwrap(),
            last_name: PersonName::new("Smith".to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        users
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "alice@example.com"
                    && user.role == "user"
                    && user.is_active
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens.expect_save().times(0);

        let service = service(users, refresh_tokens);
        let registration = service.register(register_command()).await.unwrap();

        assert_eq!(registration.user.first_name, "Alice");
        let claims = authenticator()
            .validate_access_token(&registration.access_token.token)
            .unwrap();
        assert_eq!(claims.sub, registration.user.id.to_string());
        assert_eq!(claims.role, "user");
        assert_eq!(claims.expires_at(), registration.access_token.expires_at);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockTestUserRepository::new();
        let existing = user_with_password("secret123");
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().times(0);

        let service = service(users, MockTestRefreshTokenRepository::new());
        let result = service.register(register_command()).await;

        assert!(matches!(result, Err(AuthError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut users = MockTestUserRepository::new();
        let existing = user_with_password("secret123");
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        users
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().times(0);

        let service = service(users, MockTestRefreshTokenRepository::new());
        let result = service.register(register_command()).await;

        assert!(matches!(result, Err(AuthError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_lost_race_reports_conflict() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .times(1)
            .returning(|user| Err(AuthError::EmailAlreadyExists(user.email.to_string())));

        let service = service(users, MockTestRefreshTokenRepository::new());
        let result = service.register(register_command()).await;

        assert!(matches!(result, Err(AuthError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success_persists_refresh_fingerprint() {
        let user = user_with_password("secret123");
        let user_id = user.id;

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email.as_str() == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens
            .expect_save()
            .withf(move |token| {
                token.user_id == user_id
                    && token.token_hash.len() == 64
                    && token.expires_at > Utc::now() + Duration::days(29)
            })
            .times(1)
            .returning(|token| Ok(token));

        let service = service(users, refresh_tokens);
        let session = service
            .login("Alice@Example.COM", "secret123")
            .await
            .unwrap();

        assert_eq!(session.user.id, user_id);
        assert!(!session.refresh_token.as_str().is_empty());
        assert!(!session.access_token.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = user_with_password("secret123");
        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens.expect_save().times(0);

        let service = service(users, refresh_tokens);
        let result = service.login("alice@example.com", "wrongpass").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let service = service(users, MockTestRefreshTokenRepository::new());
        let result = service.login("nobody@example.com", "secret123").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_disabled_account() {
        let mut user = user_with_password("secret123");
        user.is_active = false;
        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens.expect_save().times(0);

        let service = service(users, refresh_tokens);
        let correct = service.login("alice@example.com", "secret123").await;
        let wrong = service.login("alice@example.com", "wrongpass").await;

        assert!(matches!(correct, Err(AuthError::AccountDisabled)));
        assert!(matches!(wrong, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn test_validate_token_success() {
        let user = user_with_password("secret123");
        let user_id = user.id;
        let claims = Claims::for_user(user.id, "alice@example.com", "alice", "user", Duration::hours(1));
        let token = authenticator().issue_access_token(&claims).unwrap();

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(users, MockTestRefreshTokenRepository::new());
        let resolved = service.validate_token(&token).await.unwrap();

        assert_eq!(resolved.id, user_id);
    }

    #[tokio::test]
    async fn test_validate_token_expired() {
        let claims = Claims::for_user(UserId::new(), "a@b.io", "alice", "user", Duration::seconds(-30));
        let token = authenticator().issue_access_token(&claims).unwrap();

        let mut users = MockTestUserRepository::new();
        users.expect_find_by_id().times(0);

        let service = service(users, MockTestRefreshTokenRepository::new());
        let result = service.validate_token(&token).await;

        assert!(matches!(result, Err(AuthError::Token(TokenError::Expired))));
    }

    #[tokio::test]
    async fn test_validate_token_garbage() {
        let service = service(
            MockTestUserRepository::new(),
            MockTestRefreshTokenRepository::new(),
        );
        let result = service.validate_token("garbage").await;

        assert!(matches!(
            result,
            Err(AuthError::Token(TokenError::Malformed(_)))
        ));
    }

    #[tokio::test]
    async fn test_validate_token_disabled_after_issue() {
        let mut user = user_with_password("secret123");
        let claims = Claims::for_user(user.id, "alice@example.com", "alice", "user", Duration::hours(1));
        let token = authenticator().issue_access_token(&claims).unwrap();
        user.is_active = false;

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(users, MockTestRefreshTokenRepository::new());
        let result = service.validate_token(&token).await;

        assert!(matches!(result, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn test_validate_token_deleted_user() {
        let claims = Claims::for_user(UserId::new(), "a@b.io", "alice", "user", Duration::hours(1));
        let token = authenticator().issue_access_token(&claims).unwrap();

        let mut users = MockTestUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = service(users, MockTestRefreshTokenRepository::new());
        let result = service.validate_token(&token).await;

        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let user = user_with_password("secret123");
        let user_id = user.id;

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_find_by_username().times(0);
        users
            .expect_update()
            .withf(|user| {
                user.first_name == "Alicia"
                    && user.last_name == "Smith"
                    && user.username.as_str() == "alice"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = service(users, MockTestRefreshTokenRepository::new());
        let command = UpdateProfileCommand {
            first_name: Some(PersonName::new("Alicia".to_string()).unwrap()),
            ..Default::default()
        };
        let updated = service.update_profile(&user_id, command).await.unwrap();

        assert_eq!(updated.first_name, "Alicia");
    }

    #[tokio::test]
    async fn test_update_profile_username_taken() {
        let user = user_with_password("secret123");
        let user_id = user.id;
        let mut other = user_with_password("secret123");
        other.id = UserId::new();
        other.username = Username::new("bob".to_string()).unwrap();

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(other.clone())));
        users.expect_update().times(0);

        let service = service(users, MockTestRefreshTokenRepository::new());
        let command = UpdateProfileCommand {
            username: Some(Username::new("bob".to_string()).unwrap()),
            ..Default::default()
        };
        let result = service.update_profile(&user_id, command).await;

        assert!(matches!(result, Err(AuthError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let user = user_with_password("secret123");
        let user_id = user.id;

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_update_password().times(0);

        let service = service(users, MockTestRefreshTokenRepository::new());
        let command = ChangePasswordCommand {
            current_password: "not-it".to_string(),
            new_password: Password::new("newsecret456".to_string()).unwrap(),
        };
        let result = service.change_password(&user_id, command).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let user = user_with_password("secret123");
        let user_id = user.id;

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_update_password()
            .withf(move |id, hash| {
                *id == user_id
                    && authenticator()
                        .verify_credentials("newsecret456", hash)
                        .is_ok()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(users, MockTestRefreshTokenRepository::new());
        let command = ChangePasswordCommand {
            current_password: "secret123".to_string(),
            new_password: Password::new("newsecret456".to_string()).unwrap(),
        };

        assert!(service.change_password(&user_id, command).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_token_rotates() {
        let user = user_with_password("secret123");
        let user_id = user.id;
        let stored = RefreshToken::new(
            user_id,
            auth::refresh::fingerprint("presented"),
            Duration::days(30),
        );
        let consumed = stored.clone();

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .returning(move |_| Ok(Some(user.clone())));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_valid()
            .withf(|hash| hash == auth::refresh::fingerprint("presented"))
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        refresh_tokens
            .expect_consume()
            .withf(|hash| hash == auth::refresh::fingerprint("presented"))
            .times(1)
            .returning(move |_| Ok(Some(consumed.clone())));
        refresh_tokens
            .expect_save()
            .withf(move |token| {
                token.user_id == user_id
                    && token.token_hash != auth::refresh::fingerprint("presented")
            })
            .times(1)
            .returning(|token| Ok(token));

        let service = service(users, refresh_tokens);
        let rotated = service.refresh_token("presented").await.unwrap();

        assert_ne!(rotated.refresh_token.as_str(), "presented");
        let claims = authenticator()
            .validate_access_token(&rotated.access_token.token)
            .unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[tokio::test]
    async fn test_refresh_token_unknown_or_redeemed() {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_id().times(0);

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens.expect_find_valid().returning(|_| Ok(None));
        refresh_tokens.expect_consume().times(0);
        refresh_tokens.expect_save().times(0);

        let service = service(users, refresh_tokens);
        let result = service.refresh_token("never-issued").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_token_lost_race() {
        let user = user_with_password("secret123");
        let stored = RefreshToken::new(user.id, "hash".to_string(), Duration::days(30));

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_valid()
            .returning(move |_| Ok(Some(stored.clone())));
        refresh_tokens.expect_consume().times(1).returning(|_| Ok(None));
        refresh_tokens.expect_save().times(0);

        let service = service(users, refresh_tokens);
        let result = service.refresh_token("presented").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_token_disabled_owner_keeps_secret() {
        let mut user = user_with_password("secret123");
        user.is_active = false;
        let stored = RefreshToken::new(user.id, "hash".to_string(), Duration::days(30));

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_valid()
            .returning(move |_| Ok(Some(stored.clone())));
        refresh_tokens.expect_consume().times(0);
        refresh_tokens.expect_save().times(0);

        let service = service(users, refresh_tokens);
        let result = service.refresh_token("presented").await;

        assert!(matches!(result, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn test_refresh_token_deleted_owner() {
        let stored = RefreshToken::new(UserId::new(), "hash".to_string(), Duration::days(30));

        let mut users = MockTestUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_valid()
            .returning(move |_| Ok(Some(stored.clone())));
        refresh_tokens.expect_consume().times(0);
        refresh_tokens.expect_save().times(0);

        let service = service(users, refresh_tokens);
        let result = service.refresh_token("presented").await;

        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_purge_expired_refresh_tokens() {
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();
        refresh_tokens
            .expect_delete_expired()
            .times(1)
            .returning(|| Ok(3));

        let service = service(MockTestUserRepository::new(), refresh_tokens);

        assert_eq!(service.purge_expired_refresh_tokens().await.unwrap(), 3);
    }
}
