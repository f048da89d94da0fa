use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RefreshToken;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::RefreshTokenRepository;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::AuthError;

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    refresh_tokens: HashMap<Uuid, RefreshToken>,
}

/// Process-local store implementing both repositories, with the same
/// uniqueness and cascade rules as the Postgres schema.
///
/// Share one `Arc<InMemoryCredentialStore>` as both repositories.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    state: Mutex<StoreState>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, AuthError> {
        self.state
            .lock()
            .map_err(|_| AuthError::DatabaseError("credential store lock poisoned".to_string()))
    }

    /// Flip a user's active flag, as an operator would.
    pub fn set_active(&self, id: &UserId, is_active: bool) -> Result<(), AuthError> {
        let mut state = self.state()?;
        let user = state
            .users
            .get_mut(id)
            .ok_or(AuthError::NotFound(id.to_string()))?;
        user.is_active = is_active;
        Ok(())
    }

    /// Grant or revoke a role.
    pub fn set_role(&self, id: &UserId, role: &str) -> Result<(), AuthError> {
        let mut state = self.state()?;
        let user = state
            .users
            .get_mut(id)
            .ok_or(AuthError::NotFound(id.to_string()))?;
        user.role = role.to_string();
        Ok(())
    }

    /// Number of stored refresh tokens, expired or not, owned by `id`.
    pub fn refresh_token_count(&self, id: &UserId) -> Result<usize, AuthError> {
        let state = self.state()?;
        Ok(state
            .refresh_tokens
            .values()
            .filter(|token| token.user_id == *id)
            .count())
    }

    /// Push every stored refresh token of `id` into the past.
    pub fn expire_refresh_tokens(&self, id: &UserId) -> Result<(), AuthError> {
        let mut state = self.state()?;
        let past = Utc::now() - chrono::Duration::seconds(1);
        state
            .refresh_tokens
            .values_mut()
            .filter(|token| token.user_id == *id)
            .for_each(|token| token.expires_at = past);
        Ok(())
    }
}

impl StoreState {
    fn live_token(&self, token_hash: &str, now: DateTime<Utc>) -> Option<&RefreshToken> {
        self.refresh_tokens
            .values()
            .find(|token| token.token_hash == token_hash && !token.is_expired(now))
    }

    fn conflict(&self, user: &User) -> Option<AuthError> {
        self.users.values().filter(|u| u.id != user.id).find_map(|u| {
            if u.email == user.email {
                Some(AuthError::EmailAlreadyExists(user.email.to_string()))
            } else if u.username == user.username {
                Some(AuthError::UsernameAlreadyExists(user.username.to_string()))
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryCredentialStore {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut state = self.state()?;
        if let Some(err) = state.conflict(&user) {
            return Err(err);
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        Ok(self.state()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let mut state = self.state()?;
        if let Some(err) = state.conflict(&user) {
            return Err(err);
        }
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or(AuthError::NotFound(user.id.to_string()))?;

        stored.username = user.username.clone();
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.role = user.role.clone();
        stored.is_active = user.is_active;
        stored.updated_at = user.updated_at;
        Ok(stored.clone())
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), AuthError> {
        let mut state = self.state()?;
        let stored = state
            .users
            .get_mut(id)
            .ok_or(AuthError::NotFound(id.to_string()))?;
        stored.password_hash = password_hash.to_string();
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), AuthError> {
        let mut state = self.state()?;
        state
            .users
            .remove(id)
            .ok_or(AuthError::NotFound(id.to_string()))?;
        state.refresh_tokens.retain(|_, token| token.user_id != *id);
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryCredentialStore {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
        let mut state = self.state()?;
        if !state.users.contains_key(&token.user_id) {
            return Err(AuthError::DatabaseError(format!(
                "refresh token owner {} does not exist",
                token.user_id
            )));
        }
        state.refresh_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_valid(&self, token_hash: &str) -> Result<Option<RefreshToken>, AuthError> {
        Ok(self.state()?.live_token(token_hash, Utc::now()).cloned())
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<RefreshToken>, AuthError> {
        let mut state = self.state()?;
        let id = state
            .live_token(token_hash, Utc::now())
            .map(|token| token.id);

        Ok(id.and_then(|id| state.refresh_tokens.remove(&id)))
    }

    async fn delete_expired(&self) -> Result<u64, AuthError> {
        let now = Utc::now();
        let mut state = self.state()?;
        let before = state.refresh_tokens.len();
        state.refresh_tokens.retain(|_, token| !token.is_expired(now));
        Ok((before - state.refresh_tokens.len()) as u64)
    }
}
