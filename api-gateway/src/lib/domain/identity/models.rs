/// User as reported by the auth service. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Caller identity attached to the request by the auth middleware.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Partial profile update; empty fields are left unchanged upstream.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Access token plus its expiry as a Unix timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: User,
    pub access_token: AccessToken,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: AccessToken,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct RotatedTokens {
    pub access_token: AccessToken,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamHealth {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}
