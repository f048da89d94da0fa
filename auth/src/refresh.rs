use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::Digest;
use sha2::Sha256;

/// Number of random bytes behind a refresh secret.
pub const REFRESH_SECRET_BYTES: usize = 32;

/// Opaque, single-use refresh secret handed to the client.
///
/// Only its [`fingerprint`] is ever persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshSecret(String);

impl RefreshSecret {
    /// Generate a new secret from 32 random bytes, URL-safe base64 encoded.
    pub fn generate() -> Self {
        let bytes: [u8; REFRESH_SECRET_BYTES] = rand::thread_rng().gen();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Deterministic lookup digest of this secret.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for RefreshSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshSecret(..)")
    }
}

/// Unsalted SHA-256 hex digest of an opaque secret.
///
/// Lookups are hash-equality queries, so the same input must always map to
/// the same output. Never use this for passwords.
pub fn fingerprint(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}
