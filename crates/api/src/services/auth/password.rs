//! Password hashing and verification.
//!
//! New hashes are Argon2id in PHC string format. Verification also accepts
//! bcrypt (`$2a$`, `$2b$`, `$2y$`) so accounts carried over from the legacy
//! store keep working.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;

/// Argon2id hash checked against when the username is unknown, so a failed
/// login costs the same whether or not the account exists.
static DECOY_HASH: LazyLock<String> = LazyLock::new(|| {
    CredentialHasher::default()
        .hash("tradepost-decoy-credential")
        .unwrap_or_default()
});

/// Salted one-way password hasher.
///
/// Both operations are CPU-bound; the `*_blocking` variants move them onto
/// tokio's blocking pool so request handlers never stall the executor.
#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl CredentialHasher {
    /// Hasher with the default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if Argon2 rejects the input.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `false` for a mismatch and for any hash that cannot be parsed.
    #[must_use]
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        if is_bcrypt(hash) {
            return bcrypt::verify(plaintext, hash).unwrap_or(false);
        }

        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`Self::hash`] on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails or the task panics.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|_| AuthError::PasswordHash)?
    }

    /// [`Self::verify`] on the blocking pool. A failed task counts as a mismatch.
    pub async fn verify_blocking(&self, plaintext: String, hash: String) -> bool {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .unwrap_or(false)
    }

    /// Spend one verification's worth of work on a password that has no
    /// account to check against.
    pub async fn verify_decoy_blocking(&self, plaintext: String) {
        let _matched = self.verify_blocking(plaintext, DECOY_HASH.clone()).await;
    }
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}
