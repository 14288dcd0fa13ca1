//! Authentication service.
//!
//! Password login issuing a bearer token, and token-gated identity resolution.
//! Sessions are stateless: everything the server needs lives in the token.

mod error;
mod password;
mod token;

pub use error::AuthError;
pub use password::CredentialHasher;
pub use token::{Claims, TokenKeys, TokenResponse};

use std::future::Future;

use crate::db::{RepositoryError, UserRepository};
use crate::models::{User, UserCreate};

/// Read access to users by login handle.
///
/// Implemented by [`UserRepository`]; the seam lets login and token
/// resolution run against an in-memory directory in tests.
pub trait UserDirectory {
    /// Look up a user by username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;
}

impl UserDirectory for UserRepository<'_> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.get_by_username(username).await
    }
}

/// Authentication service.
///
/// Borrows the process-wide keys and hasher from `AppState`.
pub struct AuthService<'a, D> {
    users: D,
    keys: &'a TokenKeys,
    hasher: &'a CredentialHasher,
}

impl<'a, D: UserDirectory + Sync> AuthService<'a, D> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: D, keys: &'a TokenKeys, hasher: &'a CredentialHasher) -> Self {
        Self {
            users,
            keys,
            hasher,
        }
    }

    /// Verify a username/password pair and issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown username or a
    /// wrong password.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            self.hasher.verify_decoy_blocking(password.to_owned()).await;
            tracing::info!(username = %username, "Login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify_blocking(password.to_owned(), user.password_hash.clone())
            .await
        {
            tracing::info!(username = %username, "Login failed: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.issue(&user.username)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(TokenResponse::bearer(token))
    }

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token fails verification or
    /// its subject no longer exists.
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.keys.verify(token)?;

        self.users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

impl<'a> AuthService<'a, UserRepository<'a>> {
    /// Register a new user, hashing the password before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the username is taken; nothing
    /// is written in that case.
    /// Returns `AuthError::Repository` with a `Conflict` if the email or phone
    /// is taken.
    pub async fn register(&self, user: UserCreate) -> Result<User, AuthError> {
        if self.users.username_exists(&user.username).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = self.hasher.hash_blocking(user.password.clone()).await?;

        let created = self
            .users
            .create(&user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) if msg == "Username already exists" => {
                    AuthError::UserAlreadyExists
                }
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %created.id, "User registered");
        Ok(created)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use chrono::{TimeDelta, Utc};
    use secrecy::SecretString;

    use tradepost_core::{Email, Gender, UserId};

    use super::*;

    struct InMemoryUsers(HashMap<String, User>);

    impl UserDirectory for InMemoryUsers {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self.0.get(username).cloned())
        }
    }

    fn keys() -> TokenKeys {
        TokenKeys::new(
            &SecretString::from(
                "09d25e094faa6ca2556c818166b7a9563b93f7099f6f0f4caa6cf63b88e8d3e7".to_owned(),
            ),
            Duration::from_secs(15 * 60),
        )
    }

    fn directory(hasher: &CredentialHasher) -> InMemoryUsers {
        let alice = User {
            id: UserId::new(1),
            username: "alice".to_owned(),
            first_name: "Alice".to_owned(),
            last_name: "Liddell".to_owned(),
            email: Email::parse("a@x.com").unwrap(),
            country_code: "+1".to_owned(),
            phone: "5550100".to_owned(),
            password_hash: hasher.hash("p@ss").unwrap(),
            gender: Gender::Female,
            is_active: true,
        };
        InMemoryUsers(HashMap::from([("alice".to_owned(), alice)]))
    }

    #[tokio::test]
    async fn test_login_and_resolve() {
        let keys = keys();
        let hasher = CredentialHasher::new();
        let auth = AuthService::new(directory(&hasher), &keys, &hasher);

        let token = auth.login("alice", "p@ss").await.unwrap();
        assert_eq!(token.token_type, "bearer");

        let user = auth.resolve(&token.access_token).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let keys = keys();
        let hasher = CredentialHasher::new();
        let auth = AuthService::new(directory(&hasher), &keys, &hasher);

        let wrong = auth.login("alice", "nope").await.unwrap_err();
        let unknown = auth.login("bob", "p@ss").await.unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_unknown_user_still_pays_for_a_verification() {
        let keys = keys();
        let hasher = CredentialHasher::new();
        let auth = AuthService::new(directory(&hasher), &keys, &hasher);

        // Warm both paths, including the lazily built decoy hash
        let _ = auth.login("bob", "p@ss").await;
        let _ = auth.login("alice", "nope").await;

        let started = std::time::Instant::now();
        let _ = auth.login("alice", "nope").await;
        let known = started.elapsed();

        let started = std::time::Instant::now();
        let _ = auth.login("bob", "p@ss").await;
        let unknown = started.elapsed();

        assert!(unknown * 4 >= known, "unknown {unknown:?} vs known {known:?}");
    }

    #[tokio::test]
    async fn test_expired_token_does_not_resolve() {
        let keys = keys();
        let hasher = CredentialHasher::new();
        let auth = AuthService::new(directory(&hasher), &keys, &hasher);

        let stale = keys
            .issue_at("alice", Utc::now() - TimeDelta::minutes(20))
            .unwrap();
        assert!(matches!(
            auth.resolve(&stale).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthorized() {
        let keys = keys();
        let hasher = CredentialHasher::new();
        let auth = AuthService::new(directory(&hasher), &keys, &hasher);

        let token = keys.issue("ghost").unwrap();
        assert!(matches!(
            auth.resolve(&token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_tampered_token_does_not_resolve() {
        let keys = keys();
        let hasher = CredentialHasher::new();
        let auth = AuthService::new(directory(&hasher), &keys, &hasher);

        let mut token = auth.login("alice", "p@ss").await.unwrap().access_token;
        let last = token.pop().unwrap();
        token.push(if last == 'x' { 'y' } else { 'x' });

        assert!(matches!(
            auth.resolve(&token).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
