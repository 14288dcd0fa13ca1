//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! echo 'correct horse' | tp-cli user create -u alice -f Alice -l Liddell \
//!     -e alice@example.com --country-code +1 --phone 5550100 --gender Female
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use std::io::BufRead;

use thiserror::Error;

use tradepost_api::db::{RepositoryError, UserRepository};
use tradepost_api::models::{UserCreate, Validate, ValidationError};
use tradepost_api::services::auth::{AuthError, CredentialHasher};
use tradepost_core::UserId;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field rule violated.
    #[error("Invalid user: {0}")]
    Invalid(#[from] ValidationError),

    /// Username is taken.
    #[error("User already exists with username: {0}")]
    UserExists(String),

    /// Email or phone is taken, or the insert failed.
    #[error("Could not store user: {0}")]
    Repository(#[from] RepositoryError),

    /// Password could not be hashed.
    #[error("Could not hash password: {0}")]
    Auth(#[from] AuthError),

    /// Password could not be read from stdin.
    #[error("Could not read password: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a password from the first line of stdin, without its line ending.
///
/// # Errors
///
/// Returns `UserError::Io` if stdin cannot be read.
pub fn read_password() -> Result<String, UserError> {
    tracing::info!("Reading password from stdin...");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Create a new user with an Argon2id password hash.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError` if a field rule fails, the username is taken, or the
/// database rejects the insert.
pub async fn create(user: UserCreate) -> Result<UserId, UserError> {
    user.validate()?;

    let database_url =
        super::database_url().ok_or(UserError::MissingEnvVar("API_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = tradepost_api::db::create_pool(&database_url).await?;
    let users = UserRepository::new(&pool);

    if users.username_exists(&user.username).await? {
        return Err(UserError::UserExists(user.username));
    }

    let password_hash = CredentialHasher::new()
        .hash_blocking(user.password.clone())
        .await?;
    let created = users.create(&user, &password_hash).await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        created.id,
        created.username
    );

    Ok(created.id)
}
