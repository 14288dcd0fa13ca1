//! Database operations for the Tradepost `PostgreSQL` store.
//!
//! Each submodule is the entity service for one table. Repositories borrow the
//! shared pool; every call checks a connection out for the duration of one
//! statement (or one transaction for read-modify-write updates) and returns it
//! on every exit path.
//!
//! ## Tables
//!
//! - `users` - Accounts with Argon2id/bcrypt password hashes
//! - `organizations` - Named groups that place orders
//! - `roles` - User ↔ organization membership with a free-text label
//! - `products` - Catalog items with original and discounted prices
//! - `orders` - Purchases of one product by a user on behalf of an organization
//! - `addresses` - Postal addresses owned by a user
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p tradepost-cli -- migrate
//! ```

pub mod addresses;
pub mod orders;
pub mod organizations;
pub mod products;
pub mod roles;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use orders::OrderRepository;
pub use organizations::OrganizationRepository;
pub use products::ProductRepository;
pub use roles::RoleRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options().connect(database_url.expose_secret()).await
}

/// Create a pool that only connects when a query first needs a connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options().connect_lazy(database_url.expose_secret())
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
}

/// Translate an `INSERT`/`UPDATE` failure into a repository error.
///
/// Unique violations become `Conflict` and foreign key violations become
/// `InvalidReference`, both carrying the violated constraint name.
pub(crate) fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(describe_unique(&constraint));
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::InvalidReference(describe_reference(&constraint));
        }
    }
    RepositoryError::Database(err)
}

/// Translate a `DELETE` failure into a repository error.
///
/// Orders keep their user, organization and product alive (`ON DELETE
/// RESTRICT`), so deleting a referenced row is reported as a `Conflict`.
pub(crate) fn map_delete_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict("Row is still referenced by existing orders".to_owned());
    }
    RepositoryError::Database(err)
}

/// Human-readable message for a unique constraint name from the migrations.
fn describe_unique(constraint: &str) -> String {
    match constraint {
        "users_username_key" => "Username already exists".to_owned(),
        "users_email_key" => "Email already registered".to_owned(),
        "users_phone_key" => "Phone number already registered".to_owned(),
        "organizations_org_name_key" => "Organization name already exists".to_owned(),
        "products_prod_name_key" => "Product name already exists".to_owned(),
        "roles_user_id_org_id_key" => "User already has a role in this organization".to_owned(),
        other => format!("duplicate value violates {other}"),
    }
}

/// Human-readable message for a foreign key constraint name from the migrations.
fn describe_reference(constraint: &str) -> String {
    match constraint {
        "addresses_user_id_fkey" | "orders_user_id_fkey" | "roles_user_id_fkey" => {
            "Referenced user does not exist".to_owned()
        }
        "orders_org_id_fkey" | "roles_org_id_fkey" => {
            "Referenced organization does not exist".to_owned()
        }
        "orders_prod_id_fkey" => "Referenced product does not exist".to_owned(),
        other => format!("referenced row does not exist ({other})"),
    }
}
