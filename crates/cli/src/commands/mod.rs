pub mod migrate;
pub mod user;

use secrecy::SecretString;

/// Database URL from `API_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// Loads `.env` first so the CLI and the server read the same settings.
fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
