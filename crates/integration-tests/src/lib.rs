//! Integration tests for Tradepost.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply the schema and start the server
//! cargo run -p tradepost-cli -- migrate
//! cargo run -p tradepost-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p tradepost-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - Server under test (default `http://localhost:8000`)
//!
//! Every test creates its own rows under random names, so the suite can run
//! repeatedly against the same database.

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password given to every user these tests create.
pub const PASSWORD: &str = "correct horse battery staple";

/// HTTP client bound to the server under test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Build a context from `API_BASE_URL`.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_owned());
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Create a user with a random username, email and phone.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the server does not answer 200.
    pub async fn create_user(&self, prefix: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/users/create/"))
            .json(&user_body(&unique(prefix)))
            .send()
            .await
            .expect("Failed to create user");

        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.expect("Failed to parse created user")
    }

    /// Exchange credentials at `/token`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn request_token(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to request token")
    }

    /// Log in and return the bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the login is refused.
    pub async fn login(&self, username: &str) -> String {
        let resp = self.request_token(username, PASSWORD).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = resp.json().await.expect("Failed to parse token");
        assert_eq!(body["token_type"], "bearer");
        body["access_token"]
            .as_str()
            .expect("access_token is not a string")
            .to_owned()
    }

    /// Every user, fetched page by page from `GET /users/`.
    ///
    /// # Panics
    ///
    /// Panics if a page cannot be fetched or parsed.
    pub async fn all_users(&self) -> Vec<Value> {
        const PAGE: usize = 100;
        let mut users = Vec::new();
        loop {
            let resp = self
                .client
                .get(self.url(&format!("/users/?skip={}&limit={PAGE}", users.len())))
                .send()
                .await
                .expect("Failed to list users");
            assert_eq!(resp.status(), StatusCode::OK);

            let page: Vec<Value> = resp.json().await.expect("Failed to parse users");
            let done = page.len() < PAGE;
            users.extend(page);
            if done {
                return users;
            }
        }
    }

    /// POST a JSON body and return the parsed 200 response.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the server does not answer 200.
    pub async fn create(&self, path: &str, body: &Value) -> Value {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send create request");

        assert_eq!(resp.status(), StatusCode::OK, "POST {path}");
        resp.json().await.expect("Failed to parse created row")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// `prefix` followed by eight random hex digits.
#[must_use]
pub fn unique(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", id.get(..8).unwrap_or(&id))
}

/// A complete `POST /users/create/` body for `username`.
#[must_use]
pub fn user_body(username: &str) -> Value {
    let phone: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(10)
        .collect();
    json!({
        "username": username,
        "first_name": "Alice",
        "last_name": "Liddell",
        "email": format!("{username}@example.com"),
        "country_code": "+1",
        "phone": phone,
        "gender": "Female",
        "password": PASSWORD,
    })
}

/// Read the numeric `id` of a returned row.
///
/// # Panics
///
/// Panics if the row has no integer `id`.
#[must_use]
pub fn id_of(row: &Value) -> i64 {
    row["id"].as_i64().expect("row has no integer id")
}
