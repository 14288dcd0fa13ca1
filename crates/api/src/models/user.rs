//! User account schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

use tradepost_core::{Email, Gender, UserId};

use super::{Validate, ValidationError, limit_text, patch_field, require_text, require_text_opt};

/// A stored user account.
///
/// Holds the password hash, so it is never serialized directly; responses go
/// through [`UserRead`].
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display handle used to log in.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique email address.
    pub email: Email,
    /// Dialling prefix for `phone`.
    pub country_code: String,
    /// Unique phone number.
    pub phone: String,
    /// Argon2id (or legacy bcrypt) hash in PHC/modular-crypt format.
    pub password_hash: String,
    /// Self-reported gender.
    pub gender: Gender,
    /// Whether the account is active.
    pub is_active: bool,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub country_code: String,
    pub phone: String,
    pub gender: Gender,
    pub is_active: bool,
}

impl From<User> for UserRead {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            country_code: user.country_code,
            phone: user.phone,
            gender: user.gender,
            is_active: user.is_active,
        }
    }
}

/// Body of `POST /users/create/`.
#[derive(Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub country_code: String,
    pub phone: String,
    pub gender: Gender,
    /// Plaintext password; hashed before it reaches the store.
    pub password: String,
}

impl fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Validate for UserCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("username", &self.username)?;
        require_text("first_name", &self.first_name)?;
        limit_text("last_name", &self.last_name)?;
        require_text("country_code", &self.country_code)?;
        require_text("phone", &self.phone)?;
        validate_password(&self.password)
    }
}

/// Body of `PUT /users/update/{user_id}`.
///
/// Every field is optional. A supplied `password` is plaintext and is hashed
/// into a [`UserPatch`] before the store sees it.
#[derive(Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text_opt("username", self.username.as_ref())?;
        require_text_opt("first_name", self.first_name.as_ref())?;
        if let Some(last_name) = &self.last_name {
            limit_text("last_name", last_name)?;
        }
        require_text_opt("country_code", self.country_code.as_ref())?;
        require_text_opt("phone", self.phone.as_ref())?;
        self.password.as_deref().map_or(Ok(()), validate_password)
    }
}

impl UserUpdate {
    /// Swap the plaintext password for its hash.
    #[must_use]
    pub fn into_patch(self, password_hash: Option<String>) -> UserPatch {
        UserPatch {
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            country_code: self.country_code,
            phone: self.phone,
            gender: self.gender,
            is_active: self.is_active,
            password_hash,
        }
    }
}

/// Store-side partial update of a user.
#[derive(Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.country_code.is_none()
            && self.phone.is_none()
            && self.gender.is_none()
            && self.is_active.is_none()
            && self.password_hash.is_none()
    }

    /// Overwrite the supplied fields of `user`.
    pub fn apply(self, user: &mut User) {
        patch_field(&mut user.username, self.username);
        patch_field(&mut user.first_name, self.first_name);
        patch_field(&mut user.last_name, self.last_name);
        patch_field(&mut user.email, self.email);
        patch_field(&mut user.country_code, self.country_code);
        patch_field(&mut user.phone, self.phone);
        patch_field(&mut user.gender, self.gender);
        patch_field(&mut user.is_active, self.is_active);
        patch_field(&mut user.password_hash, self.password_hash);
    }
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "must not be empty"));
    }
    // bcrypt silently truncates past 72 bytes; cap it for both algorithms
    if password.len() > 72 {
        return Err(ValidationError::new(
            "password",
            "must be at most 72 bytes",
        ));
    }
    Ok(())
}
