//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password hashing, bearer token issuance and identity resolution

pub mod auth;
