//! Tradepost Core - Shared types library.
//!
//! This crate provides the domain types shared by the Tradepost components:
//! - `api` - HTTP backend for users, organizations, roles, products, orders and addresses
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database encoding is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and gender

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
