//! HTTP middleware stack and request extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (`http_request` span per request)
//! 3. Request ID (recorded into the span, echoed in the response)
//!
//! Authentication is not a layer: protected handlers take a [`CurrentUser`]
//! argument, which rejects with 401 before the handler body runs.

pub mod auth;
pub mod request_id;

pub use auth::CurrentUser;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
