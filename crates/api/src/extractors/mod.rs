//! Custom Axum extractors.

pub mod admin_auth;

pub use admin_auth::{AdminAuth, API_KEY_HEADER};
