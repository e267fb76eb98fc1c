//! HTTP route handlers.

pub mod health;
pub mod race_orders;
