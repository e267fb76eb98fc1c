//! Domain layer for the regatta admin backend.
//!
//! This crate contains:
//! - Domain models (RaceOrder, TemplateKey, Pairing, AdminCredential)
//! - Pairing enumeration and template validation
//! - Store traits with in-memory implementations
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
