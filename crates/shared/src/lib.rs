//! Shared utilities and common types for the regatta admin backend.
//!
//! This crate provides common functionality used across all other crates:
//! - API key hashing and prefix handling
//! - Form value validation helpers

pub mod crypto;
pub mod validation;
