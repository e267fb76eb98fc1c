//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod api_key;
pub mod race_order;

pub use api_key::AdminKeyEntity;
pub use race_order::{RaceOrderEntity, RotationFrequencyDb};
