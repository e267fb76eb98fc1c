//! Repository implementations for database operations.

pub mod api_key;
pub mod race_order;

pub use api_key::ApiKeyRepository;
pub use race_order::RaceOrderRepository;
