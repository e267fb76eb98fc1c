//! Domain services for race order management.
//!
//! Services contain business logic that operates on domain models.

pub mod credentials;
pub mod pairing;
pub mod race_order_form;
pub mod race_order_store;
pub mod template_validation;

pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use pairing::{required_handshakes, required_race_count, HandshakeSet};
pub use race_order_form::{build_grid, parse_metadata, parse_teams_field, prepare_template, FormLimits};
pub use race_order_store::{InMemoryRaceOrderStore, RaceOrderStore};
pub use template_validation::{
    collect_pairings, pairings_from_lists, parse_race_order_dump, validate_pairings,
};
