//! Domain models for race order management.

pub mod admin_account;
pub mod race_order;

pub use admin_account::AdminCredential;
pub use race_order::{
    AuthorRef, DeleteRaceOrdersRequest, DeleteRaceOrdersResponse, Flight, FrequencyChoice,
    ListRaceOrdersResponse, NewRaceOrder, Pairing, PairingParseError, RaceOrder, RaceOrderGrid,
    RaceOrderMetadataForm, RaceOrderSummary, RaceSlot, RotationFrequency, SaveRaceOrderResponse,
    SubmitRaceOrderRequest, TemplateKey,
};
