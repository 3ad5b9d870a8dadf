pub mod enums;
pub mod error;
pub mod structs;
pub mod time;

// Re-export the core types to provide a clean public API.
pub use enums::{DeltaOrigin, EventCategory};
pub use error::CoreError;
pub use structs::{
    HoldingCostEvent, MerchantId, MerchantMapping, OfferEvent, OrderEvent, PurchaseEvent,
    Timestamped,
};
pub use time::{parse_timestamp, TIMESTAMP_FORMAT};
