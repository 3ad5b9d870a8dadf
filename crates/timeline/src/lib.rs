//! # Timeline
//!
//! Turns the event streams of a dump into per-merchant time series: inventory
//! levels reconstructed from replenishments and purchases, and price
//! histories from offer events.
//!
//! Everything here is a pure, single-pass transformation over fully loaded
//! sequences. Timestamps are parsed on entry; one unparseable timestamp fails
//! the whole series computation.

pub mod error;
pub mod group;
pub mod levels;
pub mod merge;
pub mod prices;

pub use error::TimelineError;
pub use group::group_stable;
pub use levels::{inventory_levels, reconstruct_levels, LevelPoint, LevelSeries};
pub use merge::{
    merge_chronologically, purchase_deltas, replenishment_deltas, InventoryDelta, TimedQuantity,
};
pub use prices::{
    prices_by_merchant, prices_by_offer, successful_offers, MerchantPrices, OfferPrices,
    PricePoint, TimedOffer,
};
