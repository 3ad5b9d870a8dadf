use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of event streams found in a simulation dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Purchases made by consumers (`buyOffer`).
    Purchase,
    /// Replenishment orders placed with the producer (`producer`).
    Order,
    /// Periodic holding costs billed to merchants (`holding_cost`).
    HoldingCost,
    /// Offers placed on the marketplace (`addOffer`).
    OfferAdd,
    /// Price or stock updates of existing offers (`updateOffer`).
    OfferUpdate,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Purchase,
        EventCategory::Order,
        EventCategory::HoldingCost,
        EventCategory::OfferAdd,
        EventCategory::OfferUpdate,
    ];

    /// The name under which the simulation persists this category.
    pub fn default_storage_name(&self) -> &'static str {
        match self {
            EventCategory::Purchase => "buyOffer",
            EventCategory::Order => "producer",
            EventCategory::HoldingCost => "holding_cost",
            EventCategory::OfferAdd => "addOffer",
            EventCategory::OfferUpdate => "updateOffer",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_storage_name())
    }
}

/// Which stream an inventory change originated from.
///
/// The declaration order doubles as the tie-break order of the chronological
/// merge: replenishments sort before purchases at identical timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeltaOrigin {
    Replenishment,
    Purchase,
}
