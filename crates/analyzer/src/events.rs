use core_types::{
    HoldingCostEvent, MerchantId, MerchantMapping, OfferEvent, OrderEvent, PurchaseEvent,
};
use dump_store::{DumpRepository, StoreError};
use std::collections::BTreeSet;

/// Everything a run reads from a dump, loaded once up front.
#[derive(Debug, Clone, Default)]
pub struct DumpEvents {
    pub mapping: MerchantMapping,
    pub purchases: Vec<PurchaseEvent>,
    pub orders: Vec<OrderEvent>,
    pub holding_costs: Vec<HoldingCostEvent>,
    /// `None` when the dump has no offer placements at all.
    pub offer_adds: Option<Vec<OfferEvent>>,
    pub offer_updates: Option<Vec<OfferEvent>>,
}

impl DumpEvents {
    /// Loads the mapping and every event category. Any load failure aborts.
    pub fn load(repo: &DumpRepository) -> Result<Self, StoreError> {
        let events = Self {
            mapping: repo.load_mapping()?,
            purchases: repo.load_purchases()?,
            orders: repo.load_orders()?,
            holding_costs: repo.load_holding_costs()?,
            offer_adds: repo.load_offer_adds()?,
            offer_updates: repo.load_offer_updates()?,
        };

        tracing::info!(
            merchants = events.mapping.len(),
            purchases = events.purchases.len(),
            orders = events.orders.len(),
            holding_costs = events.holding_costs.len(),
            "Loaded dump from {}",
            repo.root().display()
        );
        Ok(events)
    }

    /// True when at least one offer category was present in the dump.
    pub fn has_offers(&self) -> bool {
        self.offer_adds.is_some() || self.offer_updates.is_some()
    }

    pub fn offer_adds(&self) -> &[OfferEvent] {
        self.offer_adds.as_deref().unwrap_or_default()
    }

    pub fn offer_updates(&self) -> &[OfferEvent] {
        self.offer_updates.as_deref().unwrap_or_default()
    }

    /// Merchant ids referenced by any event category but absent from the mapping.
    pub fn unknown_merchants(&self) -> BTreeSet<MerchantId> {
        let referenced = self
            .purchases
            .iter()
            .map(|p| &p.merchant_id)
            .chain(self.orders.iter().map(|o| &o.merchant_id))
            .chain(self.holding_costs.iter().map(|h| &h.merchant_id))
            .chain(self.offer_adds().iter().map(|o| &o.merchant_id))
            .chain(self.offer_updates().iter().map(|o| &o.merchant_id));

        referenced
            .filter(|id| !self.mapping.contains(id))
            .cloned()
            .collect()
    }
}
