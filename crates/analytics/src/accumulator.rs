use core_types::MerchantId;
use std::collections::{BTreeSet, HashMap};

/// A per-merchant sum with default-zero semantics.
///
/// Seeded with the reference set of merchants so every one of them reads as
/// `0.0` until something is added. Ids outside the reference set are still
/// summed, but remembered as unknown so the caller can decide what to do
/// with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MerchantTotals {
    totals: HashMap<MerchantId, f64>,
    unknown: BTreeSet<MerchantId>,
}

impl MerchantTotals {
    pub fn with_reference<'a>(reference: impl IntoIterator<Item = &'a MerchantId>) -> Self {
        Self {
            totals: reference.into_iter().map(|id| (id.clone(), 0.0)).collect(),
            unknown: BTreeSet::new(),
        }
    }

    pub fn add(&mut self, merchant_id: &MerchantId, value: f64) {
        match self.totals.get_mut(merchant_id) {
            Some(total) => *total += value,
            None => {
                self.unknown.insert(merchant_id.clone());
                self.totals.insert(merchant_id.clone(), value);
            }
        }
    }

    /// The sum for `merchant_id`, or `0.0` if nothing was ever added for it.
    pub fn get(&self, merchant_id: &MerchantId) -> f64 {
        self.totals.get(merchant_id).copied().unwrap_or(0.0)
    }

    /// Ids that received values without being part of the reference set.
    pub fn unknown(&self) -> &BTreeSet<MerchantId> {
        &self.unknown
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
