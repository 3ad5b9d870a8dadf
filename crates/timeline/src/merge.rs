use crate::error::TimelineError;
use chrono::{DateTime, Utc};
use core_types::{DeltaOrigin, MerchantId, OrderEvent, PurchaseEvent, Timestamped};

/// A signed quantity change of one merchant's stock at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedQuantity {
    pub merchant_id: MerchantId,
    pub timestamp: DateTime<Utc>,
    pub delta: i64,
}

/// One entry of the merged, globally time-ordered delta sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryDelta {
    pub merchant_id: MerchantId,
    pub timestamp: DateTime<Utc>,
    pub delta: i64,
    pub origin: DeltaOrigin,
}

impl InventoryDelta {
    fn from_quantity(quantity: &TimedQuantity, origin: DeltaOrigin) -> Self {
        Self {
            merchant_id: quantity.merchant_id.clone(),
            timestamp: quantity.timestamp,
            delta: quantity.delta,
            origin,
        }
    }
}

/// Replenishment orders as positive deltas, in input order.
pub fn replenishment_deltas(orders: &[OrderEvent]) -> Result<Vec<TimedQuantity>, TimelineError> {
    orders
        .iter()
        .map(|order| -> Result<TimedQuantity, TimelineError> {
            Ok(TimedQuantity {
                merchant_id: order.merchant_id.clone(),
                timestamp: order.parsed_timestamp()?,
                delta: order.amount,
            })
        })
        .collect()
}

/// Successful purchases as negative deltas, in input order.
///
/// Purchases whose `http_code` is not `success_code` never took stock out of
/// the inventory and are dropped here, before any merging.
pub fn purchase_deltas(
    purchases: &[PurchaseEvent],
    success_code: u16,
) -> Result<Vec<TimedQuantity>, TimelineError> {
    purchases
        .iter()
        .filter(|purchase| purchase.succeeded(success_code))
        .map(|purchase| -> Result<TimedQuantity, TimelineError> {
            let timestamp = purchase.parsed_timestamp()?;
            let delta = purchase
                .amount
                .checked_neg()
                .ok_or_else(|| TimelineError::QuantityOverflow {
                    merchant_id: purchase.merchant_id.clone(),
                    timestamp,
                })?;
            Ok(TimedQuantity {
                merchant_id: purchase.merchant_id.clone(),
                timestamp,
                delta,
            })
        })
        .collect()
}

/// Merges two time-sorted delta sequences into one time-sorted sequence.
///
/// A classic two-pointer merge. At equal timestamps the replenishment goes
/// first. Once one side runs out, the rest of the other side is appended as-is.
///
/// Both inputs must already be sorted ascending by timestamp. This is not
/// checked: unsorted input yields a wrongly ordered result, not an error.
pub fn merge_chronologically(
    replenishments: &[TimedQuantity],
    purchases: &[TimedQuantity],
) -> Vec<InventoryDelta> {
    let mut merged = Vec::with_capacity(replenishments.len() + purchases.len());
    let (mut r, mut p) = (0, 0);

    while r < replenishments.len() && p < purchases.len() {
        if replenishments[r].timestamp <= purchases[p].timestamp {
            merged.push(InventoryDelta::from_quantity(&replenishments[r], DeltaOrigin::Replenishment));
            r += 1;
        } else {
            merged.push(InventoryDelta::from_quantity(&purchases[p], DeltaOrigin::Purchase));
            p += 1;
        }
    }

    merged.extend(
        replenishments[r..]
            .iter()
            .map(|q| InventoryDelta::from_quantity(q, DeltaOrigin::Replenishment)),
    );
    merged.extend(
        purchases[p..]
            .iter()
            .map(|q| InventoryDelta::from_quantity(q, DeltaOrigin::Purchase)),
    );

    merged
}
