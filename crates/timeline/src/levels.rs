use crate::error::TimelineError;
use crate::group::group_stable;
use crate::merge::{merge_chronologically, purchase_deltas, replenishment_deltas, InventoryDelta};
use chrono::{DateTime, Utc};
use core_types::{MerchantId, OrderEvent, PurchaseEvent};

/// Stock on hand right after one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPoint {
    pub timestamp: DateTime<Utc>,
    pub level: i64,
}

/// A merchant's inventory level over time, one point per merged event.
///
/// Levels are plain running sums and may go negative; only the chart floor is
/// fixed at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSeries {
    pub merchant_id: MerchantId,
    pub points: Vec<LevelPoint>,
}

/// Turns the merged delta sequence into one running-total series per merchant.
///
/// The sequence is partitioned by merchant without re-sorting, then each
/// partition is prefix-summed in order. Merchants appear in the order of their
/// first delta; a merchant without deltas gets no series at all.
pub fn reconstruct_levels(merged: &[InventoryDelta]) -> Result<Vec<LevelSeries>, TimelineError> {
    group_stable(merged, |delta| delta.merchant_id.clone())
        .into_iter()
        .map(|(merchant_id, deltas)| -> Result<LevelSeries, TimelineError> {
            let mut level: i64 = 0;
            let mut points = Vec::with_capacity(deltas.len());
            for delta in deltas {
                level = level.checked_add(delta.delta).ok_or_else(|| {
                    TimelineError::QuantityOverflow {
                        merchant_id: merchant_id.clone(),
                        timestamp: delta.timestamp,
                    }
                })?;
                points.push(LevelPoint {
                    timestamp: delta.timestamp,
                    level,
                });
            }
            Ok(LevelSeries { merchant_id, points })
        })
        .collect()
}

/// The whole inventory pipeline: prepare both streams, merge them, reconstruct levels.
///
/// Any unparseable timestamp aborts the whole reconstruction.
pub fn inventory_levels(
    orders: &[OrderEvent],
    purchases: &[PurchaseEvent],
    success_code: u16,
) -> Result<Vec<LevelSeries>, TimelineError> {
    let replenishments = replenishment_deltas(orders)?;
    let sales = purchase_deltas(purchases, success_code)?;
    let merged = merge_chronologically(&replenishments, &sales);

    tracing::debug!(
        replenishments = replenishments.len(),
        purchases = sales.len(),
        merged = merged.len(),
        "Merged inventory deltas."
    );

    reconstruct_levels(&merged)
}
