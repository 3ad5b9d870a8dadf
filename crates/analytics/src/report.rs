use crate::accumulator::MerchantTotals;
use crate::error::AnalyticsError;
use core_types::{MerchantId, MerchantMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The financial outcome of one merchant over a whole simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantSummary {
    pub merchant_id: MerchantId,
    pub name: String,
    pub revenue: f64,
    pub holding_cost: f64,
    pub order_cost: f64,
    pub profit: f64,
}

/// Per-merchant summaries for every merchant in the mapping, in rank order.
///
/// This struct is the final output of the `AnalyticsEngine` and is what gets
/// written as the run's summary table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub summaries: Vec<MerchantSummary>,
    /// Merchants that showed up in the events but not in the mapping.
    pub unknown_merchants: BTreeSet<MerchantId>,
}

impl FinancialReport {
    /// Combines the three independent sums into one row per mapped merchant.
    ///
    /// Profit is derived here, after all sums are complete:
    /// `profit = revenue - holding_cost - order_cost`.
    pub fn compose(
        mapping: &MerchantMapping,
        revenue: &MerchantTotals,
        holding_cost: &MerchantTotals,
        order_cost: &MerchantTotals,
    ) -> Self {
        let summaries = mapping
            .ranked()
            .into_iter()
            .map(|(merchant_id, name)| {
                let revenue = revenue.get(merchant_id);
                let holding_cost = holding_cost.get(merchant_id);
                let order_cost = order_cost.get(merchant_id);
                MerchantSummary {
                    merchant_id: merchant_id.clone(),
                    name: name.to_string(),
                    revenue,
                    holding_cost,
                    order_cost,
                    profit: revenue - holding_cost - order_cost,
                }
            })
            .collect();

        let unknown_merchants = revenue
            .unknown()
            .iter()
            .chain(holding_cost.unknown())
            .chain(order_cost.unknown())
            .cloned()
            .collect();

        Self {
            summaries,
            unknown_merchants,
        }
    }

    pub fn summary_for(&self, merchant_id: &MerchantId) -> Option<&MerchantSummary> {
        self.summaries.iter().find(|s| &s.merchant_id == merchant_id)
    }

    pub fn total_profit(&self) -> f64 {
        self.summaries.iter().map(|s| s.profit).sum()
    }

    /// Fails when any event referenced a merchant outside the mapping.
    pub fn ensure_no_unknown_merchants(&self) -> Result<(), AnalyticsError> {
        if self.unknown_merchants.is_empty() {
            Ok(())
        } else {
            Err(AnalyticsError::UnknownMerchant(
                self.unknown_merchants.iter().cloned().collect(),
            ))
        }
    }

    /// Fails when any total overflowed to infinity or turned into NaN.
    pub fn ensure_finite(&self) -> Result<(), AnalyticsError> {
        for summary in &self.summaries {
            let metrics = [
                ("revenue", summary.revenue),
                ("holding_cost", summary.holding_cost),
                ("order_cost", summary.order_cost),
                ("profit", summary.profit),
            ];
            if let Some(&(metric, _)) = metrics.iter().find(|(_, value)| !value.is_finite()) {
                return Err(AnalyticsError::NonFiniteTotal {
                    merchant_id: summary.merchant_id.clone(),
                    metric,
                });
            }
        }
        Ok(())
    }
}
