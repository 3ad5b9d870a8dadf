use crate::accumulator::MerchantTotals;
use crate::error::AnalyticsError;
use crate::report::FinancialReport;
use core_types::{HoldingCostEvent, MerchantId, MerchantMapping, OrderEvent, PurchaseEvent};

/// Sums `value` per merchant over one event sequence.
///
/// Every merchant of `reference` is present in the result, at `0.0` if the
/// sequence never mentions it.
pub fn aggregate<E, K, V>(
    events: &[E],
    reference: &MerchantMapping,
    key: K,
    value: V,
) -> MerchantTotals
where
    K: Fn(&E) -> &MerchantId,
    V: Fn(&E) -> f64,
{
    let mut totals = MerchantTotals::with_reference(reference.ids());
    for event in events {
        totals.add(key(event), value(event));
    }
    totals
}

/// A stateless calculator deriving per-merchant financials from a dump.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for the financial summary.
    ///
    /// # Arguments
    ///
    /// * `mapping` - The reference set of merchants; one row is produced per entry.
    /// * `purchases` - All purchase records, successful or not.
    /// * `orders` - All replenishment orders.
    /// * `holding_costs` - All holding cost records.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `FinancialReport` or an `AnalyticsError`.
    pub fn summarize(
        &self,
        mapping: &MerchantMapping,
        purchases: &[PurchaseEvent],
        orders: &[OrderEvent],
        holding_costs: &[HoldingCostEvent],
    ) -> Result<FinancialReport, AnalyticsError> {
        let revenue = aggregate(purchases, mapping, |p| &p.merchant_id, PurchaseEvent::revenue);
        let holding_cost = aggregate(holding_costs, mapping, |h| &h.merchant_id, |h| h.cost);
        let order_cost = aggregate(orders, mapping, |o| &o.merchant_id, |o| o.billing_amount);

        tracing::debug!(
            purchases = purchases.len(),
            orders = orders.len(),
            holding_costs = holding_costs.len(),
            "Aggregated event totals per merchant."
        );

        let report = FinancialReport::compose(mapping, &revenue, &holding_cost, &order_cost);
        report.ensure_finite()?;

        Ok(report)
    }
}
