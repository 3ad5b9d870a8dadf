use charts::{color_for, ChartSeries, StepChart};
use configuration::ChartSettings;
use core_types::{MerchantId, MerchantMapping};
use std::collections::HashMap;
use timeline::{LevelSeries, MerchantPrices, OfferPrices};

/// Display name and line color of every mapped merchant.
///
/// Colors follow the merchant's rank in the mapping, so a merchant is drawn in
/// the same color on every chart of a run. Merchants outside the mapping have
/// no style and are never drawn.
#[derive(Debug, Clone)]
pub struct MerchantStyles<'a> {
    styles: HashMap<&'a MerchantId, (&'a str, &'static str)>,
}

impl<'a> MerchantStyles<'a> {
    pub fn new(mapping: &'a MerchantMapping) -> Self {
        let styles = mapping
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(rank, (id, name))| (id, (name, color_for(rank))))
            .collect();
        Self { styles }
    }

    pub fn get(&self, merchant_id: &MerchantId) -> Option<(&'a str, &'static str)> {
        self.styles.get(merchant_id).copied()
    }
}

pub fn inventory_chart(
    levels: &[LevelSeries],
    styles: &MerchantStyles<'_>,
    size: &ChartSettings,
) -> StepChart {
    let mut chart = StepChart::new("Inventory levels", "Time", "Items in stock", size.width, size.height)
        .integer_y(true);
    for series in levels {
        if let Some((name, color)) = styles.get(&series.merchant_id) {
            let points = series
                .points
                .iter()
                .map(|p| (p.timestamp, p.level as f64))
                .collect();
            chart.push_series(ChartSeries::new(name, color, points));
        }
    }
    chart
}

pub fn merchant_price_chart(
    prices: &[MerchantPrices],
    styles: &MerchantStyles<'_>,
    size: &ChartSettings,
) -> StepChart {
    let mut chart = StepChart::new("Prices per merchant", "Time", "Price", size.width, size.height);
    for series in prices {
        if let Some((name, color)) = styles.get(&series.merchant_id) {
            let points = series.points.iter().map(|p| (p.timestamp, p.price)).collect();
            chart.push_series(ChartSeries::new(name, color, points));
        }
    }
    chart
}

/// One line per offer, in the color of the merchant that placed it.
pub fn offer_price_chart(
    prices: &[OfferPrices],
    styles: &MerchantStyles<'_>,
    size: &ChartSettings,
) -> StepChart {
    let mut chart = StepChart::new("Prices per offer", "Time", "Price", size.width, size.height);
    for series in prices {
        if let Some((name, color)) = styles.get(&series.merchant_id) {
            let points = series.points.iter().map(|p| (p.timestamp, p.price)).collect();
            let label = format!("{name} #{}", series.offer_id);
            chart.push_series(ChartSeries::new(label, color, points));
        }
    }
    chart
}
