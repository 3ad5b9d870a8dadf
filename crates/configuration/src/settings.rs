use crate::error::ConfigError;
use core_types::EventCategory;
use serde::Deserialize;

/// The root configuration structure for an analysis run.
///
/// Every section has defaults matching the layout the simulation writes, so a
/// run needs nothing but the dump directory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: DumpLayout,
    pub output: OutputSettings,
    pub analysis: AnalysisSettings,
    pub charts: ChartSettings,
    pub logging: LoggingSettings,
}

/// Where the inputs live inside a dump directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DumpLayout {
    /// The merchant id → display name document.
    pub mapping_file: String,
    /// Sub-directory holding one document per event category.
    pub events_dir: String,
    pub purchases: String,
    pub orders: String,
    pub holding_costs: String,
    pub offer_adds: String,
    pub offer_updates: String,
}

/// Names of the artifacts written back into the dump directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub summary_file: String,
    pub inventory_chart: String,
    pub price_chart: String,
    pub offer_price_chart: String,
    /// Also render one price line per offer (colored per merchant).
    pub per_offer_prices: bool,
}

/// What to do with events whose merchant is missing from the mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownMerchantPolicy {
    /// Sum them, but leave them out of every artifact.
    #[default]
    Drop,
    /// Abort the run.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// The `http_code` of an event whose operation actually took effect.
    pub success_code: u16,
    pub unknown_merchants: UnknownMerchantPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, a plain-text copy of the log is written to this file inside the dump directory.
    pub file: Option<String>,
}

// --- Default Implementations ---

impl Default for DumpLayout {
    fn default() -> Self {
        Self {
            mapping_file: "merchant_id_mapping.json".to_string(),
            events_dir: "kafka".to_string(),
            purchases: EventCategory::Purchase.default_storage_name().to_string(),
            orders: EventCategory::Order.default_storage_name().to_string(),
            holding_costs: EventCategory::HoldingCost.default_storage_name().to_string(),
            offer_adds: EventCategory::OfferAdd.default_storage_name().to_string(),
            offer_updates: EventCategory::OfferUpdate.default_storage_name().to_string(),
        }
    }
}

impl DumpLayout {
    /// The file name a category is stored under inside `events_dir`.
    pub fn category_file(&self, category: EventCategory) -> &str {
        match category {
            EventCategory::Purchase => &self.purchases,
            EventCategory::Order => &self.orders,
            EventCategory::HoldingCost => &self.holding_costs,
            EventCategory::OfferAdd => &self.offer_adds,
            EventCategory::OfferUpdate => &self.offer_updates,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            summary_file: "results.csv".to_string(),
            inventory_chart: "inventory_levels.svg".to_string(),
            price_chart: "prices_reduced.svg".to_string(),
            offer_price_chart: "prices.svg".to_string(),
            per_offer_prices: false,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            success_code: 200,
            unknown_merchants: UnknownMerchantPolicy::Drop,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Settings {
    /// Rejects settings that would only fail later, half-way through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("layout.mapping_file", &self.layout.mapping_file),
            ("layout.events_dir", &self.layout.events_dir),
            ("layout.purchases", &self.layout.purchases),
            ("layout.orders", &self.layout.orders),
            ("layout.holding_costs", &self.layout.holding_costs),
            ("layout.offer_adds", &self.layout.offer_adds),
            ("layout.offer_updates", &self.layout.offer_updates),
            ("output.summary_file", &self.output.summary_file),
            ("output.inventory_chart", &self.output.inventory_chart),
            ("output.price_chart", &self.output.price_chart),
            ("output.offer_price_chart", &self.output.offer_price_chart),
        ];
        if let Some((key, _)) = names.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!("{key} must not be empty")));
        }

        if self.charts.width == 0 || self.charts.height == 0 {
            return Err(ConfigError::ValidationError(
                "charts.width and charts.height must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
