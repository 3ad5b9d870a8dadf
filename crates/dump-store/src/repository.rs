use crate::error::StoreError;
use crate::layout::{self, DumpPaths};
use analytics::FinancialReport;
use configuration::DumpLayout;
use core_types::{
    EventCategory, HoldingCostEvent, MerchantMapping, OfferEvent, OrderEvent, PurchaseEvent,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Column names of the summary table, in write order.
pub const SUMMARY_HEADER: [&str; 5] = ["name", "revenue", "holding_cost", "order_cost", "profit"];

// One line of the summary table.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    name: &'a str,
    revenue: f64,
    holding_cost: f64,
    order_cost: f64,
    profit: f64,
}

/// The `DumpRepository` is the only component that touches a dump directory.
/// It reads the merchant mapping and the event documents, and writes the
/// run's artifacts back next to them.
#[derive(Debug, Clone)]
pub struct DumpRepository {
    paths: DumpPaths,
}

impl DumpRepository {
    /// Creates a new `DumpRepository` over already resolved paths.
    pub fn new(paths: DumpPaths) -> Self {
        Self { paths }
    }

    /// Opens the dump at `root`, failing if the directory does not exist.
    pub fn open(root: impl Into<PathBuf>, layout: DumpLayout) -> Result<Self, StoreError> {
        Ok(Self::new(layout::open(root, layout)?))
    }

    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    pub fn load_mapping(&self) -> Result<MerchantMapping, StoreError> {
        let path = self.paths.mapping();
        let mapping: MerchantMapping =
            read_document(&path, || StoreError::MissingMapping(path.clone()))?;
        tracing::debug!(merchants = mapping.len(), path = %path.display(), "Loaded merchant mapping.");
        Ok(mapping)
    }

    /// Loads every record of `category` exactly as persisted: no reordering, no filtering.
    pub fn load_events<E: DeserializeOwned>(
        &self,
        category: EventCategory,
    ) -> Result<Vec<E>, StoreError> {
        let path = self.paths.category(category);
        let events: Vec<E> = read_document(&path, || StoreError::MissingCategory {
            category,
            path: path.clone(),
        })?;
        tracing::debug!(%category, records = events.len(), "Loaded event category.");
        Ok(events)
    }

    pub fn load_purchases(&self) -> Result<Vec<PurchaseEvent>, StoreError> {
        self.load_events(EventCategory::Purchase)
    }

    pub fn load_orders(&self) -> Result<Vec<OrderEvent>, StoreError> {
        self.load_events(EventCategory::Order)
    }

    pub fn load_holding_costs(&self) -> Result<Vec<HoldingCostEvent>, StoreError> {
        self.load_events(EventCategory::HoldingCost)
    }

    /// Like [`Self::load_events`], but a missing category document reads as `None`.
    pub fn load_optional_events<E: DeserializeOwned>(
        &self,
        category: EventCategory,
    ) -> Result<Option<Vec<E>>, StoreError> {
        match self.load_events(category) {
            Ok(events) => Ok(Some(events)),
            Err(StoreError::MissingCategory { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Offer placements. Only the price charts use them, so a dump may lack them.
    pub fn load_offer_adds(&self) -> Result<Option<Vec<OfferEvent>>, StoreError> {
        self.load_optional_events(EventCategory::OfferAdd)
    }

    pub fn load_offer_updates(&self) -> Result<Option<Vec<OfferEvent>>, StoreError> {
        self.load_optional_events(EventCategory::OfferUpdate)
    }

    /// Writes the summary table: a header row, then one row per summary in report order.
    pub fn save_summary(
        &self,
        file_name: &str,
        report: &FinancialReport,
    ) -> Result<PathBuf, StoreError> {
        let path = self.paths.artifact(file_name);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        writer.write_record(SUMMARY_HEADER)?;
        for summary in &report.summaries {
            writer.serialize(SummaryRow {
                name: &summary.name,
                revenue: summary.revenue,
                holding_cost: summary.holding_cost,
                order_cost: summary.order_cost,
                profit: summary.profit,
            })?;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(rows = report.summaries.len(), path = %path.display(), "Wrote summary table.");
        Ok(path)
    }

    /// Writes an arbitrary artifact (e.g. a rendered chart) into the dump directory.
    pub fn save_artifact(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.paths.artifact(file_name);
        fs::write(&path, contents).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "Wrote artifact.");
        Ok(path)
    }
}

/// Reads and deserializes one JSON document, mapping a missing file through `missing`.
fn read_document<T, F>(path: &Path, missing: F) -> Result<T, StoreError>
where
    T: DeserializeOwned,
    F: FnOnce() -> StoreError,
{
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => missing(),
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&contents).map_err(|source| StoreError::MalformedData {
        path: path.to_path_buf(),
        source,
    })
}
