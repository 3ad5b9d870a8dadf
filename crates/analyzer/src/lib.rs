//! # Analyzer
//!
//! Runs a complete analysis of one dump: load, summarize, write the summary
//! table, then render the inventory and price charts into the same directory.
//!
//! Stages run strictly in that order and each artifact is written as soon as
//! it is ready, so a failure in a later stage leaves the earlier artifacts in
//! place.

use crate::error::AnalyzerError;
use crate::series::MerchantStyles;
use analytics::{AnalyticsEngine, FinancialReport};
use configuration::{Settings, UnknownMerchantPolicy};
use dump_store::DumpRepository;
use std::path::PathBuf;

pub mod error;
pub mod events;
pub mod series;

pub use events::DumpEvents;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: FinancialReport,
    /// Every file written, in write order.
    pub artifacts: Vec<PathBuf>,
}

/// The stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Summarize,
    WriteSummary,
    RenderInventory,
    RenderPrices,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Load,
        Stage::Summarize,
        Stage::WriteSummary,
        Stage::RenderInventory,
        Stage::RenderPrices,
    ];

    /// Zero-based position in [`Stage::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Stage::Load => "Loading events...",
            Stage::Summarize => "Summarizing...",
            Stage::WriteSummary => "Writing summary...",
            Stage::RenderInventory => "Rendering inventory...",
            Stage::RenderPrices => "Rendering prices...",
        }
    }
}

/// The main analysis pipeline.
pub struct Analyzer {
    settings: Settings,
    engine: AnalyticsEngine,
}

impl Analyzer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            engine: AnalyticsEngine::new(),
        }
    }

    /// Runs every stage against the dump behind `repo`.
    pub fn run(&self, repo: &DumpRepository) -> Result<AnalysisOutcome, AnalyzerError> {
        self.run_with_progress(repo, |_| {})
    }

    /// Like [`Analyzer::run`], calling `on_stage` right before each stage starts.
    pub fn run_with_progress<F>(
        &self,
        repo: &DumpRepository,
        mut on_stage: F,
    ) -> Result<AnalysisOutcome, AnalyzerError>
    where
        F: FnMut(Stage),
    {
        // 1. Load
        on_stage(Stage::Load);
        let events = self.load(repo)?;

        // 2. Summarize
        on_stage(Stage::Summarize);
        let report = self.summarize(&events)?;

        // 3. Persist the summary before anything can fail on timestamps
        on_stage(Stage::WriteSummary);
        let mut artifacts = vec![self.write_summary(repo, &report)?];

        // 4. Charts
        on_stage(Stage::RenderInventory);
        artifacts.push(self.render_inventory(repo, &events)?);
        on_stage(Stage::RenderPrices);
        artifacts.extend(self.render_prices(repo, &events)?);

        Ok(AnalysisOutcome { report, artifacts })
    }

    pub fn load(&self, repo: &DumpRepository) -> Result<DumpEvents, AnalyzerError> {
        Ok(DumpEvents::load(repo)?)
    }

    /// Builds the financial report and applies the unknown-merchant policy.
    ///
    /// The report's unknown merchants cover every event category, offers
    /// included. Under `Reject` any of them fails the run before an artifact
    /// exists. Under `Drop` they are logged and only mapped merchants get rows.
    pub fn summarize(&self, events: &DumpEvents) -> Result<FinancialReport, AnalyzerError> {
        let mut report = self.engine.summarize(
            &events.mapping,
            &events.purchases,
            &events.orders,
            &events.holding_costs,
        )?;
        report.unknown_merchants.extend(events.unknown_merchants());

        if !report.unknown_merchants.is_empty() {
            match self.settings.analysis.unknown_merchants {
                UnknownMerchantPolicy::Reject => report.ensure_no_unknown_merchants()?,
                UnknownMerchantPolicy::Drop => {
                    let ids: Vec<_> = report.unknown_merchants.iter().map(|id| id.as_str()).collect();
                    tracing::warn!(merchants = ?ids, "Dropping events of merchants missing from the mapping.");
                }
            }
        }

        tracing::info!(
            merchants = report.summaries.len(),
            total_profit = report.total_profit(),
            "Computed financial summary."
        );
        Ok(report)
    }

    pub fn write_summary(
        &self,
        repo: &DumpRepository,
        report: &FinancialReport,
    ) -> Result<PathBuf, AnalyzerError> {
        Ok(repo.save_summary(&self.settings.output.summary_file, report)?)
    }

    /// Reconstructs inventory levels and writes the inventory chart.
    pub fn render_inventory(
        &self,
        repo: &DumpRepository,
        events: &DumpEvents,
    ) -> Result<PathBuf, AnalyzerError> {
        let levels = timeline::inventory_levels(
            &events.orders,
            &events.purchases,
            self.settings.analysis.success_code,
        )?;
        tracing::info!(merchants = levels.len(), "Reconstructed inventory levels.");

        let styles = MerchantStyles::new(&events.mapping);
        let chart = series::inventory_chart(&levels, &styles, &self.settings.charts);
        let svg = chart.render_svg()?;
        Ok(repo.save_artifact(&self.settings.output.inventory_chart, svg.as_bytes())?)
    }

    /// Writes the per-merchant price chart and, if enabled, the per-offer one.
    ///
    /// Returns no paths when the dump has no offer events.
    pub fn render_prices(
        &self,
        repo: &DumpRepository,
        events: &DumpEvents,
    ) -> Result<Vec<PathBuf>, AnalyzerError> {
        if !events.has_offers() {
            tracing::warn!("The dump has no offer events; skipping the price charts.");
            return Ok(Vec::new());
        }

        let offers = timeline::successful_offers(
            events.offer_adds(),
            events.offer_updates(),
            self.settings.analysis.success_code,
        )?;
        let styles = MerchantStyles::new(&events.mapping);
        let output = &self.settings.output;
        let mut written = Vec::new();

        let by_merchant = timeline::prices_by_merchant(&offers);
        let svg = series::merchant_price_chart(&by_merchant, &styles, &self.settings.charts)
            .render_svg()?;
        written.push(repo.save_artifact(&output.price_chart, svg.as_bytes())?);

        if output.per_offer_prices {
            let by_offer = timeline::prices_by_offer(&offers);
            tracing::debug!(offers = by_offer.len(), "Rendering per-offer prices.");
            let svg = series::offer_price_chart(&by_offer, &styles, &self.settings.charts)
                .render_svg()?;
            written.push(repo.save_artifact(&output.offer_price_chart, svg.as_bytes())?);
        }

        Ok(written)
    }
}
