//! # Financial aggregation
//!
//! Groups the heterogeneous event streams of a dump by merchant and sums them
//! into per-merchant revenue, holding cost, order cost and profit.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate that depends only on `core-types`.
//!   It never touches the filesystem.
//! - **Default-zero sums:** `MerchantTotals` is seeded from the merchant
//!   mapping, so a merchant without events reads as zero rather than missing.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Produces a `FinancialReport` from the loaded events.
//! - `aggregate`: One sum per merchant over one event sequence and extractor.
//! - `MerchantTotals`: The sum-with-default accumulator.
//! - `FinancialReport` / `MerchantSummary`: The summary table rows.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod accumulator;
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use accumulator::MerchantTotals;
pub use engine::{aggregate, AnalyticsEngine};
pub use error::AnalyticsError;
pub use report::{FinancialReport, MerchantSummary};
