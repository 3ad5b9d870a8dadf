//! # Dump store
//!
//! Reads a finished simulation dump from disk and writes the analysis
//! artifacts back into it.
//!
//! A dump directory holds the merchant id → name mapping and one JSON array per
//! event category under the events sub-directory. Records are validated into
//! the typed events of `core-types` as they are loaded, so a shape mismatch
//! fails the load instead of surfacing later at the point of use.
//!
//! ## Public API
//!
//! - `DumpRepository`: Loads the mapping and event categories, saves the
//!   summary table and chart files.
//! - `open` / `DumpPaths`: Resolve the configured layout against a directory.
//! - `StoreError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod layout;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use layout::{open, DumpPaths};
pub use repository::{DumpRepository, SUMMARY_HEADER};
