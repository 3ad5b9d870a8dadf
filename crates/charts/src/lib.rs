//! # Charts
//!
//! Renders time series as SVG step charts. The output is a plain string; where
//! it ends up is the caller's business.

pub mod error;
pub mod palette;
pub mod step_chart;

pub use error::ChartError;
pub use palette::{color_for, PALETTE};
pub use step_chart::{ChartSeries, StepChart, TIME_TICK_FORMAT};
