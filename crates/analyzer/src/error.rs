use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Dump store error: {0}")]
    Store(#[from] dump_store::StoreError),

    #[error("Financial aggregation failed: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Time series reconstruction failed: {0}")]
    Timeline(#[from] timeline::TimelineError),

    #[error("Chart rendering failed: {0}")]
    Chart(#[from] charts::ChartError),
}
