use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Chart '{title}' has an invalid size of {width}x{height}")]
    InvalidGeometry {
        title: String,
        width: u32,
        height: u32,
    },

    #[error("Chart '{title}' has values too large to scale an axis for")]
    ValueOutOfRange { title: String },

    #[error("Series '{series}' contains a non-finite value")]
    NonFiniteValue { series: String },

    #[error("Failed to format SVG output: {0}")]
    Format(#[from] std::fmt::Error),
}
