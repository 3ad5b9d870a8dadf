use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid timestamp '{value}', expected {expected}")]
    TimestampFormat {
        value: String,
        expected: &'static str,
        #[source]
        source: Option<chrono::ParseError>,
    },
}
