use core_types::EventCategory;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("The dump directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("The merchant id mapping was not found at {}", .0.display())]
    MissingMapping(PathBuf),

    #[error("The '{category}' event category was not found at {}", .path.display())]
    MissingCategory { category: EventCategory, path: PathBuf },

    #[error("Malformed data in {}: {source}", .path.display())]
    MalformedData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write the summary table: {0}")]
    Csv(#[from] csv::Error),
}
