use thiserror::Error;

use common::error::Error as ProbeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(String),

    #[error("Probe error: {0}")]
    ProbeError(#[from] ProbeError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),
}
