use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("no TLE directory at {0}")]
    DirectoryNotFound(String),
    #[error("cannot read TLE data: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("malformed element set in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("SGP4 failed at {at}: {message}")]
    Propagation { at: DateTime<Utc>, message: String },
    #[error("download from {url} failed: {message}")]
    Download { url: String, message: String },
    #[error("no satellite matches {0:?}")]
    UnknownSatellite(String),
    #[error("no element sets found")]
    NoSatellites,
}
