use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(#[source] PredictError),
    #[error("geometry unavailable at {at}: {source}")]
    GeometryUnavailable {
        at: DateTime<Utc>,
        #[source]
        source: PredictError,
    },
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    pub fn invariant(message: impl Into<String>) -> Self {
        EngineError::InvariantViolation(message.into())
    }
}
