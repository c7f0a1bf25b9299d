use std::path::PathBuf;

use crate::track::DEFAULT_SAMPLE_COUNT;

/// Knobs shared by the sampler, the pass builder and the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Samples per pass track, endpoints included.
    pub sample_count: usize,
    /// Passes whose truncated peak elevation is not above this are left out of the report.
    pub min_elevation_deg: f64,
    /// Elevation the ephemeris treats as the horizon when looking for rise and set.
    pub horizon_deg: f64,
    pub images_dir: PathBuf,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            min_elevation_deg: 0.0,
            horizon_deg: 0.0,
            images_dir: PathBuf::from("images"),
        }
    }
}
