use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, FixedOffset, Utc};

use super::error::EngineError;

/// A named observing site.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    lat: f64,
    lon: f64,
    city: String,
    country: String,
}

impl Location {
    pub fn new(
        lat: f64,
        lon: f64,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, EngineError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(EngineError::invariant(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(EngineError::invariant(format!(
                "longitude {lon} outside [-180, 180]"
            )));
        }
        Ok(Self {
            lat,
            lon,
            city: city.into(),
            country: country.into(),
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// Handle on a satellite known to the ephemeris.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteRef {
    pub name: String,
    pub norad_id: u32,
    pub epoch: DateTime<Utc>,
}

/// One AOS to LOS interval with its derived summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    aos: DateTime<Utc>,
    los: DateTime<Utc>,
    max_elevation_deg: f64,
    image_path: Option<PathBuf>,
}

impl Pass {
    pub fn new(
        aos: DateTime<Utc>,
        los: DateTime<Utc>,
        max_elevation_deg: f64,
        image_path: Option<PathBuf>,
    ) -> Result<Self, EngineError> {
        if aos >= los {
            return Err(EngineError::invariant(format!(
                "pass AOS {aos} is not before LOS {los}"
            )));
        }
        Ok(Self {
            aos,
            los,
            max_elevation_deg,
            image_path,
        })
    }

    pub fn aos(&self) -> DateTime<Utc> {
        self.aos
    }

    pub fn los(&self) -> DateTime<Utc> {
        self.los
    }

    pub fn duration(&self) -> Duration {
        self.los - self.aos
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 1000.0
    }

    pub fn max_elevation_deg(&self) -> f64 {
        self.max_elevation_deg
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// Whether the truncated peak elevation clears `threshold_deg`.
    pub fn is_visible(&self, threshold_deg: f64) -> bool {
        self.max_elevation_deg.trunc() > threshold_deg
    }
}

/// A visibility request over one window and the passes it produced.
#[derive(Debug, Clone)]
pub struct Event {
    pub satellite: SatelliteRef,
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub tz: FixedOffset,
    pub downlink_mhz: f64,
    pub(super) passes: Vec<Pass>,
}

impl Event {
    pub fn new(
        satellite: SatelliteRef,
        location: Location,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: FixedOffset,
        downlink_mhz: f64,
    ) -> Result<Self, EngineError> {
        if start >= end {
            return Err(EngineError::invariant(format!(
                "window start {start} is not before end {end}"
            )));
        }
        Ok(Self {
            satellite,
            location,
            start,
            end,
            tz,
            downlink_mhz,
            passes: Vec::new(),
        })
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    #[cfg(test)]
    pub(crate) fn push_pass(&mut self, pass: Pass) {
        self.passes.push(pass);
    }
}
