use chrono::{DateTime, Utc};
use strum_macros::Display;

/// Information about a single satellite from TLE
#[derive(Debug, Clone)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MarkerKind {
    Rise,
    Culmination,
    Set,
}

/// A timestamped horizon or culmination event reported by the ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub at: DateTime<Utc>,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn new(at: DateTime<Utc>, kind: MarkerKind) -> Self {
        Self { at, kind }
    }
}

/// Elevation and azimuth of a satellite as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltAz {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}
