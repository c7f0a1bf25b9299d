use chrono::{DateTime, Utc};

use crate::predict::AltAz;

/// One point of a polar sky track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    /// Azimuth in radians, clockwise from north.
    pub theta: f64,
    /// Zenith distance in degrees (90 at the horizon, 0 overhead).
    pub r: f64,
    pub at: DateTime<Utc>,
}

impl TrackSample {
    pub fn from_altaz(altaz: AltAz, at: DateTime<Utc>) -> Self {
        Self {
            theta: altaz.azimuth_deg.to_radians(),
            r: 90.0 - altaz.elevation_deg,
            at,
        }
    }

    #[cfg(test)]
    pub fn elevation_deg(&self) -> f64 {
        90.0 - self.r
    }
}

/// A track sample picked out for annotation, with its position in the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub index: usize,
    pub sample: TrackSample,
}
