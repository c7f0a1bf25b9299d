//! In-memory collaborators for pipeline tests.

use std::cell::Cell;
use std::f64::consts::PI;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use crate::event::{Location, SatelliteRef};
use crate::predict::{AltAz, Ephemeris, Marker, MarkerKind, PredictError};
use crate::render::{RenderError, Renderer};
use crate::track::{TrackSample, Waypoint};

/// `secs` after 2021-06-21 09:40:00 UTC.
pub fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 21, 9, 40, 0).unwrap() + Duration::seconds(secs)
}

struct Profile {
    aos: DateTime<Utc>,
    los: DateTime<Utc>,
    peak_deg: f64,
}

/// Ephemeris replaying a fixed marker list. Inside a profile the elevation
/// follows `peak * sin(pi * f)` over the pass fraction `f`, so it culminates
/// at the midpoint; outside every profile the satellite sits below the horizon.
#[derive(Default)]
pub struct ScriptedEphemeris {
    markers: Vec<Marker>,
    profiles: Vec<Profile>,
    failing: Option<(DateTime<Utc>, DateTime<Utc>)>,
    fail_events: bool,
    position_calls: Cell<usize>,
}

impl ScriptedEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single_pass(aos: i64, los: i64, peak_deg: f64) -> Self {
        Self::new().with_pass(aos, los, peak_deg)
    }

    pub fn with_marker(mut self, secs: i64, kind: MarkerKind) -> Self {
        self.markers.push(Marker::new(t(secs), kind));
        self
    }

    pub fn with_profile(mut self, aos: i64, los: i64, peak_deg: f64) -> Self {
        self.profiles.push(Profile {
            aos: t(aos),
            los: t(los),
            peak_deg,
        });
        self
    }

    /// Rise, culmination and set markers plus the matching geometry.
    pub fn with_pass(self, aos: i64, los: i64, peak_deg: f64) -> Self {
        self.with_marker(aos, MarkerKind::Rise)
            .with_marker((aos + los) / 2, MarkerKind::Culmination)
            .with_marker(los, MarkerKind::Set)
            .with_profile(aos, los, peak_deg)
    }

    /// Positions strictly after `at` fail.
    pub fn failing_after(self, at: DateTime<Utc>) -> Self {
        self.failing_between(at, DateTime::<Utc>::MAX_UTC)
    }

    /// Positions in `(from, to]` fail.
    pub fn failing_between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.failing = Some((from, to));
        self
    }

    pub fn failing_events(mut self) -> Self {
        self.fail_events = true;
        self
    }

    pub fn fixture(&self) -> (SatelliteRef, Location) {
        let sat = SatelliteRef {
            name: "ISS (ZARYA)".to_string(),
            norad_id: 25544,
            epoch: t(-86_400),
        };
        let here = Location::new(
            -43.53189984688002,
            172.63925976596593,
            "Christchurch",
            "New Zealand",
        )
        .unwrap();
        (sat, here)
    }

    pub fn position_calls(&self) -> usize {
        self.position_calls.get()
    }
}

impl Ephemeris for ScriptedEphemeris {
    fn satellite(&self, selector: &str) -> Result<SatelliteRef, PredictError> {
        let (sat, _) = self.fixture();
        if selector == sat.name {
            Ok(sat)
        } else {
            Err(PredictError::UnknownSatellite(selector.to_string()))
        }
    }

    fn epoch(&self, satellite: &SatelliteRef) -> Result<DateTime<Utc>, PredictError> {
        Ok(satellite.epoch)
    }

    fn events(
        &self,
        _satellite: &SatelliteRef,
        _location: &Location,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _min_elevation_deg: f64,
    ) -> Result<Vec<Marker>, PredictError> {
        if self.fail_events {
            return Err(PredictError::NoSatellites);
        }
        let mut markers = self.markers.clone();
        markers.sort_by_key(|m| m.at);
        Ok(markers)
    }

    fn position(
        &self,
        _satellite: &SatelliteRef,
        _location: &Location,
        at: DateTime<Utc>,
    ) -> Result<AltAz, PredictError> {
        self.position_calls.set(self.position_calls.get() + 1);

        if let Some((from, to)) = self.failing {
            if at > from && at <= to {
                return Err(PredictError::Propagation {
                    at,
                    message: "scripted failure".to_string(),
                });
            }
        }

        let profile = self.profiles.iter().find(|p| at >= p.aos && at <= p.los);
        Ok(match profile {
            Some(p) => {
                let span = (p.los - p.aos).num_milliseconds() as f64;
                let frac = (at - p.aos).num_milliseconds() as f64 / span;
                AltAz {
                    elevation_deg: p.peak_deg * (PI * frac).sin(),
                    azimuth_deg: 90.0 + 180.0 * frac,
                }
            }
            None => AltAz {
                elevation_deg: -5.0,
                azimuth_deg: 0.0,
            },
        })
    }
}

/// Writes a placeholder file and counts how often it was asked to.
#[derive(Default)]
pub struct CountingRenderer {
    calls: Cell<usize>,
}

impl CountingRenderer {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Renderer for CountingRenderer {
    fn render_polar_track(
        &self,
        track: &[TrackSample],
        _waypoints: &[Waypoint],
        _tz: &FixedOffset,
        path: &Path,
    ) -> Result<(), RenderError> {
        self.calls.set(self.calls.get() + 1);
        fs::write(path, format!("{} samples", track.len()))?;
        Ok(())
    }
}

pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render_polar_track(
        &self,
        _track: &[TrackSample],
        _waypoints: &[Waypoint],
        _tz: &FixedOffset,
        _path: &Path,
    ) -> Result<(), RenderError> {
        Err(RenderError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }
}

/// Leaves a half-written file behind before failing.
pub struct TruncatingRenderer;

impl Renderer for TruncatingRenderer {
    fn render_polar_track(
        &self,
        _track: &[TrackSample],
        _waypoints: &[Waypoint],
        _tz: &FixedOffset,
        path: &Path,
    ) -> Result<(), RenderError> {
        fs::write(path, b"\x89PNG\r\n")?;
        Err(RenderError::Io(io::Error::new(
            io::ErrorKind::WriteZero,
            "disk full",
        )))
    }
}
