use chrono::{DateTime, Utc};

use crate::event::{Location, SatelliteRef};
use crate::predict::error::PredictError;
use crate::predict::event_finder::find_markers;
use crate::predict::propagation::look_angles;
use crate::predict::tle_loader::{TleEntry, TleLoader};
use crate::predict::types::{AltAz, Marker};
use crate::predict::GroundStation;

/// Source of satellite positions and horizon events.
///
/// `events` must return markers in ascending time order.
pub trait Ephemeris {
    fn satellite(&self, selector: &str) -> Result<SatelliteRef, PredictError>;

    fn epoch(&self, satellite: &SatelliteRef) -> Result<DateTime<Utc>, PredictError>;

    fn events(
        &self,
        satellite: &SatelliteRef,
        location: &Location,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_elevation_deg: f64,
    ) -> Result<Vec<Marker>, PredictError>;

    fn position(
        &self,
        satellite: &SatelliteRef,
        location: &Location,
        at: DateTime<Utc>,
    ) -> Result<AltAz, PredictError>;
}

/// SGP4 propagation over a catalog of loaded element sets.
pub struct Sgp4Ephemeris {
    loader: TleLoader,
}

impl Sgp4Ephemeris {
    pub fn new(loader: TleLoader) -> Self {
        Self { loader }
    }

    fn entry(&self, satellite: &SatelliteRef) -> Result<&TleEntry, PredictError> {
        self.loader
            .get(satellite.norad_id)
            .ok_or_else(|| PredictError::UnknownSatellite(satellite.name.clone()))
    }
}

impl Ephemeris for Sgp4Ephemeris {
    fn satellite(&self, selector: &str) -> Result<SatelliteRef, PredictError> {
        let entry = self
            .loader
            .find(selector)
            .ok_or_else(|| PredictError::UnknownSatellite(selector.to_string()))?;
        log::debug!(
            "{} resolved to NORAD {} from {}",
            selector,
            entry.info.norad_id,
            entry.info.tle_source
        );

        Ok(SatelliteRef {
            name: entry.info.name.clone(),
            norad_id: entry.info.norad_id,
            epoch: elements_epoch(entry),
        })
    }

    fn epoch(&self, satellite: &SatelliteRef) -> Result<DateTime<Utc>, PredictError> {
        Ok(elements_epoch(self.entry(satellite)?))
    }

    fn events(
        &self,
        satellite: &SatelliteRef,
        location: &Location,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_elevation_deg: f64,
    ) -> Result<Vec<Marker>, PredictError> {
        let entry = self.entry(satellite)?;
        find_markers(
            &GroundStation::from(location),
            &entry.elements,
            &entry.constants,
            start,
            end,
            min_elevation_deg,
        )
    }

    fn position(
        &self,
        satellite: &SatelliteRef,
        location: &Location,
        at: DateTime<Utc>,
    ) -> Result<AltAz, PredictError> {
        let entry = self.entry(satellite)?;
        let angles = look_angles(
            &GroundStation::from(location),
            &entry.elements,
            &entry.constants,
            at,
        )?;
        Ok(AltAz {
            elevation_deg: angles.elevation_deg,
            azimuth_deg: angles.azimuth_deg,
        })
    }
}

fn elements_epoch(entry: &TleEntry) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(entry.elements.datetime, Utc)
}
