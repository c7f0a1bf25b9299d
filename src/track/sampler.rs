use chrono::{DateTime, Utc};

use crate::event::{EngineError, Location, SatelliteRef};
use crate::predict::Ephemeris;
use crate::track::TrackSample;

pub const DEFAULT_SAMPLE_COUNT: usize = 50;

/// Evenly spaced instants from `aos` to `los`, both included.
///
/// The last instant is `los` itself rather than `aos + (n - 1) * step`.
pub fn sample_times(
    aos: DateTime<Utc>,
    los: DateTime<Utc>,
    n: usize,
) -> Result<Vec<DateTime<Utc>>, EngineError> {
    if n < 2 {
        return Err(EngineError::invariant(format!(
            "track needs at least 2 samples, got {n}"
        )));
    }
    if aos >= los {
        return Err(EngineError::invariant(format!(
            "cannot sample interval with AOS {aos} not before LOS {los}"
        )));
    }

    let intervals = i32::try_from(n - 1)
        .map_err(|_| EngineError::invariant(format!("sample count {n} too large")))?;
    let step = (los - aos) / intervals;

    let mut times: Vec<_> = (0..intervals).map(|i| aos + step * i).collect();
    times.push(los);
    Ok(times)
}

/// Query the ephemeris at `n` instants across the pass.
pub fn sample_track(
    ephemeris: &dyn Ephemeris,
    satellite: &SatelliteRef,
    location: &Location,
    aos: DateTime<Utc>,
    los: DateTime<Utc>,
    n: usize,
) -> Result<Vec<TrackSample>, EngineError> {
    sample_times(aos, los, n)?
        .into_iter()
        .map(|at| {
            ephemeris
                .position(satellite, location, at)
                .map(|altaz| TrackSample::from_altaz(altaz, at))
                .map_err(|source| EngineError::GeometryUnavailable { at, source })
        })
        .collect()
}
