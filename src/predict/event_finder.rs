use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::propagation::look_angles;
use crate::predict::types::{Marker, MarkerKind};
use crate::predict::GroundStation;

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement

/// Scan `[start, end]` for rise, culmination and set markers.
///
/// A satellite already above `horizon_deg` at `start` yields no rise for that
/// pass, and one still above at `end` yields no set. Culminations are only
/// reported for peaks that are bracketed by lower samples on both sides.
pub fn find_markers(
    station: &GroundStation,
    elements: &Elements,
    constants: &Constants,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    horizon_deg: f64,
) -> Result<Vec<Marker>, PredictError> {
    let elevation_at = |t: DateTime<Utc>| -> Result<f64, PredictError> {
        Ok(look_angles(station, elements, constants, t)?.elevation_deg)
    };

    let mut markers = Vec::new();
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);

    let mut prev_time = start;
    let prev_el = elevation_at(start)?;
    let mut prev_visible = prev_el >= horizon_deg;

    // Highest coarse sample of the current above-horizon run
    let mut peak = prev_visible.then_some((start, prev_el));

    while prev_time < end {
        let cursor = (prev_time + coarse_step).min(end);
        let el = elevation_at(cursor)?;
        let visible = el >= horizon_deg;

        if visible && !prev_visible {
            let aos = refine_crossing(&elevation_at, prev_time, cursor, true, horizon_deg)?;
            markers.push(Marker::new(aos, MarkerKind::Rise));
            peak = Some((cursor, el));
        } else if visible {
            if peak.is_some_and(|(_, peak_el)| el > peak_el) {
                peak = Some((cursor, el));
            }
        } else if prev_visible {
            let los = refine_crossing(&elevation_at, prev_time, cursor, false, horizon_deg)?;

            // A run already above the horizon at `start` that only descends has no true peak.
            if let Some((peak_time, _)) = peak.take().filter(|(t, _)| *t != start) {
                let lo = (peak_time - coarse_step).max(start);
                let hi = (peak_time + coarse_step).min(los);
                let (tca, tca_el) = refine_peak(&elevation_at, lo, hi)?;
                if tca_el >= horizon_deg {
                    markers.push(Marker::new(tca, MarkerKind::Culmination));
                }
            }

            markers.push(Marker::new(los, MarkerKind::Set));
        }

        prev_time = cursor;
        prev_visible = visible;
    }

    markers.sort_by_key(|m| m.at);
    Ok(markers)
}

/// Binary search to find exact horizon crossing time
fn refine_crossing<F>(
    elevation_at: &F,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
    horizon_deg: f64,
) -> Result<DateTime<Utc>, PredictError>
where
    F: Fn(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let above = elevation_at(mid)? >= horizon_deg;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(high)
}

/// Ternary search for the elevation maximum inside `[low, high]`.
fn refine_peak<F>(
    elevation_at: &F,
    low: DateTime<Utc>,
    high: DateTime<Utc>,
) -> Result<(DateTime<Utc>, f64), PredictError>
where
    F: Fn(DateTime<Utc>) -> Result<f64, PredictError>,
{
    let mut low = low;
    let mut high = high;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let third = (high - low) / 3;
        let m1 = low + third;
        let m2 = high - third;
        if elevation_at(m1)? < elevation_at(m2)? {
            low = m1;
        } else {
            high = m2;
        }
    }

    let tca = low + (high - low) / 2;
    Ok((tca, elevation_at(tca)?))
}
