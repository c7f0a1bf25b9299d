use crate::event::EngineError;
use crate::track::{TrackSample, Waypoint};

/// Index of the sample closest to zenith. The earliest index wins on ties and
/// NaN zenith distances are never selected.
pub fn culmination_index(track: &[TrackSample]) -> Result<usize, EngineError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, sample) in track.iter().enumerate() {
        if sample.r.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, r)| sample.r < r) {
            best = Some((i, sample.r));
        }
    }

    best.map(|(i, _)| i)
        .ok_or_else(|| EngineError::invariant("track has no usable samples"))
}

pub fn max_elevation(track: &[TrackSample]) -> Result<f64, EngineError> {
    let idx = culmination_index(track)?;
    Ok(90.0 - track[idx].r)
}

/// Start, quarter, culmination, three-quarter and end indices.
///
/// The quarter points are spaced relative to the culmination index, not the
/// track length, and may coincide with their neighbours.
pub fn waypoint_indices(culmination: usize, len: usize) -> Result<[usize; 5], EngineError> {
    if culmination >= len {
        return Err(EngineError::invariant(format!(
            "culmination index {culmination} outside track of {len} samples"
        )));
    }
    let last = len - 1;
    Ok([
        0,
        culmination / 2,
        culmination,
        (3 * culmination / 2).min(last),
        last,
    ])
}

pub fn select_waypoints(track: &[TrackSample]) -> Result<[Waypoint; 5], EngineError> {
    let idx = culmination_index(track)?;
    let indices = waypoint_indices(idx, track.len())?;
    Ok(indices.map(|index| Waypoint {
        index,
        sample: track[index],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::t;
    use approx::assert_relative_eq;

    /// Track whose elevation rises linearly to `peak_el` at `peak` and falls back.
    fn peaked_track(n: usize, peak: usize, peak_el: f64) -> Vec<TrackSample> {
        (0..n)
            .map(|i| {
                let dist = i.abs_diff(peak) as f64;
                let span = peak.max(n - 1 - peak).max(1) as f64;
                TrackSample {
                    theta: i as f64 * 0.05,
                    r: 90.0 - peak_el * (1.0 - dist / span),
                    at: t(i as i64 * 10),
                }
            })
            .collect()
    }

    fn indices(waypoints: &[Waypoint; 5]) -> Vec<usize> {
        waypoints.iter().map(|w| w.index).collect()
    }

    #[test]
    fn peak_at_ten_of_fifty() {
        let track = peaked_track(50, 10, 70.0);
        let waypoints = select_waypoints(&track).unwrap();
        assert_eq!(indices(&waypoints), vec![0, 5, 10, 15, 49]);
        assert_relative_eq!(max_elevation(&track).unwrap(), 70.0);
    }

    #[test]
    fn boundary_culminations_stay_in_range() {
        for peak in [0, 1, 2, 33, 48, 49] {
            let track = peaked_track(50, peak, 45.0);
            let waypoints = select_waypoints(&track).unwrap();
            assert_eq!(waypoints.len(), 5);
            assert!(waypoints.iter().all(|w| w.index < 50));
            assert_eq!(waypoints[2].index, peak);
            assert_eq!(waypoints[0].index, 0);
            assert_eq!(waypoints[4].index, 49);
        }
    }

    #[test]
    fn early_culmination_duplicates_points() {
        assert_eq!(waypoint_indices(0, 50).unwrap(), [0, 0, 0, 0, 49]);
        assert_eq!(waypoint_indices(1, 50).unwrap(), [0, 0, 1, 1, 49]);
        assert_eq!(waypoint_indices(49, 50).unwrap(), [0, 24, 49, 49, 49]);
    }

    #[test]
    fn out_of_range_culmination_is_rejected() {
        assert!(matches!(
            waypoint_indices(50, 50),
            Err(EngineError::InvariantViolation(_))
        ));
        assert!(culmination_index(&[]).is_err());
    }

    #[test]
    fn ties_pick_the_earliest_index() {
        let mut track = peaked_track(10, 3, 40.0);
        track[6].r = track[3].r;
        assert_eq!(culmination_index(&track).unwrap(), 3);
    }

    #[test]
    fn nan_samples_are_skipped() {
        let mut track = peaked_track(10, 3, 40.0);
        track[0].r = f64::NAN;
        assert_eq!(culmination_index(&track).unwrap(), 3);
    }

    #[test]
    fn max_elevation_matches_culmination_sample() {
        for peak in [0, 7, 25, 49] {
            let track = peaked_track(50, peak, 63.5);
            let idx = culmination_index(&track).unwrap();
            let max_el = max_elevation(&track).unwrap();
            assert_relative_eq!(max_el, track[idx].elevation_deg());
            assert!((0.0..=90.0).contains(&max_el));
            let min_r = track.iter().map(|s| s.r).fold(f64::INFINITY, f64::min);
            assert_relative_eq!(max_el, 90.0 - min_r);
        }
    }
}
