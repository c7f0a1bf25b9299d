use serde::Serialize;

use super::format::format_time;
use crate::event::{Event, Location, Pass};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSnapshot {
    pub satellite: String,
    pub start: String,
    pub end: String,
    pub location: LocationSnapshot,
    /// Display zone offset from UTC, seconds.
    pub timezone: i32,
    pub epoch: String,
    pub passes: Vec<PassSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSnapshot {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassSnapshot {
    pub aos: String,
    pub los: String,
    pub duration: f64,
    pub elevation: f64,
    pub image_path: Option<String>,
}

impl From<&Location> for LocationSnapshot {
    fn from(location: &Location) -> Self {
        Self {
            lat: location.lat(),
            lon: location.lon(),
            city: location.city().to_string(),
            country: location.country().to_string(),
        }
    }
}

/// Version 1 of the JSON snapshot layout.
pub fn snapshot_v1(event: &Event) -> EventSnapshot {
    let tz = &event.tz;
    let pass = |p: &Pass| PassSnapshot {
        aos: format_time(p.aos(), tz),
        los: format_time(p.los(), tz),
        duration: p.duration_secs(),
        elevation: p.max_elevation_deg(),
        image_path: p.image_path().map(|path| path.display().to_string()),
    };

    EventSnapshot {
        satellite: event.satellite.name.clone(),
        start: format_time(event.start, tz),
        end: format_time(event.end, tz),
        location: LocationSnapshot::from(&event.location),
        timezone: tz.local_minus_utc(),
        epoch: format_time(event.satellite.epoch, tz),
        passes: event.passes().iter().map(pass).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_event;

    #[test]
    fn json_keys_follow_the_snapshot_layout() {
        let event = sample_event();
        let value = serde_json::to_value(snapshot_v1(&event)).unwrap();

        assert_eq!(value["satellite"], "ISS (ZARYA)");
        assert_eq!(value["start"], "2021 Jun 21 21:40:00");
        assert_eq!(value["end"], "2021 Jun 22 21:40:00");
        assert_eq!(value["timezone"], 43200);
        assert_eq!(value["epoch"], "2021 Jun 20 21:40:00");
        assert_eq!(value["location"]["city"], "Christchurch");
        assert_eq!(value["location"]["country"], "New Zealand");
        assert_eq!(value["location"]["lat"], -43.5);

        let passes = value["passes"].as_array().unwrap();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0]["aos"], "2021 Jun 21 21:50:00");
        assert_eq!(passes[0]["los"], "2021 Jun 21 22:00:00");
        assert_eq!(passes[0]["duration"], 600.0);
        assert_eq!(passes[0]["elevation"], 45.5);
        assert_eq!(passes[0]["image_path"], "images/20210621215000.png");
        assert!(passes[1]["image_path"].is_null());
    }

    #[test]
    fn negative_offsets_serialize_signed() {
        let mut event = sample_event();
        event.tz = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        let snapshot = snapshot_v1(&event);
        assert_eq!(snapshot.timezone, -18000);
        assert_eq!(snapshot.start, "2021 Jun 21 04:40:00");
    }
}
