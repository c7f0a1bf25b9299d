use askama::Template;

use super::format::{format_duration, format_elevation, format_time, format_utc_offset};
use crate::event::Event;

/// Presentation knobs for the HTML report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    pub stylesheet: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "ARISS SSTV Event Details".to_string(),
            stylesheet: Some("style.css".to_string()),
        }
    }
}

pub struct PassRow {
    pub number: usize,
    pub aos: String,
    pub los: String,
    pub duration: String,
    pub elevation: String,
    pub has_image: bool,
    pub image: String,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate {
    pub title: String,
    pub has_stylesheet: bool,
    pub stylesheet: String,
    pub satellite: String,
    pub utc_offset: String,
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub epoch: String,
    pub start: String,
    pub end: String,
    pub downlink: String,
    pub rows: Vec<PassRow>,
}

impl ReportTemplate {
    pub fn new(event: &Event, options: &ReportOptions) -> Self {
        let tz = &event.tz;
        let rows = event
            .passes()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let image = p
                    .image_path()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                PassRow {
                    number: i + 1,
                    aos: format_time(p.aos(), tz),
                    los: format_time(p.los(), tz),
                    duration: format_duration(p.duration()),
                    elevation: format_elevation(p.max_elevation_deg()),
                    has_image: !image.is_empty(),
                    image,
                }
            })
            .collect();

        Self {
            title: options.title.clone(),
            has_stylesheet: options.stylesheet.is_some(),
            stylesheet: options.stylesheet.clone().unwrap_or_default(),
            satellite: event.satellite.name.clone(),
            utc_offset: format_utc_offset(tz),
            location: event.location.to_string(),
            lat: event.location.lat(),
            lon: event.location.lon(),
            epoch: format_time(event.satellite.epoch, tz),
            start: format_time(event.start, tz),
            end: format_time(event.end, tz),
            downlink: format!("{:.3}", event.downlink_mhz),
            rows,
        }
    }
}
