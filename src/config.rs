use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::event::{Location, PipelineSettings};
use crate::report::ReportOptions;
use crate::track::DEFAULT_SAMPLE_COUNT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub satellite: SatelliteConfig,
    pub window: WindowConfig,
    pub location: LocationConfig,
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    pub downlink_mhz: f64,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    /// Exact TLE name or catalog number.
    pub name: String,
    #[serde(default = "default_tle_dir")]
    pub tle_dir: PathBuf,
    /// Where fresh element sets are fetched from when `reload` is set.
    #[serde(default = "default_tle_url")]
    pub tle_url: String,
    #[serde(default)]
    pub reload: bool,
}

/// Observation window. Exactly one of `end` and `duration` must be given.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// humantime syntax, e.g. `5d 8h 50m`
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default)]
    pub min_elevation: f64,
    #[serde(default)]
    pub horizon: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            min_elevation: 0.0,
            horizon: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    #[serde(default = "default_json")]
    pub json: PathBuf,
    #[serde(default = "default_html")]
    pub html: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_stylesheet")]
    pub stylesheet: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            json: default_json(),
            html: default_html(),
            title: default_title(),
            stylesheet: default_stylesheet(),
        }
    }
}

fn default_utc_offset() -> String {
    "Z".to_string()
}

fn default_tle_dir() -> PathBuf {
    PathBuf::from("tle")
}

fn default_tle_url() -> String {
    "https://celestrak.org/NORAD/elements/stations.txt".to_string()
}

fn default_samples() -> usize {
    DEFAULT_SAMPLE_COUNT
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_json() -> PathBuf {
    PathBuf::from("sstv_event.json")
}

fn default_html() -> PathBuf {
    PathBuf::from("report.html")
}

fn default_title() -> String {
    ReportOptions::default().title
}

fn default_stylesheet() -> Option<String> {
    ReportOptions::default().stylesheet
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window()?;
        self.timezone()?;
        self.location()?;
        if self.sampling.samples < 2 {
            return Err(ConfigError::Invalid(format!(
                "sampling.samples must be at least 2, got {}",
                self.sampling.samples
            )));
        }
        Ok(())
    }

    pub fn window(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ConfigError> {
        let start = self.window.start;
        let end = match (&self.window.end, &self.window.duration) {
            (Some(end), None) => *end,
            (None, Some(duration)) => start
                .checked_add_signed(parse_duration(duration)?)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "window duration {duration:?} runs past the supported date range"
                    ))
                })?,
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "window takes either end or duration, not both".into(),
                ))
            }
            (None, None) => {
                return Err(ConfigError::Invalid(
                    "window needs an end or a duration".into(),
                ))
            }
        };

        if start >= end {
            return Err(ConfigError::Invalid(format!(
                "window start {start} is not before end {end}"
            )));
        }
        Ok((start, end))
    }

    pub fn timezone(&self) -> Result<FixedOffset, ConfigError> {
        parse_utc_offset(&self.utc_offset)
    }

    pub fn location(&self) -> Result<Location, ConfigError> {
        let loc = &self.location;
        Location::new(loc.lat, loc.lon, loc.city.clone(), loc.country.clone())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            sample_count: self.sampling.samples,
            min_elevation_deg: self.sampling.min_elevation,
            horizon_deg: self.sampling.horizon,
            images_dir: self.output.images_dir.clone(),
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            title: self.output.title.clone(),
            stylesheet: self.output.stylesheet.clone(),
        }
    }
}

fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(s.trim())
        .map_err(|e| ConfigError::Invalid(format!("window duration {s:?}: {e}")))
        .and_then(|d| {
            Duration::from_std(d)
                .map_err(|e| ConfigError::Invalid(format!("window duration {s:?}: {e}")))
        })
}

/// Accepts `Z`, `UTC`, `+HH`, `+HHMM` and `+HH:MM` (or with `-`).
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::Invalid(format!("unrecognised UTC offset {s:?}"));
    let s = s.trim();

    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
