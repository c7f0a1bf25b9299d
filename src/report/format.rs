use chrono::{DateTime, Duration, FixedOffset, Utc};

const DISPLAY_FORMAT: &str = "%Y %b %d %H:%M:%S";
const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// `2021 Jun 21 21:40:00` in the display time zone.
pub fn format_time(t: DateTime<Utc>, tz: &FixedOffset) -> String {
    t.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

/// Compact timestamp used for image file names.
pub fn image_stamp(t: DateTime<Utc>, tz: &FixedOffset) -> String {
    t.with_timezone(tz).format(STAMP_FORMAT).to_string()
}

/// `MM:SS`, minutes not capped at 59.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// `+HHMM` / `-HHMM`
pub fn format_utc_offset(tz: &FixedOffset) -> String {
    let secs = tz.local_minus_utc();
    let sign = if secs >= 0 { '+' } else { '-' };
    let abs = secs.unsigned_abs();
    format!("{}{:02}{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

/// Truncated integer degrees with a degree sign.
pub fn format_elevation(elevation_deg: f64) -> String {
    format!("{}°", elevation_deg.trunc() as i64)
}
