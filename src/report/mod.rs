//! JSON and HTML output for a processed event.
//!
//! Both writers replace the destination file in place. A failure part way
//! through can leave it truncated; nothing is rolled back.

mod error;
pub mod format;
mod html;
mod snapshot;

use std::fs;
use std::path::Path;

use askama::Template;

pub use error::ReportError;
pub use html::ReportOptions;
use html::ReportTemplate;
use snapshot::snapshot_v1;

use crate::event::Event;

pub fn render_json(event: &Event) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&snapshot_v1(event))?)
}

pub fn render_html(event: &Event, options: &ReportOptions) -> Result<String, ReportError> {
    Ok(ReportTemplate::new(event, options).render()?)
}

pub fn write_json(event: &Event, path: &Path) -> Result<(), ReportError> {
    fs::write(path, render_json(event)?)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

pub fn write_html(event: &Event, options: &ReportOptions, path: &Path) -> Result<(), ReportError> {
    fs::write(path, render_html(event, options)?)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
