mod error;
mod font;
mod polar;

use std::path::Path;

use chrono::FixedOffset;

pub use error::RenderError;
pub use polar::PolarPlotRenderer;

use crate::track::{TrackSample, Waypoint};

/// Draws a pass's sky track to an image file at `path`.
pub trait Renderer {
    fn render_polar_track(
        &self,
        track: &[TrackSample],
        waypoints: &[Waypoint],
        tz: &FixedOffset,
        path: &Path,
    ) -> Result<(), RenderError>;
}
