use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};

use super::error::EngineError;
use super::model::{Location, Pass, SatelliteRef};
use super::pairing::Interval;
use super::settings::PipelineSettings;
use crate::predict::Ephemeris;
use crate::render::Renderer;
use crate::report::format::image_stamp;
use crate::track::{max_elevation, sample_track, select_waypoints, TrackSample, Waypoint};

/// Deterministic image location for a pass starting at `aos`.
pub fn image_path(images_dir: &Path, aos: DateTime<Utc>, tz: &FixedOffset) -> PathBuf {
    images_dir.join(format!("{}.png", image_stamp(aos, tz)))
}

#[derive(Debug, Clone)]
pub struct BuiltPass {
    pub pass: Pass,
    /// Whether the pass clears the minimum elevation threshold.
    pub visible: bool,
}

pub struct PassBuilder<'a> {
    ephemeris: &'a dyn Ephemeris,
    renderer: &'a dyn Renderer,
    settings: &'a PipelineSettings,
}

impl<'a> PassBuilder<'a> {
    pub fn new(
        ephemeris: &'a dyn Ephemeris,
        renderer: &'a dyn Renderer,
        settings: &'a PipelineSettings,
    ) -> Self {
        Self {
            ephemeris,
            renderer,
            settings,
        }
    }

    /// Sample, summarize and render one interval.
    ///
    /// Passes below the elevation threshold are rendered too. The caller
    /// decides whether to keep them.
    pub fn build(
        &self,
        satellite: &SatelliteRef,
        location: &Location,
        tz: &FixedOffset,
        interval: Interval,
    ) -> Result<BuiltPass, EngineError> {
        let Interval { aos, los } = interval;
        if aos >= los {
            return Err(EngineError::invariant(format!(
                "paired AOS {aos} is not before LOS {los}"
            )));
        }

        let track = sample_track(
            self.ephemeris,
            satellite,
            location,
            aos,
            los,
            self.settings.sample_count,
        )?;
        let waypoints = select_waypoints(&track)?;
        let max_el = max_elevation(&track)?;

        let image = self.ensure_image(&track, &waypoints, tz, aos);
        let pass = Pass::new(aos, los, max_el, image)?;
        let visible = pass.is_visible(self.settings.min_elevation_deg);

        Ok(BuiltPass { pass, visible })
    }

    /// Render the track unless an image already exists for this AOS.
    /// Returns `None` if the image could not be written.
    fn ensure_image(
        &self,
        track: &[TrackSample],
        waypoints: &[Waypoint],
        tz: &FixedOffset,
        aos: DateTime<Utc>,
    ) -> Option<PathBuf> {
        let dir = &self.settings.images_dir;
        if let Err(e) = fs::create_dir_all(dir) {
            log::warn!("Cannot create image directory {}: {}", dir.display(), e);
            return None;
        }

        let path = image_path(dir, aos, tz);
        if path.exists() {
            log::info!("Skipping {}", path.display());
            return Some(path);
        }

        log::info!("Creating {}", path.display());
        match self
            .renderer
            .render_polar_track(track, waypoints, tz, &path)
        {
            Ok(()) => Some(path),
            Err(e) => {
                log::warn!("Failed to render {}: {}", path.display(), e);
                // a partial file would be taken as a cached image next run
                if path.exists() {
                    if let Err(e) = fs::remove_file(&path) {
                        log::warn!("Cannot remove partial image {}: {}", path.display(), e);
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        t, CountingRenderer, FailingRenderer, ScriptedEphemeris, TruncatingRenderer,
    };
    use approx::assert_relative_eq;

    fn settings(dir: &Path) -> PipelineSettings {
        PipelineSettings {
            images_dir: dir.join("images"),
            ..PipelineSettings::default()
        }
    }

    fn nzst() -> FixedOffset {
        FixedOffset::east_opt(12 * 3600).unwrap()
    }

    fn interval(aos: i64, los: i64) -> Interval {
        Interval {
            aos: t(aos),
            los: t(los),
        }
    }

    #[test]
    fn image_name_follows_aos_in_display_zone() {
        let path = image_path(Path::new("images"), t(0), &nzst());
        assert_eq!(path, Path::new("images/20210621214000.png"));
    }

    #[test]
    fn builds_visible_pass_and_renders_once() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let ephemeris = ScriptedEphemeris::single_pass(0, 600, 42.0);
        let (sat, here) = ephemeris.fixture();
        let renderer = CountingRenderer::default();
        let builder = PassBuilder::new(&ephemeris, &renderer, &settings);

        let built = builder.build(&sat, &here, &nzst(), interval(0, 600)).unwrap();
        assert!(built.visible);
        assert_relative_eq!(built.pass.duration_secs(), 600.0);
        assert!(built.pass.max_elevation_deg() > 41.0);
        assert!(built.pass.max_elevation_deg() <= 42.0);
        assert_eq!(ephemeris.position_calls(), 50);

        let path = built.pass.image_path().unwrap().to_path_buf();
        assert!(path.exists());
        assert_eq!(renderer.calls(), 1);

        let again = builder.build(&sat, &here, &nzst(), interval(0, 600)).unwrap();
        assert_eq!(renderer.calls(), 1);
        assert_eq!(again.pass.image_path(), Some(path.as_path()));
    }

    #[test]
    fn low_pass_is_rendered_but_not_visible() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let ephemeris = ScriptedEphemeris::single_pass(0, 600, 0.6);
        let (sat, here) = ephemeris.fixture();
        let renderer = CountingRenderer::default();
        let builder = PassBuilder::new(&ephemeris, &renderer, &settings);

        let built = builder.build(&sat, &here, &nzst(), interval(0, 600)).unwrap();
        assert!(!built.visible);
        assert_eq!(renderer.calls(), 1);
        assert!(built.pass.image_path().is_some());
    }

    #[test]
    fn render_failure_keeps_pass_without_image() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let ephemeris = ScriptedEphemeris::single_pass(0, 600, 30.0);
        let (sat, here) = ephemeris.fixture();
        let builder = PassBuilder::new(&ephemeris, &FailingRenderer, &settings);

        let built = builder.build(&sat, &here, &nzst(), interval(0, 600)).unwrap();
        assert!(built.visible);
        assert_eq!(built.pass.image_path(), None);
    }

    #[test]
    fn partial_image_is_not_reused_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let ephemeris = ScriptedEphemeris::single_pass(0, 600, 30.0);
        let (sat, here) = ephemeris.fixture();

        let broken = PassBuilder::new(&ephemeris, &TruncatingRenderer, &settings);
        let first = broken.build(&sat, &here, &nzst(), interval(0, 600)).unwrap();
        assert_eq!(first.pass.image_path(), None);
        assert!(!image_path(&settings.images_dir, t(0), &nzst()).exists());

        let renderer = CountingRenderer::default();
        let working = PassBuilder::new(&ephemeris, &renderer, &settings);
        let second = working.build(&sat, &here, &nzst(), interval(0, 600)).unwrap();
        assert_eq!(renderer.calls(), 1);
        assert!(second.pass.image_path().is_some());
    }

    #[test]
    fn geometry_failure_abandons_pass() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let ephemeris = ScriptedEphemeris::single_pass(0, 600, 30.0).failing_after(t(100));
        let (sat, here) = ephemeris.fixture();
        let renderer = CountingRenderer::default();
        let builder = PassBuilder::new(&ephemeris, &renderer, &settings);

        let err = builder
            .build(&sat, &here, &nzst(), interval(0, 600))
            .unwrap_err();
        assert!(matches!(err, EngineError::GeometryUnavailable { .. }));
        assert_eq!(renderer.calls(), 0);
    }

    #[test]
    fn inverted_interval_is_an_invariant_violation() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let ephemeris = ScriptedEphemeris::single_pass(0, 600, 30.0);
        let (sat, here) = ephemeris.fixture();
        let renderer = CountingRenderer::default();
        let builder = PassBuilder::new(&ephemeris, &renderer, &settings);

        assert!(matches!(
            builder.build(&sat, &here, &nzst(), interval(600, 0)),
            Err(EngineError::InvariantViolation(_))
        ));
    }
}
