use super::builder::PassBuilder;
use super::error::EngineError;
use super::model::Event;
use super::pairing::{pair_markers, Interval};
use super::settings::PipelineSettings;
use crate::predict::Ephemeris;
use crate::render::Renderer;

/// Counts from one `Event::process` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSummary {
    pub intervals: usize,
    pub kept: usize,
    pub below_threshold: usize,
    pub abandoned: usize,
}

impl Event {
    /// Complete AOS/LOS intervals inside the window, in time order.
    ///
    /// Markers outside `[start, end]` are dropped before pairing, so a pass
    /// cut by either edge of the window never appears.
    pub fn intervals(
        &self,
        ephemeris: &dyn Ephemeris,
        horizon_deg: f64,
    ) -> Result<Vec<Interval>, EngineError> {
        let mut markers = ephemeris
            .events(
                &self.satellite,
                &self.location,
                self.start,
                self.end,
                horizon_deg,
            )
            .map_err(EngineError::EphemerisUnavailable)?;

        markers.sort_by_key(|m| m.at);
        markers.retain(|m| {
            let inside = m.at >= self.start && m.at <= self.end;
            if !inside {
                log::warn!("Discarding {} marker at {} outside the window", m.kind, m.at);
            }
            inside
        });

        Ok(pair_markers(&markers))
    }

    /// Find, sample and render every complete pass in the window.
    ///
    /// A marker search failure or a broken invariant aborts the run. A pass
    /// whose geometry cannot be sampled is skipped and counted as abandoned.
    pub fn process(
        &mut self,
        ephemeris: &dyn Ephemeris,
        renderer: &dyn Renderer,
        settings: &PipelineSettings,
    ) -> Result<ProcessSummary, EngineError> {
        let intervals = self.intervals(ephemeris, settings.horizon_deg)?;
        log::info!(
            "{}: {} complete passes between {} and {}",
            self.satellite.name,
            intervals.len(),
            self.start,
            self.end
        );

        let builder = PassBuilder::new(ephemeris, renderer, settings);
        let mut summary = ProcessSummary {
            intervals: intervals.len(),
            ..ProcessSummary::default()
        };
        self.passes.clear();

        for interval in intervals {
            match builder.build(&self.satellite, &self.location, &self.tz, interval) {
                Ok(built) if built.visible => {
                    self.passes.push(built.pass);
                    summary.kept += 1;
                }
                Ok(built) => {
                    log::debug!(
                        "Pass at {} peaks at {:.2}°, not above {}°",
                        interval.aos,
                        built.pass.max_elevation_deg(),
                        settings.min_elevation_deg
                    );
                    summary.below_threshold += 1;
                }
                Err(EngineError::GeometryUnavailable { at, source }) => {
                    log::warn!(
                        "Abandoning pass {} to {}: no position at {}: {}",
                        interval.aos,
                        interval.los,
                        at,
                        source
                    );
                    summary.abandoned += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }
}
