mod sample;
mod sampler;
mod waypoints;

pub use sample::{TrackSample, Waypoint};
pub use sampler::{sample_track, DEFAULT_SAMPLE_COUNT};
pub use waypoints::{max_elevation, select_waypoints};
