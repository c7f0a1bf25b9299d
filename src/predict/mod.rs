mod error;
mod event_finder;
mod ground_station;
mod propagation;
mod provider;
mod tle_loader;
mod types;

pub use error::PredictError;
pub use ground_station::GroundStation;
pub use provider::{Ephemeris, Sgp4Ephemeris};
pub use tle_loader::TleLoader;
pub use types::{AltAz, Marker, MarkerKind};
