mod aggregator;
mod builder;
mod error;
mod model;
mod pairing;
mod settings;

pub use error::EngineError;
pub use model::{Event, Location, Pass, SatelliteRef};
pub use settings::PipelineSettings;
