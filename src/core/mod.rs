pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::SimClock;
pub use config::SimulationConfig;
pub use error::{Result, WreckError};
pub use types::{ground, BodyId, Millis};
