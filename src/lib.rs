//! Wreckage - zero-allocation entity simulation core for a top-down
//! vehicular action game
//!
//! Layers, leaves first: pooled storage, the spatial grid, collision
//! resolution, entity records with their death state machine, and the
//! frame scheduler driving systems over a session.

pub mod collision;
pub mod content;
pub mod core;
pub mod effects;
pub mod entity;
pub mod input;
pub mod pool;
pub mod simulation;
pub mod spatial;

pub use crate::core::{Millis, Result, SimulationConfig, WreckError};
pub use content::ContentTables;
pub use effects::{EffectSink, NullSink, RecordingSink};
pub use input::InputSnapshot;
pub use simulation::{install_default_systems, Scheduler, Session, System};
