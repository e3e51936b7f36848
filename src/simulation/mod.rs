//! Frame-driven simulation: session state, scheduler and systems

pub mod scheduler;
pub mod session;
pub mod systems;

pub use scheduler::{Scheduler, System, SystemId};
pub use session::{Session, SessionReport, SessionStats, SpawnRequest, WorldState};
pub use systems::install_default_systems;
