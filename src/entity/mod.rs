//! Entity records
//!
//! Pooled records (`Enemy`, `Particle`, `Decal`, `LootItem`) are complete
//! values handed to `ObjectPool::acquire`. The player and vehicles are
//! long-lived and stored directly on the world.

pub mod death;
pub mod decal;
pub mod enemy;
pub mod loot;
pub mod particle;
pub mod player;
pub mod vehicle;

pub use death::{DeathRecord, DeathState, FinalizeFlags};
pub use decal::Decal;
pub use enemy::{DamageOutcome, Enemy, EnemyKind, EnemyType};
pub use loot::{LootItem, LootKind};
pub use particle::Particle;
pub use player::{Player, TriggerResult, WeaponState};
pub use vehicle::{Suspension, Vehicle};
