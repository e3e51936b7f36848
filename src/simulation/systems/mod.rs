//! Built-in systems and the default registration order

pub mod collision;
pub mod combat;
pub mod enemy_movement;
pub mod fx;
pub mod lifecycle;
pub mod loot;
pub mod player;
pub mod spatial_index;
pub mod spawn;
pub mod transform_sync;

pub use collision::CollisionSystem;
pub use combat::CombatSystem;
pub use enemy_movement::EnemyMovementSystem;
pub use fx::FxSystem;
pub use lifecycle::{finalize, LifecycleSystem, Reward};
pub use loot::LootSystem;
pub use player::PlayerSystem;
pub use spatial_index::SpatialIndexSystem;
pub use spawn::SpawnSystem;
pub use transform_sync::TransformSyncSystem;

use super::scheduler::{Scheduler, SystemId};
use super::session::Session;

/// Register the standard frame:
/// spawn, player, enemy movement, spatial index, combat, collision,
/// lifecycle, loot, fx, transform sync.
pub fn install_default_systems(scheduler: &mut Scheduler, session: &mut Session) -> Vec<SystemId> {
    vec![
        scheduler.add_system(session, Box::new(SpawnSystem::new())),
        scheduler.add_system(session, Box::new(PlayerSystem::new())),
        scheduler.add_system(session, Box::new(EnemyMovementSystem::new())),
        scheduler.add_system(session, Box::new(SpatialIndexSystem::new())),
        scheduler.add_system(session, Box::new(CombatSystem::new())),
        scheduler.add_system(session, Box::new(CollisionSystem::new())),
        scheduler.add_system(session, Box::new(LifecycleSystem::new())),
        scheduler.add_system(session, Box::new(LootSystem::new())),
        scheduler.add_system(session, Box::new(FxSystem::new())),
        scheduler.add_system(session, Box::new(TransformSyncSystem::new())),
    ]
}
