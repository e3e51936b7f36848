//! Collision resolution
//!
//! - `tier`: relative-speed classification and base damage
//! - `resolver`: body-vs-enemy impacts with per-pair cooldowns
//! - `obstacle`: body-vs-static-circle penetration and bounce

pub mod obstacle;
pub mod resolver;
pub mod tier;

pub use obstacle::{resolve_obstacle, Obstacle, ObstacleContact};
pub use resolver::{CollisionResolver, ImpactBody, ImpactOutcome, TargetKey};
pub use tier::{base_damage, ImpactTier};
