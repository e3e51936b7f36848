//! Core type definitions used throughout the codebase

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Simulation timestamp in milliseconds since session start.
///
/// Every delayed effect (reload, death grace, hit cooldown, magnet delay)
/// is stored as an absolute deadline of this type.
pub type Millis = u64;

/// Identifier of a body that can ram other entities (vehicles, boss).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Project a world position onto the ground plane (x, z).
#[inline]
pub fn ground(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Lift a ground-plane point back into world space at height `y`.
#[inline]
pub fn from_ground(p: Vec2, y: f32) -> Vec3 {
    Vec3::new(p.x, y, p.y)
}

/// Convert a duration in milliseconds to a deadline relative to `now`.
#[inline]
pub fn deadline(now: Millis, after_ms: u64) -> Millis {
    now.saturating_add(after_ms)
}

/// Yaw angle (radians) facing along a ground-plane direction.
#[inline]
pub fn yaw_of(dir: Vec2) -> f32 {
    dir.x.atan2(dir.y)
}
