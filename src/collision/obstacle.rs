//! Static obstacle contacts
//!
//! Obstacles are circles on the ground plane. A body overlapping one is
//! pushed out along the contact normal, its inbound normal velocity is
//! reflected with restitution, and the caller receives a shake impulse for
//! the suspension.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::config::CollisionTuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
        }
    }
}

/// Details of a resolved obstacle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleContact {
    /// Unit normal pointing from the obstacle toward the body
    pub normal: Vec2,
    pub penetration: f32,
    /// Speed along `-normal` before the bounce (0 when separating)
    pub inbound_speed: f32,
    pub shake_impulse: f32,
}

/// Push `position` out of `obstacle` and bounce `velocity` off it.
///
/// Returns `None` when the circles do not overlap.
pub fn resolve_obstacle(
    position: &mut Vec2,
    velocity: &mut Vec2,
    radius: f32,
    obstacle: &Obstacle,
    tuning: &CollisionTuning,
) -> Option<ObstacleContact> {
    let offset = *position - obstacle.position;
    let distance = offset.length();
    let penetration = radius + obstacle.radius - distance;
    if !(penetration > 0.0) {
        return None;
    }

    // Coincident centres have no defined normal; fall back to the reverse of
    // travel, or +x when stationary.
    let normal = if distance > 1e-5 {
        offset / distance
    } else if velocity.length_squared() > 1e-8 {
        -velocity.normalize()
    } else {
        Vec2::X
    };

    *position += normal * penetration * tuning.obstacle_damping;

    let normal_speed = velocity.dot(normal);
    let inbound_speed = (-normal_speed).max(0.0);
    if normal_speed < 0.0 {
        *velocity -= normal * normal_speed * (1.0 + tuning.obstacle_restitution);
    }

    Some(ObstacleContact {
        normal,
        penetration,
        inbound_speed,
        shake_impulse: inbound_speed * tuning.suspension_kick,
    })
}
