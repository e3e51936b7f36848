//! Pooled ground decals

use glam::Vec2;

use crate::core::types::{from_ground, Millis};
use crate::effects::DecalMaterial;
use crate::pool::{InstanceTransform, Pooled};

/// Height above the ground plane to avoid z-fighting
const DECAL_LIFT: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decal {
    pub material: DecalMaterial,
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub expires_at: Millis,
}

impl Decal {
    pub fn is_expired(&self, now: Millis) -> bool {
        now >= self.expires_at
    }
}

impl Pooled for Decal {
    fn instance_transform(&self) -> InstanceTransform {
        InstanceTransform::new(from_ground(self.position, DECAL_LIFT), self.rotation, self.scale)
    }
}
