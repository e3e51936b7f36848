//! Pooled particles spawned from fx bursts

use glam::Vec3;

use crate::core::types::Millis;
use crate::effects::EffectKind;
use crate::pool::{InstanceTransform, Pooled};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub kind: EffectKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: f32,
    pub scale: f32,
    pub color: [f32; 4],
    pub expires_at: Millis,
}

impl Particle {
    pub fn is_expired(&self, now: Millis) -> bool {
        now >= self.expires_at
    }

    /// Ballistic step. Weighted particles fall and come to rest on the
    /// ground; the rest drift and rise slowly.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if self.kind.has_weight() {
            self.velocity.y -= gravity * dt;
        } else {
            self.velocity *= 1.0 - (2.0 * dt).min(1.0);
            self.velocity.y += 0.5 * dt;
        }
        self.position += self.velocity * dt;
        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity = Vec3::ZERO;
        }
        self.rotation += dt * 3.0;
    }
}

impl Pooled for Particle {
    fn instance_transform(&self) -> InstanceTransform {
        InstanceTransform::new(self.position, self.rotation, self.scale)
    }
}
