//! Pooled loot drops and destructible crates

use glam::Vec3;

use crate::core::config::LootTuning;
use crate::core::types::{deadline, Millis};
use crate::pool::{InstanceTransform, Pooled};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LootKind {
    XpGem { value: u32 },
    Coin { value: u32 },
    Health { amount: f32 },
    /// Breakable container; never magnetized or picked up
    Crate { hp: f32 },
}

impl LootKind {
    pub fn is_crate(&self) -> bool {
        matches!(self, LootKind::Crate { .. })
    }

    fn scale(&self) -> f32 {
        match self {
            LootKind::XpGem { .. } => 0.4,
            LootKind::Coin { .. } => 0.35,
            LootKind::Health { .. } => 0.5,
            LootKind::Crate { .. } => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootItem {
    pub kind: LootKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub spin: f32,
    /// Magnetism is ignored before this deadline
    pub magnet_at: Millis,
    /// `None` for crates, which persist until broken
    pub expires_at: Option<Millis>,
}

impl LootItem {
    /// A drop popping up from `position`.
    pub fn drop_at(kind: LootKind, position: Vec3, pop: Vec3, now: Millis, tuning: &LootTuning) -> Self {
        Self {
            kind,
            position,
            velocity: pop,
            spin: 0.0,
            magnet_at: deadline(now, tuning.magnet_delay_ms),
            expires_at: Some(deadline(now, tuning.lifetime_ms)),
        }
    }

    pub fn crate_at(position: Vec3, hp: f32) -> Self {
        Self {
            kind: LootKind::Crate { hp },
            position,
            velocity: Vec3::ZERO,
            spin: 0.0,
            magnet_at: Millis::MAX,
            expires_at: None,
        }
    }

    pub fn can_magnetize(&self, now: Millis) -> bool {
        !self.kind.is_crate() && now >= self.magnet_at
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        self.expires_at.map(|t| now >= t).unwrap_or(false)
    }

    /// Damage a crate; returns true when it breaks. No effect on drops.
    pub fn damage_crate(&mut self, amount: f32) -> bool {
        match &mut self.kind {
            LootKind::Crate { hp } if *hp > 0.0 => {
                *hp -= amount.max(0.0);
                *hp <= 0.0
            }
            _ => false,
        }
    }
}

impl Pooled for LootItem {
    fn instance_transform(&self) -> InstanceTransform {
        InstanceTransform::new(self.position, self.spin, self.kind.scale())
    }
}
