//! Pooled enemy records

use glam::Vec3;

use super::death::{DeathRecord, DeathState};
use crate::content::EnemyStats;
use crate::core::config::DeathTuning;
use crate::core::types::{deadline, Millis};
use crate::pool::{InstanceTransform, Pooled};

/// Enemy type identifier used by spawn requests and content lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyType {
    Walker,
    Runner,
    Tank,
    Boss,
}

impl EnemyType {
    pub const ALL: [EnemyType; 4] = [EnemyType::Walker, EnemyType::Runner, EnemyType::Tank, EnemyType::Boss];

    pub fn key(&self) -> &'static str {
        match self {
            EnemyType::Walker => "walker",
            EnemyType::Runner => "runner",
            EnemyType::Tank => "tank",
            EnemyType::Boss => "boss",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

/// Per-type state carried by a slot's current occupant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyKind {
    Walker,
    Runner {
        next_lunge_at: Millis,
        lunge_until: Millis,
    },
    Tank,
    Boss {
        phase: u8,
    },
}

impl EnemyKind {
    fn fresh(ty: EnemyType, stats: &EnemyStats, now: Millis) -> Self {
        match ty {
            EnemyType::Walker => EnemyKind::Walker,
            EnemyType::Runner => EnemyKind::Runner {
                next_lunge_at: deadline(now, stats.lunge.map(|l| l.interval_ms).unwrap_or(u64::MAX)),
                lunge_until: 0,
            },
            EnemyType::Tank => EnemyKind::Tank,
            EnemyType::Boss => EnemyKind::Boss { phase: 0 },
        }
    }

    pub fn ty(&self) -> EnemyType {
        match self {
            EnemyKind::Walker => EnemyType::Walker,
            EnemyKind::Runner { .. } => EnemyType::Runner,
            EnemyKind::Tank => EnemyType::Tank,
            EnemyKind::Boss { .. } => EnemyType::Boss,
        }
    }
}

/// Result of one damage application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub dealt: f32,
    pub killed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub scale: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub mass: f32,
    pub radius: f32,
    pub armor: f32,
    pub contact_damage: f32,
    pub attack_cooldown_ms: u64,
    pub next_attack_at: Millis,
    pub xp_reward: u32,
    pub loot_chance: f32,
    /// Lunge multiplier/duration/interval copied from stats (runners)
    pub lunge: Option<(f32, u64, u64)>,
    pub slowed_until: Millis,
    pub grace_override_ms: Option<u64>,
    pub death: DeathRecord,
    pub spawned_at: Millis,
}

impl Enemy {
    /// Build a complete record for a new occupant. Every field is set here.
    pub fn spawn(ty: EnemyType, stats: &EnemyStats, position: Vec3, now: Millis) -> Self {
        Self {
            kind: EnemyKind::fresh(ty, stats, now),
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            scale: stats.scale,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed,
            mass: stats.mass,
            radius: stats.radius,
            armor: stats.armor.clamp(0.0, 0.95),
            contact_damage: stats.contact_damage,
            attack_cooldown_ms: stats.attack_cooldown_ms,
            next_attack_at: now,
            xp_reward: stats.xp_reward,
            loot_chance: stats.loot_chance.clamp(0.0, 1.0),
            lunge: stats.lunge.map(|l| (l.multiplier, l.duration_ms, l.interval_ms)),
            slowed_until: 0,
            grace_override_ms: stats.death_grace_ms,
            death: DeathRecord::default(),
            spawned_at: now,
        }
    }

    pub fn ty(&self) -> EnemyType {
        self.kind.ty()
    }

    pub fn is_alive(&self) -> bool {
        self.death.state.is_alive()
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }

    pub fn is_slowed(&self, now: Millis) -> bool {
        now < self.slowed_until
    }

    /// Grace period for a death into `state`.
    pub fn grace_for(&self, state: DeathState, tuning: &DeathTuning) -> u64 {
        match (state, self.grace_override_ms) {
            (DeathState::Exploded, _) => tuning.lean_grace_ms,
            (_, Some(ms)) => ms,
            (_, None) => state.grace_ms(tuning),
        }
    }

    /// Apply armored damage; a lethal hit moves the enemy into `kill_state`.
    pub fn apply_damage(
        &mut self,
        amount: f32,
        kill_state: DeathState,
        now: Millis,
        tuning: &DeathTuning,
    ) -> DamageOutcome {
        self.take_damage(amount * (1.0 - self.armor), kill_state, now, tuning)
    }

    /// Apply ram damage as-is; impact tiers are scaled by base damage alone.
    pub fn apply_impact_damage(
        &mut self,
        amount: f32,
        kill_state: DeathState,
        now: Millis,
        tuning: &DeathTuning,
    ) -> DamageOutcome {
        self.take_damage(amount, kill_state, now, tuning)
    }

    fn take_damage(&mut self, amount: f32, kill_state: DeathState, now: Millis, tuning: &DeathTuning) -> DamageOutcome {
        if !self.is_alive() || !(amount > 0.0) {
            return DamageOutcome { dealt: 0.0, killed: false };
        }
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        let killed = self.hp <= 0.0;
        if killed {
            self.hp = 0.0;
            let grace = self.grace_for(kill_state, tuning);
            self.death.begin(kill_state, now, grace);
        }
        self.update_boss_phase();
        DamageOutcome { dealt, killed }
    }

    /// Kill outright regardless of armor or remaining hp.
    pub fn force_kill(&mut self, state: DeathState, now: Millis, tuning: &DeathTuning) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = 0.0;
        let grace = self.grace_for(state, tuning);
        self.death.begin(state, now, grace)
    }

    fn update_boss_phase(&mut self) {
        if let EnemyKind::Boss { phase } = &mut self.kind {
            let ratio = if self.max_hp > 0.0 { self.hp / self.max_hp } else { 0.0 };
            let next = if ratio < 0.33 {
                2
            } else if ratio < 0.66 {
                1
            } else {
                0
            };
            *phase = (*phase).max(next);
        }
    }

    /// Movement speed this frame, including slow debuff, lunges and boss rage.
    pub fn current_speed(&self, now: Millis, slow_factor: f32) -> f32 {
        let mut speed = self.speed;
        match self.kind {
            EnemyKind::Runner { lunge_until, .. } if now < lunge_until => {
                speed *= self.lunge.map(|(m, _, _)| m).unwrap_or(1.0);
            }
            EnemyKind::Boss { phase } => speed *= 1.0 + 0.25 * phase as f32,
            _ => {}
        }
        if self.is_slowed(now) {
            speed *= slow_factor;
        }
        speed
    }

    /// Advance runner lunge deadlines.
    pub fn tick_lunge(&mut self, now: Millis) {
        let Some((_, duration, interval)) = self.lunge else { return };
        if let EnemyKind::Runner { next_lunge_at, lunge_until } = &mut self.kind {
            if now >= *next_lunge_at {
                *lunge_until = deadline(now, duration);
                *next_lunge_at = deadline(now, interval);
            }
        }
    }
}

impl Pooled for Enemy {
    fn instance_transform(&self) -> InstanceTransform {
        InstanceTransform::new(self.position, self.yaw, self.scale)
    }
}
