//! Player avatar and weapon state

use glam::{Vec2, Vec3};

use crate::content::WeaponStats;
use crate::core::config::PlayerConfig;
use crate::core::types::{deadline, Millis};

/// Result of pulling the trigger this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    Fired,
    /// Fire interval not yet elapsed
    Cooling,
    Reloading,
    /// Magazine ran dry; a reload was started
    ReloadStarted,
}

/// Magazine and timing state of the equipped weapon
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponState {
    pub weapon: String,
    pub ammo: u32,
    pub next_shot_at: Millis,
    pub reload_done_at: Option<Millis>,
}

impl WeaponState {
    pub fn new(weapon: impl Into<String>, stats: Option<&WeaponStats>) -> Self {
        Self {
            weapon: weapon.into(),
            ammo: stats.map(|s| s.magazine).unwrap_or(0),
            next_shot_at: 0,
            reload_done_at: None,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_done_at.is_some()
    }

    /// Complete a pending reload once its deadline passes.
    pub fn tick(&mut self, now: Millis, stats: &WeaponStats) -> bool {
        match self.reload_done_at {
            Some(done) if now >= done => {
                self.ammo = stats.magazine;
                self.reload_done_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn trigger(&mut self, now: Millis, stats: &WeaponStats) -> TriggerResult {
        if self.is_reloading() {
            return TriggerResult::Reloading;
        }
        if self.ammo == 0 {
            self.reload_done_at = Some(deadline(now, stats.reload_ms));
            return TriggerResult::ReloadStarted;
        }
        if now < self.next_shot_at {
            return TriggerResult::Cooling;
        }
        self.ammo -= 1;
        self.next_shot_at = deadline(now, stats.fire_interval_ms);
        TriggerResult::Fired
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Last non-zero aim/move direction on the ground plane
    pub facing: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    pub speed: f32,
    pub xp: u32,
    pub coins: u32,
    /// Index into the session's vehicles while driving
    pub driving: Option<usize>,
    pub weapon: WeaponState,
}

impl Player {
    pub fn new(config: &PlayerConfig, weapon: Option<&WeaponStats>, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            facing: Vec2::Y,
            hp: config.hp,
            max_hp: config.hp,
            radius: config.radius,
            speed: config.speed,
            xp: 0,
            coins: 0,
            driving: None,
            weapon: WeaponState::new(config.weapon.clone(), weapon),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let dealt = amount.max(0.0).min(self.hp.max(0.0));
        self.hp -= dealt;
        dealt
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }

    /// Level derived from XP: each level costs ten more than the last.
    pub fn level(&self) -> u32 {
        let mut level = 1;
        let mut cost = 10;
        let mut xp = self.xp;
        while xp >= cost {
            xp -= cost;
            level += 1;
            cost += 10;
        }
        level
    }
}
