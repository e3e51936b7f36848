//! Static content tables (per-type stats) read as opaque lookups
//!
//! Tables are authored in TOML and keyed by type identifier. A miss is
//! logged and treated as "nothing to do" by the caller.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;

use crate::core::error::{Result, WreckError};

const BUILTIN_CONTENT: &str = include_str!("../../data/content.toml");

/// Stats for one enemy type
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyStats {
    pub hp: f32,
    pub speed: f32,
    pub mass: f32,
    pub radius: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Damage per contact attack on the player
    pub contact_damage: f32,
    pub attack_cooldown_ms: u64,
    pub xp_reward: u32,
    /// Fraction of incoming damage ignored (0..1)
    #[serde(default)]
    pub armor: f32,
    /// Chance of dropping loot on death
    #[serde(default)]
    pub loot_chance: f32,
    /// Overrides the configured grace period for this type
    #[serde(default)]
    pub death_grace_ms: Option<u64>,
    /// Runner lunge: speed multiplier, duration and interval
    #[serde(default)]
    pub lunge: Option<LungeStats>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LungeStats {
    pub multiplier: f32,
    pub duration_ms: u64,
    pub interval_ms: u64,
}

/// Stats for one vehicle type
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleStats {
    pub max_speed: f32,
    pub acceleration: f32,
    /// Radians per second at full steer
    pub turn_rate: f32,
    pub mass: f32,
    pub radius: f32,
    pub collision_damage_multiplier: f32,
    pub knockback_constant: f32,
    #[serde(default = "default_stiffness")]
    pub suspension_stiffness: f32,
    #[serde(default = "default_damping")]
    pub suspension_damping: f32,
}

/// Damage element of a weapon; decides how a victim dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageElement {
    Kinetic,
    Fire,
    Shock,
    Plasma,
}

/// Stats for one weapon type
#[derive(Debug, Clone, Deserialize)]
pub struct WeaponStats {
    pub damage: f32,
    pub range: f32,
    pub fire_interval_ms: u64,
    pub magazine: u32,
    pub reload_ms: u64,
    pub element: DamageElement,
}

fn default_scale() -> f32 {
    1.0
}

fn default_stiffness() -> f32 {
    60.0
}

fn default_damping() -> f32 {
    8.0
}

/// All content tables, keyed by type identifier
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentTables {
    pub enemies: AHashMap<String, EnemyStats>,
    pub vehicles: AHashMap<String, VehicleStats>,
    pub weapons: AHashMap<String, WeaponStats>,
}

impl ContentTables {
    /// Tables shipped with the crate (`data/content.toml`).
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONTENT)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let tables: ContentTables = toml::from_str(content)?;
        Ok(tables)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded content from {}: {} enemies, {} vehicles, {} weapons",
            path.display(),
            tables.enemies.len(),
            tables.vehicles.len(),
            tables.weapons.len()
        );
        Ok(tables)
    }

    pub fn enemy(&self, key: &str) -> Option<&EnemyStats> {
        let stats = self.enemies.get(key);
        if stats.is_none() {
            tracing::warn!("Unknown enemy type '{}', skipping", key);
        }
        stats
    }

    pub fn vehicle(&self, key: &str) -> Option<&VehicleStats> {
        let stats = self.vehicles.get(key);
        if stats.is_none() {
            tracing::warn!("Unknown vehicle type '{}', skipping", key);
        }
        stats
    }

    pub fn weapon(&self, key: &str) -> Option<&WeaponStats> {
        let stats = self.weapons.get(key);
        if stats.is_none() {
            tracing::warn!("Unknown weapon type '{}', skipping", key);
        }
        stats
    }

    /// Lookup for setup code, where a missing entry is an error.
    pub fn require_vehicle(&self, key: &str) -> Result<&VehicleStats> {
        self.vehicles.get(key).ok_or_else(|| WreckError::UnknownContent {
            table: "vehicle",
            key: key.to_string(),
        })
    }

    /// Largest collision radius across enemy types.
    pub fn max_enemy_radius(&self) -> f32 {
        self.enemies.values().map(|s| s.radius).fold(0.0, f32::max)
    }
}
