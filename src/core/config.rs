//! Simulation configuration with documented constants
//!
//! Every tunable number the engine reads lives here. Nothing in the systems
//! hard-codes a threshold: the impact tiers, damage coefficients and grace
//! periods are playtesting decisions and are loaded as data.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::{Result, WreckError};

/// Configuration for the simulation systems
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub pools: PoolConfig,
    pub budgets: BudgetConfig,
    pub collision: CollisionTuning,
    pub death: DeathTuning,
    pub loot: LootTuning,
    pub waves: WaveConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub fx: FxTuning,
    pub frame: FrameConfig,
}

// === SPATIAL SYSTEM ===

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Size of each bucket in the spatial grid (world units)
    ///
    /// Roughly 2-4x the largest collision radius keeps a ram query inside
    /// a 3x3 neighbourhood.
    pub cell_size: f32,

    /// Largest enemy collision radius; widens broad-phase queries so no
    /// contact is missed at bucket borders.
    pub max_enemy_radius: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            max_enemy_radius: 1.5,
        }
    }
}

// === POOLS ===

/// Fixed capacities of every pool. Pools never grow past these.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub enemies: usize,
    pub particles: usize,
    pub decals: usize,
    pub loot: usize,
    pub fx_requests: usize,
    pub spawn_requests: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            enemies: 512,
            particles: 2048,
            decals: 256,
            loot: 256,
            fx_requests: 256,
            spawn_requests: 128,
        }
    }
}

/// Per-frame drain budgets for the request queues.
///
/// Requests over budget wait for the next frame instead of spiking this one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub fx_per_frame: usize,
    pub spawns_per_frame: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            fx_per_frame: 30,
            spawns_per_frame: 8,
        }
    }
}

// === COLLISION ===

/// Impact classification and response coefficients.
///
/// Tiers compare the squared relative speed, so the defaults correspond to
/// speeds of 2, 6 and 12 units per second.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// v² above which a contact counts as a push
    pub push_speed_sq: f32,
    /// v² above which a contact knocks the target back
    pub knockback_speed_sq: f32,
    /// v² above which the target is splattered outright
    pub splatter_speed_sq: f32,

    /// Share of base damage dealt by a push
    pub push_damage_fraction: f32,
    /// `k` in `speed * mass * collision_damage_multiplier * k`
    pub damage_constant: f32,

    /// Slow debuff applied by a push
    pub slow_ms: u64,
    /// Speed multiplier while slowed
    pub slow_factor: f32,

    /// Vertical lift as a fraction of the knockback impulse
    pub knockback_lift: f32,

    /// Sustained-contact window per (body, target) pair
    pub cooldown_ms: u64,

    /// Fraction of the penetration depth corrected per obstacle contact
    pub obstacle_damping: f32,
    /// Share of inbound normal speed kept after bouncing off an obstacle
    pub obstacle_restitution: f32,
    /// Suspension kick per unit of inbound normal speed
    pub suspension_kick: f32,

    /// Vehicle speed kept after a knockback-tier ram
    pub knockback_speed_retention: f32,
    /// Vehicle speed kept after a splatter-tier ram
    pub splatter_speed_retention: f32,

    /// Camera shake magnitudes reported to the hit feedback boundary
    pub knockback_shake: f32,
    pub splatter_shake: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            push_speed_sq: 4.0,
            knockback_speed_sq: 36.0,
            splatter_speed_sq: 144.0,
            push_damage_fraction: 0.3,
            damage_constant: 0.5,
            slow_ms: 400,
            slow_factor: 0.5,
            knockback_lift: 0.4,
            cooldown_ms: 350,
            obstacle_damping: 0.8,
            obstacle_restitution: 0.4,
            suspension_kick: 0.15,
            knockback_speed_retention: 0.85,
            splatter_speed_retention: 0.95,
            knockback_shake: 0.2,
            splatter_shake: 0.6,
        }
    }
}

// === DEATH ===

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeathTuning {
    /// Grace period before a corpse is finalized and recycled
    pub standard_grace_ms: u64,
    /// Grace period for deaths that leave nothing to look at (explosions)
    pub lean_grace_ms: u64,
}

impl Default for DeathTuning {
    fn default() -> Self {
        Self {
            standard_grace_ms: 2000,
            lean_grace_ms: 500,
        }
    }
}

// === LOOT ===

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LootTuning {
    /// Drops ignore the player for this long after spawning
    pub magnet_delay_ms: u64,
    pub magnet_radius: f32,
    pub magnet_speed: f32,
    pub pickup_radius: f32,
    pub lifetime_ms: u64,
    /// Upward speed of a fresh drop
    pub pop_speed: f32,
    /// XP granted per gem before the enemy's own multiplier
    pub xp_per_gem: u32,
    pub coins_per_drop: u32,
    pub health_per_drop: f32,
    pub crate_hp: f32,
}

impl Default for LootTuning {
    fn default() -> Self {
        Self {
            magnet_delay_ms: 600,
            magnet_radius: 6.0,
            magnet_speed: 14.0,
            pickup_radius: 1.0,
            lifetime_ms: 30_000,
            pop_speed: 4.0,
            xp_per_gem: 1,
            coins_per_drop: 5,
            health_per_drop: 15.0,
            crate_hp: 30.0,
        }
    }
}

// === WAVES ===

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Time between waves; 0 disables the wave director
    pub interval_ms: u64,
    pub size: usize,
    /// Distance from the player at which a wave appears
    pub radius: f32,
    /// Enemy type identifiers drawn uniformly for each spawn
    pub kinds: Vec<String>,
    /// Spawn the boss once the clock passes this time
    pub boss_at_ms: Option<u64>,
    pub seed: u64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            interval_ms: 4000,
            size: 6,
            radius: 30.0,
            kinds: vec!["walker".into(), "runner".into(), "tank".into()],
            boss_at_ms: None,
            seed: 0x5EED,
        }
    }
}

// === PHYSICS ===

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// How quickly enemies blend their velocity back toward steering
    pub steering_rate: f32,
    /// Velocity decay for dying bodies
    pub dying_drag: f32,
    /// Velocity decay for unpowered vehicles
    pub vehicle_friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            steering_rate: 6.0,
            dying_drag: 4.0,
            vehicle_friction: 1.5,
        }
    }
}

// === PLAYER ===

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub hp: f32,
    pub radius: f32,
    /// Distance within which `interact` enters a vehicle
    pub enter_radius: f32,
    pub weapon: String,
    /// Cosine of the half-angle of the auto-aim cone
    pub aim_cone_cos: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            hp: 100.0,
            radius: 0.5,
            enter_radius: 3.0,
            weapon: "rifle".into(),
            aim_cone_cos: 0.8,
        }
    }
}

// === FX ===

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FxTuning {
    pub particle_ttl_ms: u64,
    pub decal_ttl_ms: u64,
    /// Random spread added to particle burst velocities
    pub particle_spread: f32,
}

impl Default for FxTuning {
    fn default() -> Self {
        Self {
            particle_ttl_ms: 900,
            decal_ttl_ms: 20_000,
            particle_spread: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Longest frame delta the clock accepts (seconds)
    pub max_frame_dt: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_frame_dt: 0.1 }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let c = &self.collision;
        if !(c.push_speed_sq >= 0.0
            && c.push_speed_sq < c.knockback_speed_sq
            && c.knockback_speed_sq < c.splatter_speed_sq)
        {
            return Err(WreckError::InvalidConfig(format!(
                "impact tiers must be ordered push < knockback < splatter (got {} / {} / {})",
                c.push_speed_sq, c.knockback_speed_sq, c.splatter_speed_sq
            )));
        }

        if !(0.0..=1.0).contains(&c.push_damage_fraction) {
            return Err(WreckError::InvalidConfig(format!(
                "push_damage_fraction ({}) must be within 0..=1",
                c.push_damage_fraction
            )));
        }

        if !(0.0..=1.0).contains(&c.obstacle_damping) || !(0.0..=1.0).contains(&c.obstacle_restitution) {
            return Err(WreckError::InvalidConfig(
                "obstacle_damping and obstacle_restitution must be within 0..=1".into(),
            ));
        }

        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            return Err(WreckError::InvalidConfig(format!(
                "grid.cell_size ({}) must be positive",
                self.grid.cell_size
            )));
        }

        let p = &self.pools;
        if p.enemies == 0 || p.fx_requests == 0 || p.spawn_requests == 0 {
            return Err(WreckError::InvalidConfig(
                "pool capacities for enemies and request queues must be non-zero".into(),
            ));
        }
        let capacities = [
            ("enemies", p.enemies),
            ("particles", p.particles),
            ("decals", p.decals),
            ("loot", p.loot),
            ("fx_requests", p.fx_requests),
            ("spawn_requests", p.spawn_requests),
        ];
        for (name, capacity) in capacities {
            if capacity > u32::MAX as usize {
                return Err(WreckError::InvalidConfig(format!(
                    "pools.{} ({}) exceeds u32 index range",
                    name, capacity
                )));
            }
        }

        if self.budgets.fx_per_frame == 0 {
            return Err(WreckError::InvalidConfig("budgets.fx_per_frame must be non-zero".into()));
        }

        if !(self.frame.max_frame_dt.is_finite() && self.frame.max_frame_dt > 0.0) {
            return Err(WreckError::InvalidConfig("frame.max_frame_dt must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reference_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.collision.push_speed_sq, 4.0);
        assert_eq!(config.collision.knockback_speed_sq, 36.0);
        assert_eq!(config.collision.splatter_speed_sq, 144.0);
        assert_eq!(config.collision.cooldown_ms, 350);
        assert_eq!(config.death.standard_grace_ms, 2000);
        assert_eq!(config.death.lean_grace_ms, 500);
        assert_eq!(config.budgets.fx_per_frame, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
[grid]
cell_size = 4.0

[collision]
cooldown_ms = 500
"#,
        )
        .unwrap();
        assert_eq!(config.grid.cell_size, 4.0);
        assert_eq!(config.collision.cooldown_ms, 500);
        assert_eq!(config.collision.splatter_speed_sq, 144.0);
        assert_eq!(config.pools.enemies, 512);
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let result = SimulationConfig::from_toml_str(
            r#"
[collision]
knockback_speed_sq = 200.0
"#,
        );
        assert!(matches!(result, Err(WreckError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let mut config = SimulationConfig::default();
        config.grid.cell_size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_pools_rejected() {
        let mut config = SimulationConfig::default();
        config.pools.decals = usize::MAX;
        assert!(matches!(config.validate(), Err(WreckError::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.pools.spawn_requests = usize::MAX;
        assert!(matches!(config.validate(), Err(WreckError::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.pools.loot = usize::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = SimulationConfig::from_toml_str("[grid\ncell_size = ");
        assert!(matches!(result, Err(WreckError::TomlError(_))));
    }
}
