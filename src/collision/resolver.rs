//! Body-vs-enemy impact resolution
//!
//! A ram is classified by squared relative speed into push, knockback or
//! splatter. Sustained contact between the same body and target only
//! resolves once per cooldown window.

use ahash::AHashMap;
use glam::{Vec2, Vec3};

use super::tier::{base_damage, ImpactTier};
use crate::core::config::SimulationConfig;
use crate::core::types::{deadline, ground, BodyId, Millis};
use crate::effects::{DecalMaterial, DecalSpec, EffectKind, FxBus, HitKind, ParticleBurst, SoundId};
use crate::entity::death::{DeathState, FinalizeFlags};
use crate::entity::enemy::Enemy;
use crate::pool::PoolHandle;

/// Moving body doing the ramming
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactBody {
    pub id: BodyId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub max_speed: f32,
    pub collision_damage_multiplier: f32,
    pub knockback_constant: f32,
}

/// Identity of a rammed target for cooldown bookkeeping.
///
/// Pool handles carry the slot generation, so a reused slot never inherits
/// the previous occupant's cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Enemy(PoolHandle),
    Boss,
    Crate(PoolHandle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactOutcome {
    /// Target already dying or dead
    NotAlive,
    /// Relative speed below the push tier
    TooSlow,
    /// Same pair resolved within the cooldown window
    CoolingDown,
    Applied {
        tier: ImpactTier,
        damage: f32,
        killed: bool,
    },
}

impl ImpactOutcome {
    pub fn tier(&self) -> Option<ImpactTier> {
        match self {
            ImpactOutcome::Applied { tier, .. } => Some(*tier),
            _ => None,
        }
    }

    pub fn damage(&self) -> f32 {
        match self {
            ImpactOutcome::Applied { damage, .. } => *damage,
            _ => 0.0,
        }
    }
}

/// Resolves rams and remembers recent hits per (body, target) pair
#[derive(Debug, Default)]
pub struct CollisionResolver {
    cooldowns: AHashMap<(BodyId, TargetKey), Millis>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cooldowns: AHashMap::with_capacity(capacity),
        }
    }

    /// Resolve `body` ramming `target`.
    pub fn resolve_impact(
        &mut self,
        body: &ImpactBody,
        key: TargetKey,
        target: &mut Enemy,
        now: Millis,
        config: &SimulationConfig,
        fx: &mut FxBus<'_>,
    ) -> ImpactOutcome {
        if !target.is_alive() {
            return ImpactOutcome::NotAlive;
        }

        let tuning = &config.collision;
        let relative = ground(body.velocity) - ground(target.velocity);
        let speed_sq = relative.length_squared();
        let Some(tier) = ImpactTier::classify(speed_sq, tuning) else {
            return ImpactOutcome::TooSlow;
        };

        if !self.engage(body.id, key, now, tuning.cooldown_ms) {
            return ImpactOutcome::CoolingDown;
        }

        let speed = speed_sq.sqrt();
        let base = base_damage(speed, body.mass, body.collision_damage_multiplier, tuning.damage_constant);
        let direction = contact_direction(body, target, relative);

        let outcome = match tier {
            ImpactTier::Push => {
                let result = target.apply_impact_damage(base * tuning.push_damage_fraction, DeathState::Shot, now, &config.death);
                target.slowed_until = deadline(now, tuning.slow_ms);
                fx.sound(SoundId::VehicleBump);
                fx.hit(HitKind::Push, target.position, 0.0);
                ImpactOutcome::Applied {
                    tier,
                    damage: result.dealt,
                    killed: result.killed,
                }
            }
            ImpactTier::Knockback => {
                let result = target.apply_impact_damage(base, DeathState::Shot, now, &config.death);
                let strength = if body.max_speed > 0.0 {
                    body.knockback_constant * (speed / body.max_speed)
                } else {
                    body.knockback_constant
                };
                let impulse = Vec3::new(direction.x, 0.0, direction.y) * strength + Vec3::Y * strength * tuning.knockback_lift;
                target.velocity += impulse;

                fx.burst(
                    ParticleBurst::new(EffectKind::Blood, target.position + Vec3::Y * 0.5, 12)
                        .with_velocity(impulse * 0.5),
                );
                fx.sound(SoundId::ImpactFlesh);
                fx.hit(HitKind::Knockback, target.position, tuning.knockback_shake);
                ImpactOutcome::Applied {
                    tier,
                    damage: result.dealt,
                    killed: result.killed,
                }
            }
            ImpactTier::Splatter => {
                let hp_before = target.hp;
                target.force_kill(DeathState::Exploded, now, &config.death);
                splatter_effects(target, direction, speed, fx);
                fx.sound(SoundId::Splatter);
                fx.hit(HitKind::Splatter, target.position, tuning.splatter_shake);
                ImpactOutcome::Applied {
                    tier,
                    damage: hp_before,
                    killed: true,
                }
            }
        };

        tracing::trace!(body = body.id.0, ?key, ?tier, speed_sq, "impact resolved");
        outcome
    }

    /// Record a contact between `body` and `key` unless the pair is still
    /// inside its cooldown window.
    pub fn engage(&mut self, body: BodyId, key: TargetKey, now: Millis, cooldown_ms: u64) -> bool {
        if let Some(&last) = self.cooldowns.get(&(body, key)) {
            if now.saturating_sub(last) < cooldown_ms {
                return false;
            }
        }
        self.cooldowns.insert((body, key), now);
        true
    }

    /// Forget pairs whose cooldown has lapsed.
    pub fn prune(&mut self, now: Millis, cooldown_ms: u64) {
        self.cooldowns.retain(|_, last| now.saturating_sub(*last) < cooldown_ms);
    }

    pub fn tracked_pairs(&self) -> usize {
        self.cooldowns.len()
    }

    pub fn clear(&mut self) {
        self.cooldowns.clear();
    }
}

/// Ground-plane direction from body to target.
fn contact_direction(body: &ImpactBody, target: &Enemy, relative: Vec2) -> Vec2 {
    let offset = ground(target.position) - ground(body.position);
    if offset.length_squared() > 1e-6 {
        offset.normalize()
    } else if relative.length_squared() > 1e-6 {
        relative.normalize()
    } else {
        Vec2::X
    }
}

/// Debris and decal for an explosive death, fired at most once per occupant.
pub(crate) fn splatter_effects(target: &mut Enemy, direction: Vec2, speed: f32, fx: &mut FxBus<'_>) {
    let fired = &mut target.death.fired;
    if FinalizeFlags::fire_once(&mut fired.debris) {
        let fling = Vec3::new(direction.x, 0.6, direction.y) * speed * 0.5;
        fx.burst(ParticleBurst::new(EffectKind::Gore, target.position + Vec3::Y * 0.5, 24).with_velocity(fling));
        fx.burst(ParticleBurst::new(EffectKind::Debris, target.position, 8).with_velocity(fling * 0.5));
    }
    if FinalizeFlags::fire_once(&mut fired.decal) {
        fx.decal(DecalSpec {
            position: ground(target.position) + direction * target.radius,
            rotation: direction.x.atan2(direction.y),
            scale: target.scale * 2.0,
            material: DecalMaterial::Blood,
        });
    }
}
