//! Death grace expiry, finalization and slot recycling

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::core::types::{ground, Millis};
use crate::effects::{DecalMaterial, DecalSpec, EffectKind, FxBus, ParticleBurst};
use crate::entity::{DeathState, Enemy, FinalizeFlags};
use crate::pool::PoolHandle;
use crate::simulation::scheduler::System;
use crate::simulation::session::Session;

use super::loot::scatter_drops;

/// What a finalized enemy hands out, returned once per occupant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reward {
    pub xp: u32,
    pub loot_chance: f32,
    pub position: Vec3,
    pub state: DeathState,
}

/// Fire the terminal side effects of a dying enemy and mark it Dead.
///
/// Every effect is guarded by its own flag, so calling this again on the
/// same occupant (or after a splatter already fired debris and decal)
/// emits nothing. Returns the reward the first time only. Alive enemies
/// are left untouched.
pub fn finalize(enemy: &mut Enemy, fx: &mut FxBus<'_>) -> Option<Reward> {
    let state = enemy.death.state;
    if state.is_alive() {
        return None;
    }
    let position = enemy.position;
    let spot = ground(position);
    let scale = enemy.scale;
    let fired = &mut enemy.death.fired;

    match state {
        DeathState::Shot | DeathState::Electrified => {
            if FinalizeFlags::fire_once(&mut fired.corpse) {
                fx.burst(ParticleBurst::new(EffectKind::Corpse, position, 1).with_scale(scale));
            }
            if FinalizeFlags::fire_once(&mut fired.decal) {
                let material = if state == DeathState::Electrified {
                    DecalMaterial::Scorch
                } else {
                    DecalMaterial::Blood
                };
                fx.decal(decal_at(spot, scale, material));
            }
        }
        DeathState::Burning | DeathState::DyingAsh => {
            if FinalizeFlags::fire_once(&mut fired.ash) {
                fx.burst(ParticleBurst::new(EffectKind::AshPile, position, 1).with_scale(scale));
                fx.burst(ParticleBurst::new(EffectKind::Embers, position + Vec3::Y * 0.3, 6).with_velocity(Vec3::Y));
            }
            if FinalizeFlags::fire_once(&mut fired.decal) {
                let material = if state == DeathState::Burning {
                    DecalMaterial::Scorch
                } else {
                    DecalMaterial::Ash
                };
                fx.decal(decal_at(spot, scale, material));
            }
        }
        DeathState::Exploded => {
            if FinalizeFlags::fire_once(&mut fired.debris) {
                fx.burst(ParticleBurst::new(EffectKind::Gore, position + Vec3::Y * 0.5, 24).with_velocity(Vec3::Y * 4.0));
                fx.burst(ParticleBurst::new(EffectKind::Debris, position, 8).with_velocity(Vec3::Y * 2.0));
            }
            if FinalizeFlags::fire_once(&mut fired.decal) {
                fx.decal(decal_at(spot, scale * 2.0, DecalMaterial::Blood));
            }
        }
        DeathState::Alive | DeathState::Dead => {}
    }

    let reward = FinalizeFlags::fire_once(&mut fired.rewarded).then_some(Reward {
        xp: enemy.xp_reward,
        loot_chance: enemy.loot_chance,
        position,
        state,
    });
    enemy.death.mark_dead();
    reward
}

fn decal_at(position: Vec2, scale: f32, material: DecalMaterial) -> DecalSpec {
    DecalSpec {
        position,
        rotation: (position.x * 12.9898 + position.y * 78.233).sin() * std::f32::consts::PI,
        scale,
        material,
    }
}

/// Finalizes enemies whose grace period has run out and returns their
/// slots. The boss is finalized in place and kept.
#[derive(Debug, Default)]
pub struct LifecycleSystem {
    handles: Vec<PoolHandle>,
}

impl LifecycleSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for LifecycleSystem {
    fn name(&self) -> &'static str {
        "lifecycle"
    }

    fn init(&mut self, session: &mut Session) {
        self.handles = Vec::with_capacity(session.config.pools.enemies);
    }

    fn update(&mut self, session: &mut Session, _dt: f32, now: Millis) {
        let Session {
            world,
            config,
            rng,
            sink,
            ..
        } = session;
        let mut fx = FxBus::new(&mut world.fx_queue, sink.as_mut());

        world.enemies.handles_into(&mut self.handles);
        for &handle in self.handles.iter() {
            let Some(enemy) = world.enemies.get_mut(handle) else { continue };
            if !enemy.death.is_due(now) {
                continue;
            }
            let reward = finalize(enemy, &mut fx);
            world.enemies.release(handle);

            if let Some(reward) = reward {
                world.stats.kills += 1;
                world.player.xp = world.player.xp.saturating_add(reward.xp);
                world.stats.xp_awarded += reward.xp as u64;
                let extra = usize::from(rng.gen::<f32>() < reward.loot_chance);
                let dropped = scatter_drops(&mut world.loot, rng, reward.position, extra, now, &config.loot);
                world.stats.loot_dropped += dropped as u64;
                tracing::trace!(?handle, state = ?reward.state, "enemy finalized");
            }
        }

        if let Some(boss) = world.boss.as_mut() {
            if boss.death.is_due(now) {
                if let Some(reward) = finalize(boss, &mut fx) {
                    world.stats.kills += 1;
                    world.stats.boss_kills += 1;
                    world.player.xp = world.player.xp.saturating_add(reward.xp);
                    world.stats.xp_awarded += reward.xp as u64;
                    let dropped = scatter_drops(&mut world.loot, rng, reward.position, 8, now, &config.loot);
                    world.stats.loot_dropped += dropped as u64;
                    tracing::info!(now, "boss defeated");
                }
            }
        }
    }
}
