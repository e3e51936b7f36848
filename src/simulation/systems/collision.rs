//! Vehicle rams, crate smashing and obstacle contacts

use glam::Vec3;

use crate::collision::{base_damage, resolve_obstacle, ImpactOutcome, ImpactTier, TargetKey};
use crate::core::types::{from_ground, ground, Millis};
use crate::core::config::SimulationConfig;
use crate::effects::{EffectKind, FxBus, HitFeedback, HitKind, ParticleBurst, SoundId};
use crate::entity::Vehicle;
use crate::pool::PoolHandle;
use crate::simulation::scheduler::System;
use crate::simulation::session::{Session, SessionStats};

use super::combat::death_sound;
use super::loot::scatter_drops;

/// Contact radius of a crate on the ground plane
const CRATE_RADIUS: f32 = 0.5;

#[derive(Debug, Default)]
pub struct CollisionSystem {
    candidates: Vec<PoolHandle>,
    broken: Vec<(PoolHandle, Vec3)>,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn ram_enemies(&mut self, session: &mut Session, index: usize, now: Millis) {
        let Session {
            world,
            grid,
            config,
            content,
            resolver,
            sink,
            ..
        } = session;
        let Some(vehicle) = world.vehicles.get_mut(index) else { return };
        let margin = config.grid.max_enemy_radius.max(content.max_enemy_radius());
        grid.query_radius(ground(vehicle.position), vehicle.radius + margin, &mut self.candidates);

        let mut fx = FxBus::new(&mut world.fx_queue, sink.as_mut());
        for &handle in self.candidates.iter() {
            let Some(enemy) = world.enemies.get_mut(handle) else { continue };
            let reach = vehicle.radius + enemy.radius;
            if ground(enemy.position).distance_squared(ground(vehicle.position)) > reach * reach {
                continue;
            }
            let body = vehicle.impact_body();
            let outcome = resolver.resolve_impact(&body, TargetKey::Enemy(handle), enemy, now, config, &mut fx);
            if let ImpactOutcome::Applied { tier, killed, .. } = outcome {
                if killed && tier != ImpactTier::Splatter {
                    fx.sound(death_sound(enemy, enemy.death.state));
                }
                after_ram(&mut world.stats, vehicle, tier, outcome.damage(), config);
            }
        }

        if let Some(boss) = world.boss.as_mut() {
            let reach = vehicle.radius + boss.radius;
            if ground(boss.position).distance_squared(ground(vehicle.position)) <= reach * reach {
                let body = vehicle.impact_body();
                let outcome = resolver.resolve_impact(&body, TargetKey::Boss, boss, now, config, &mut fx);
                if let ImpactOutcome::Applied { tier, killed, .. } = outcome {
                    if killed {
                        fx.sound(SoundId::BossDeath);
                    }
                    after_ram(&mut world.stats, vehicle, tier, outcome.damage(), config);
                    // The boss does not budge much; the vehicle bounces back.
                    let v = vehicle.ground_velocity();
                    vehicle.set_ground_velocity(-v * config.collision.obstacle_restitution);
                }
            }
        }
    }

    fn smash_crates(&mut self, session: &mut Session, index: usize, now: Millis) {
        let Session {
            world,
            config,
            resolver,
            rng,
            sink,
            ..
        } = session;
        let Some(vehicle) = world.vehicles.get_mut(index) else { return };
        let tuning = &config.collision;
        let speed_sq = vehicle.ground_velocity().length_squared();
        if speed_sq <= tuning.push_speed_sq {
            return;
        }

        let mut fx = FxBus::new(&mut world.fx_queue, sink.as_mut());
        self.broken.clear();
        for (handle, item) in world.loot.iter_mut() {
            if !item.kind.is_crate() {
                continue;
            }
            let reach = vehicle.radius + CRATE_RADIUS;
            if ground(item.position).distance_squared(ground(vehicle.position)) > reach * reach {
                continue;
            }
            if !resolver.engage(vehicle.body, TargetKey::Crate(handle), now, tuning.cooldown_ms) {
                continue;
            }
            let damage = base_damage(
                speed_sq.sqrt(),
                vehicle.mass,
                vehicle.collision_damage_multiplier,
                tuning.damage_constant,
            );
            fx.hit(HitKind::Crate, item.position, tuning.knockback_shake * 0.5);
            if item.damage_crate(damage) {
                self.broken.push((handle, item.position));
            }
        }

        for &(handle, position) in self.broken.iter() {
            world.loot.release(handle);
            world.stats.crates_broken += 1;
            fx.sound(SoundId::CrateBreak);
            fx.burst(ParticleBurst::new(EffectKind::Debris, position + Vec3::Y * 0.5, 12).with_velocity(Vec3::Y * 3.0));
            let dropped = scatter_drops(&mut world.loot, rng, position, 3, now, &config.loot);
            world.stats.loot_dropped += dropped as u64;
        }
    }

    fn hit_obstacles(session: &mut Session) {
        let Session { world, config, sink, .. } = session;
        let tuning = &config.collision;

        for vehicle in world.vehicles.iter_mut() {
            for obstacle in world.obstacles.iter() {
                let mut pos = ground(vehicle.position);
                let mut vel = vehicle.ground_velocity();
                let Some(contact) = resolve_obstacle(&mut pos, &mut vel, vehicle.radius, obstacle, tuning) else {
                    continue;
                };
                vehicle.position = from_ground(pos, vehicle.position.y);
                vehicle.set_ground_velocity(vel);
                vehicle.kick(contact.shake_impulse);
                if contact.inbound_speed > 1.0 {
                    world.stats.obstacle_hits += 1;
                    sink.play_sound(SoundId::ObstacleHit);
                    sink.on_hit(&HitFeedback {
                        kind: HitKind::Obstacle,
                        position: vehicle.position,
                        shake: contact.shake_impulse * 0.1,
                    });
                }
            }
        }

        let player = &mut world.player;
        if player.driving.is_none() {
            for obstacle in world.obstacles.iter() {
                let mut pos = ground(player.position);
                let mut vel = ground(player.velocity);
                if resolve_obstacle(&mut pos, &mut vel, player.radius, obstacle, tuning).is_some() {
                    player.position = from_ground(pos, player.position.y);
                    player.velocity = from_ground(vel, player.velocity.y);
                }
            }
        }
    }
}

/// Vehicle-side bookkeeping after a ram: counters and speed retention.
fn after_ram(
    stats: &mut SessionStats,
    vehicle: &mut Vehicle,
    tier: ImpactTier,
    damage: f32,
    config: &SimulationConfig,
) {
    stats.damage_dealt += damage as f64;
    match tier {
        ImpactTier::Push => stats.pushes += 1,
        ImpactTier::Knockback => {
            stats.knockbacks += 1;
            vehicle.retain_speed(config.collision.knockback_speed_retention);
        }
        ImpactTier::Splatter => {
            stats.splatters += 1;
            vehicle.retain_speed(config.collision.splatter_speed_retention);
        }
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn init(&mut self, session: &mut Session) {
        self.candidates = Vec::with_capacity(session.config.pools.enemies);
        self.broken = Vec::with_capacity(16);
    }

    fn update(&mut self, session: &mut Session, _dt: f32, now: Millis) {
        for index in 0..session.world.vehicles.len() {
            self.ram_enemies(session, index, now);
            self.smash_crates(session, index, now);
        }
        Self::hit_obstacles(session);
        session.resolver.prune(now, session.config.collision.cooldown_ms);
    }

    fn cleanup(&mut self, session: &mut Session) {
        session.resolver.clear();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::entity::{DeathState, EnemyType, LootKind};
    use crate::simulation::scheduler::Scheduler;
    use crate::simulation::systems::spatial_index::SpatialIndexSystem;

    fn setup() -> (Session, Scheduler) {
        let mut session = Session::headless(SimulationConfig::default()).unwrap();
        let mut scheduler = Scheduler::for_session(&session);
        scheduler.add_system(&mut session, Box::new(SpatialIndexSystem::new()));
        scheduler.add_system(&mut session, Box::new(CollisionSystem::new()));
        session.add_vehicle("buggy", Vec3::ZERO).unwrap();
        (session, scheduler)
    }

    #[test]
    fn test_fast_ram_splatters_and_keeps_speed() {
        let (mut session, mut scheduler) = setup();
        let handle = session.spawn_enemy(EnemyType::Walker, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        session.world.vehicles[0].set_ground_velocity(Vec2::new(15.0, 0.0));
        scheduler.update(&mut session, 0.016);

        let enemy = session.world.enemy(handle).unwrap();
        assert_eq!(enemy.death.state, DeathState::Exploded);
        assert_eq!(session.world.stats.splatters, 1);
        assert!((session.world.vehicles[0].speed() - 15.0 * 0.95).abs() < 1e-3);
    }

    #[test]
    fn test_parked_vehicle_does_nothing() {
        let (mut session, mut scheduler) = setup();
        let handle = session.spawn_enemy(EnemyType::Walker, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        scheduler.update(&mut session, 0.016);
        assert_eq!(session.world.enemy(handle).unwrap().hp, 100.0);
    }

    #[test]
    fn test_crate_breaks_into_drops() {
        let (mut session, mut scheduler) = setup();
        session.add_crate(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        session.world.vehicles[0].set_ground_velocity(Vec2::new(10.0, 0.0));
        scheduler.update(&mut session, 0.016);
        assert_eq!(session.world.stats.crates_broken, 1);
        assert_eq!(session.world.loot.live(), 3);
        assert!(session.world.loot.iter().all(|(_, l)| !matches!(l.kind, LootKind::Crate { .. })));
    }

    #[test]
    fn test_obstacle_bounces_vehicle() {
        let (mut session, mut scheduler) = setup();
        session.add_obstacle(Vec2::new(2.0, 0.0), 1.0);
        session.world.vehicles[0].set_ground_velocity(Vec2::new(8.0, 0.0));
        scheduler.update(&mut session, 0.016);
        let vehicle = &session.world.vehicles[0];
        assert!(vehicle.velocity.x < 0.0);
        assert!(vehicle.position.x < 0.0);
        assert_eq!(session.world.stats.obstacle_hits, 1);
    }
}
