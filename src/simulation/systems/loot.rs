//! Loot physics, magnetism, pickup and expiry

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::LootTuning;
use crate::core::types::{from_ground, ground, Millis};
use crate::effects::SoundId;
use crate::entity::{LootItem, LootKind, Player};
use crate::pool::{ObjectPool, PoolHandle};
use crate::simulation::scheduler::System;
use crate::simulation::session::{Session, SessionStats};

/// Pop `count` random drops out of `position`. Returns how many were placed.
pub fn scatter_drops(
    loot: &mut ObjectPool<LootItem>,
    rng: &mut ChaCha8Rng,
    position: Vec3,
    count: usize,
    now: Millis,
    tuning: &LootTuning,
) -> usize {
    let mut placed = 0;
    let mut place = |kind: LootKind, rng: &mut ChaCha8Rng| {
        let angle = rng.gen_range(0.0..TAU);
        let pop = Vec3::new(angle.cos() * 0.3, 1.0, angle.sin() * 0.3) * tuning.pop_speed;
        let start = Vec3::new(position.x, position.y.max(0.0) + 0.2, position.z);
        if loot.acquire(LootItem::drop_at(kind, start, pop, now, tuning)).is_some() {
            placed += 1;
        }
    };

    for _ in 0..count {
        let kind = match rng.gen_range(0..3) {
            0 => LootKind::XpGem { value: tuning.xp_per_gem },
            1 => LootKind::Coin {
                value: tuning.coins_per_drop,
            },
            _ => LootKind::Health {
                amount: tuning.health_per_drop,
            },
        };
        place(kind, rng);
    }
    placed
}

/// Apply a picked-up item to the player.
fn collect(kind: LootKind, player: &mut Player, stats: &mut SessionStats) {
    match kind {
        LootKind::XpGem { value } => {
            player.xp = player.xp.saturating_add(value);
            stats.xp_collected += value as u64;
        }
        LootKind::Coin { value } => {
            player.coins = player.coins.saturating_add(value);
            stats.coins_collected += value as u64;
        }
        LootKind::Health { amount } => player.heal(amount),
        LootKind::Crate { .. } => return,
    }
    stats.loot_collected += 1;
}

#[derive(Debug, Default)]
pub struct LootSystem {
    handles: Vec<PoolHandle>,
}

impl LootSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for LootSystem {
    fn name(&self) -> &'static str {
        "loot"
    }

    fn init(&mut self, session: &mut Session) {
        self.handles = Vec::with_capacity(session.config.pools.loot);
    }

    fn update(&mut self, session: &mut Session, dt: f32, now: Millis) {
        let Session { world, config, sink, .. } = session;
        let tuning = &config.loot;
        let gravity = config.physics.gravity;
        let player = &mut world.player;
        let target = ground(player.position);
        let alive = player.is_alive();
        let magnet_sq = tuning.magnet_radius * tuning.magnet_radius;
        let pickup = tuning.pickup_radius + player.radius;

        world.loot.handles_into(&mut self.handles);
        for &handle in self.handles.iter() {
            let Some(item) = world.loot.get_mut(handle) else { continue };
            if item.kind.is_crate() {
                continue;
            }
            if item.is_expired(now) {
                world.loot.release(handle);
                continue;
            }

            let offset = target - ground(item.position);
            let dist_sq = offset.length_squared();
            if alive && dist_sq <= pickup * pickup && item.can_magnetize(now) {
                let kind = item.kind;
                world.loot.release(handle);
                collect(kind, player, &mut world.stats);
                sink.play_sound(SoundId::Pickup);
                continue;
            }

            if alive && item.can_magnetize(now) && dist_sq <= magnet_sq && dist_sq > 1e-8 {
                let pull = offset.normalize() * tuning.magnet_speed;
                item.velocity = from_ground(pull, 0.0);
                item.position.y = item.position.y.max(0.0);
            } else if item.position.y > 0.0 || item.velocity.y > 0.0 {
                item.velocity.y -= gravity * dt;
            } else {
                let damp = (1.0 - 4.0 * dt).max(0.0);
                item.velocity.x *= damp;
                item.velocity.z *= damp;
            }

            item.position += item.velocity * dt;
            if item.position.y < 0.0 {
                item.position.y = 0.0;
                item.velocity.y = 0.0;
            }
            item.spin += dt * 2.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::simulation::scheduler::Scheduler;

    fn setup() -> (Session, Scheduler) {
        let mut session = Session::headless(SimulationConfig::default()).unwrap();
        let mut scheduler = Scheduler::for_session(&session);
        scheduler.add_system(&mut session, Box::new(LootSystem::new()));
        (session, scheduler)
    }

    #[test]
    fn test_scatter_respects_pool_capacity() {
        let mut pool = ObjectPool::new("loot", 2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let placed = scatter_drops(&mut pool, &mut rng, Vec3::ZERO, 4, 0, &LootTuning::default());
        assert_eq!(placed, 2);
        assert_eq!(pool.dropped(), 2);
    }

    #[test]
    fn test_gem_is_magnetized_then_collected() {
        let (mut session, mut scheduler) = setup();
        let tuning = session.config.loot.clone();
        session
            .world
            .loot
            .acquire(LootItem::drop_at(LootKind::XpGem { value: 3 }, Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO, 0, &tuning))
            .unwrap();

        // Inside magnet radius but before the delay: stays put.
        scheduler.update(&mut session, 0.1);
        let (_, gem) = session.world.loot.iter().next().unwrap();
        assert_eq!(gem.position.x, 4.0);

        for _ in 0..20 {
            scheduler.update(&mut session, 0.1);
        }
        assert!(session.world.loot.is_empty());
        assert_eq!(session.world.player.xp, 3);
        assert_eq!(session.world.stats.loot_collected, 1);
    }

    #[test]
    fn test_uncollected_loot_expires() {
        let (mut session, mut scheduler) = setup();
        let mut tuning = session.config.loot.clone();
        tuning.lifetime_ms = 200;
        session
            .world
            .loot
            .acquire(LootItem::drop_at(LootKind::Coin { value: 1 }, Vec3::new(50.0, 0.0, 0.0), Vec3::ZERO, 0, &tuning))
            .unwrap();
        scheduler.update(&mut session, 0.1);
        assert_eq!(session.world.loot.live(), 1);
        scheduler.update(&mut session, 0.1);
        assert!(session.world.loot.is_empty());
    }

    #[test]
    fn test_crates_stay_put() {
        let (mut session, mut scheduler) = setup();
        session.add_crate(Vec3::new(0.2, 0.0, 0.0)).unwrap();
        for _ in 0..20 {
            scheduler.update(&mut session, 0.1);
        }
        assert_eq!(session.world.loot.live(), 1);
    }
}
