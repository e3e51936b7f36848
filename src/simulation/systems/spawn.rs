//! Wave director and spawn-queue drain

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::core::types::{deadline, from_ground, ground, Millis};
use crate::effects::SoundId;
use crate::entity::{Enemy, EnemyType};
use crate::simulation::scheduler::System;
use crate::simulation::session::{Session, SpawnRequest};

/// Enqueues waves on a ring around the player and turns queued requests
/// into pooled enemies, a bounded number per frame.
#[derive(Debug, Default)]
pub struct SpawnSystem {
    next_wave_at: Millis,
    boss_spawned: bool,
    /// Wave kinds resolved once at init; unknown keys are dropped then
    kinds: Vec<EnemyType>,
}

impl SpawnSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn enqueue_wave(&mut self, session: &mut Session) {
        if self.kinds.is_empty() || session.config.waves.size == 0 {
            return;
        }
        let center = ground(session.world.player.position);
        let radius = session.config.waves.radius;
        let mut dropped = 0;
        for _ in 0..session.config.waves.size {
            let angle = session.rng.gen_range(0.0..TAU);
            let ty = self.kinds[session.rng.gen_range(0..self.kinds.len())];
            let position = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            if !session.world.spawn_queue.push(SpawnRequest { ty, position }) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            session.world.stats.spawns_dropped += dropped;
            tracing::warn!(dropped, "spawn queue full, wave truncated");
        }
    }

    fn spawn_boss(&mut self, session: &mut Session, now: Millis) {
        self.boss_spawned = true;
        let Some(stats) = session.content.enemy(EnemyType::Boss.key()) else {
            return;
        };
        let center = ground(session.world.player.position);
        let angle = session.rng.gen_range(0.0..TAU);
        let position = center + Vec2::new(angle.cos(), angle.sin()) * session.config.waves.radius;
        session.world.boss = Some(Enemy::spawn(EnemyType::Boss, stats, from_ground(position, 0.0), now));
        session.sink.play_sound(SoundId::BossRoar);
        tracing::debug!(now, x = position.x, z = position.y, "boss spawned");
    }
}

impl System for SpawnSystem {
    fn name(&self) -> &'static str {
        "spawn"
    }

    fn init(&mut self, session: &mut Session) {
        self.next_wave_at = session.world.now;
        self.boss_spawned = session.world.boss.is_some();
        self.kinds.clear();
        for key in &session.config.waves.kinds {
            match EnemyType::from_key(key) {
                // Bosses are never part of a regular wave.
                Some(EnemyType::Boss) => tracing::warn!(key = %key, "boss listed as wave kind, skipped"),
                Some(ty) => self.kinds.push(ty),
                None => tracing::warn!(key = %key, "unknown wave kind, skipped"),
            }
        }
    }

    fn update(&mut self, session: &mut Session, _dt: f32, now: Millis) {
        if session.config.waves.interval_ms > 0 && now >= self.next_wave_at {
            self.enqueue_wave(session);
            self.next_wave_at = deadline(now, session.config.waves.interval_ms);
        }

        if let Some(boss_at) = session.config.waves.boss_at_ms {
            if !self.boss_spawned && now >= boss_at {
                self.spawn_boss(session, now);
            }
        }

        let Session { world, content, config, .. } = session;
        let enemies = &mut world.enemies;
        let stats = &mut world.stats;
        let mut warned = false;
        world.spawn_queue.drain_budgeted(config.budgets.spawns_per_frame, |request| {
            let Some(enemy_stats) = content.enemy(request.ty.key()) else {
                return;
            };
            let enemy = Enemy::spawn(request.ty, enemy_stats, Vec3::new(request.position.x, 0.0, request.position.y), now);
            match enemies.acquire(enemy) {
                Some(_) => stats.spawns += 1,
                None => {
                    stats.spawns_dropped += 1;
                    if !warned {
                        tracing::warn!(capacity = enemies.capacity(), "enemy pool full, spawn dropped");
                        warned = true;
                    }
                }
            }
        });
    }
}
