//! Enemy steering and ballistic integration

use glam::{Vec2, Vec3};

use crate::core::config::PhysicsConfig;
use crate::core::types::{ground, yaw_of, Millis};
use crate::entity::Enemy;
use crate::simulation::scheduler::System;
use crate::simulation::session::Session;

#[derive(Debug, Default)]
pub struct EnemyMovementSystem;

impl EnemyMovementSystem {
    pub fn new() -> Self {
        Self
    }
}

/// Advance one enemy toward `target`.
///
/// Alive enemies blend their ground velocity toward the seek velocity, so a
/// knockback impulse decays over a few frames instead of being overwritten.
/// Dying bodies only decelerate. Anything lifted falls back to the ground.
pub fn step_enemy(enemy: &mut Enemy, target: Vec2, now: Millis, dt: f32, physics: &PhysicsConfig, slow_factor: f32) {
    if enemy.death.state.is_terminal() {
        return;
    }

    let mut horizontal = ground(enemy.velocity);
    if enemy.is_alive() {
        enemy.tick_lunge(now);
        let to_target = target - ground(enemy.position);
        let desired = if to_target.length_squared() > 1e-4 {
            let dir = to_target.normalize();
            enemy.yaw = yaw_of(dir);
            dir * enemy.current_speed(now, slow_factor)
        } else {
            Vec2::ZERO
        };
        let blend = (physics.steering_rate * dt).min(1.0);
        horizontal += (desired - horizontal) * blend;
    } else {
        horizontal *= (1.0 - physics.dying_drag * dt).max(0.0);
    }

    let mut vertical = enemy.velocity.y;
    if enemy.position.y > 0.0 || vertical > 0.0 {
        vertical -= physics.gravity * dt;
    }

    enemy.velocity = Vec3::new(horizontal.x, vertical, horizontal.y);
    enemy.position += enemy.velocity * dt;
    if enemy.position.y <= 0.0 {
        enemy.position.y = 0.0;
        enemy.velocity.y = 0.0;
    }
}

impl System for EnemyMovementSystem {
    fn name(&self) -> &'static str {
        "enemy_movement"
    }

    fn update(&mut self, session: &mut Session, dt: f32, now: Millis) {
        if dt <= 0.0 {
            return;
        }
        let target = ground(session.world.player.position);
        let physics = &session.config.physics;
        let slow_factor = session.config.collision.slow_factor;

        for (_, enemy) in session.world.enemies.iter_mut() {
            step_enemy(enemy, target, now, dt, physics, slow_factor);
        }
        if let Some(boss) = session.world.boss.as_mut() {
            step_enemy(boss, target, now, dt, physics, slow_factor);
        }
    }
}
