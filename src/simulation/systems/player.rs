//! Player movement and vehicle handling

use glam::{Vec2, Vec3};

use crate::core::types::{from_ground, ground, Millis};
use crate::simulation::scheduler::System;
use crate::simulation::session::Session;

#[derive(Debug, Default)]
pub struct PlayerSystem;

impl PlayerSystem {
    pub fn new() -> Self {
        Self
    }
}

/// Enter the nearest free vehicle in reach, or leave the current one.
fn toggle_vehicle(session: &mut Session) {
    let world = &mut session.world;
    let player = &mut world.player;

    if let Some(index) = player.driving.take() {
        if let Some(vehicle) = world.vehicles.get_mut(index) {
            vehicle.occupied = false;
            // Step out on the driver's side.
            let forward = vehicle.forward();
            let side = Vec2::new(forward.y, -forward.x);
            let exit = ground(vehicle.position) + side * (vehicle.radius + player.radius);
            player.position = from_ground(exit, 0.0);
            player.velocity = Vec3::ZERO;
            tracing::debug!(vehicle = index, "player left vehicle");
        }
        return;
    }

    let here = ground(player.position);
    let reach_sq = session.config.player.enter_radius * session.config.player.enter_radius;
    let nearest = world
        .vehicles
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.occupied)
        .map(|(i, v)| (i, ground(v.position).distance_squared(here)))
        .filter(|(_, d)| *d <= reach_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((index, _)) = nearest {
        world.vehicles[index].occupied = true;
        player.driving = Some(index);
        tracing::debug!(vehicle = index, "player entered vehicle");
    }
}

impl System for PlayerSystem {
    fn name(&self) -> &'static str {
        "player"
    }

    fn update(&mut self, session: &mut Session, dt: f32, _now: Millis) {
        let input = session.input;
        if session.world.player.is_alive() && input.interact {
            toggle_vehicle(session);
        }

        let friction = session.config.physics.vehicle_friction;
        let world = &mut session.world;
        let player = &mut world.player;
        let driving = if player.is_alive() { player.driving } else { None };
        let axis = input.sanitized_move();

        for (index, vehicle) in world.vehicles.iter_mut().enumerate() {
            if driving == Some(index) {
                vehicle.drive(axis.y, axis.x, friction, dt);
            } else {
                vehicle.drive(0.0, 0.0, friction, dt);
            }
            vehicle.integrate(dt);
            vehicle.step_suspension(dt);
        }

        if !player.is_alive() {
            player.velocity = Vec3::ZERO;
            return;
        }

        match driving.and_then(|i| world.vehicles.get(i)) {
            Some(vehicle) => {
                player.position = vehicle.position;
                player.velocity = vehicle.velocity;
                player.facing = vehicle.forward();
            }
            None => {
                let velocity = axis * player.speed;
                player.velocity = from_ground(velocity, 0.0);
                player.position += player.velocity * dt;
                let aim = input.sanitized_aim();
                if aim.length_squared() > 1e-6 {
                    player.facing = aim.normalize();
                } else if axis.length_squared() > 1e-6 {
                    player.facing = axis.normalize();
                }
            }
        }
    }
}
