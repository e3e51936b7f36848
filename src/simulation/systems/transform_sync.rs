//! Instance transform sync for the render layer

use glam::Vec3;

use crate::core::types::Millis;
use crate::pool::{InstanceTransform, Pooled};
use crate::simulation::scheduler::System;
use crate::simulation::session::Session;

/// Runs last: copies final positions of every pooled record, vehicle and
/// the boss into the instance buffers. Freed slots already hold `HIDDEN`.
#[derive(Debug, Default)]
pub struct TransformSyncSystem;

impl TransformSyncSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for TransformSyncSystem {
    fn name(&self) -> &'static str {
        "transform_sync"
    }

    fn update(&mut self, session: &mut Session, _dt: f32, _now: Millis) {
        let world = &mut session.world;
        world.enemies.sync_transforms();
        world.particles.sync_transforms();
        world.decals.sync_transforms();
        world.loot.sync_transforms();

        world.vehicle_instances.resize(world.vehicles.len(), InstanceTransform::HIDDEN);
        for (instance, vehicle) in world.vehicle_instances.iter_mut().zip(world.vehicles.iter()) {
            let lifted = vehicle.position + Vec3::Y * vehicle.suspension.offset;
            *instance = InstanceTransform::new(lifted, vehicle.heading, 1.0);
        }

        world.boss_instance = match &world.boss {
            Some(boss) if !boss.death.state.is_terminal() => boss.instance_transform(),
            _ => InstanceTransform::HIDDEN,
        };
    }

    fn cleanup(&mut self, session: &mut Session) {
        session.world.boss_instance = InstanceTransform::HIDDEN;
    }
}
