//! Fx request drain, particle simulation and decal expiry

use glam::Vec3;
use rand::Rng;

use crate::core::types::{deadline, Millis};
use crate::effects::FxRequest;
use crate::entity::{Decal, Particle};
use crate::pool::PoolHandle;
use crate::simulation::scheduler::System;
use crate::simulation::session::Session;

/// Most particles one burst may occupy
const MAX_PARTICLES_PER_BURST: u16 = 32;

#[derive(Debug, Default)]
pub struct FxSystem {
    handles: Vec<PoolHandle>,
    /// Queue drop counter already folded into the session stats
    seen_queue_drops: u64,
}

impl FxSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for FxSystem {
    fn name(&self) -> &'static str {
        "fx"
    }

    fn init(&mut self, session: &mut Session) {
        let pools = &session.config.pools;
        self.handles = Vec::with_capacity(pools.particles.max(pools.decals));
    }

    fn update(&mut self, session: &mut Session, dt: f32, now: Millis) {
        let Session {
            world,
            config,
            rng,
            sink,
            ..
        } = session;
        let tuning = &config.fx;
        let particles = &mut world.particles;
        let decals = &mut world.decals;
        let mut pool_misses = 0u64;

        let delivered = world.fx_queue.drain_budgeted(config.budgets.fx_per_frame, |request| match request {
            FxRequest::Particles(burst) => {
                sink.spawn_effect(&burst);
                if !burst.kind.is_particle() {
                    return;
                }
                for _ in 0..burst.count.min(MAX_PARTICLES_PER_BURST) {
                    let jitter = Vec3::new(
                        rng.gen_range(-1.0..=1.0),
                        rng.gen_range(0.0..=1.0),
                        rng.gen_range(-1.0..=1.0),
                    ) * tuning.particle_spread;
                    let particle = Particle {
                        kind: burst.kind,
                        position: burst.position,
                        velocity: burst.velocity + jitter,
                        rotation: rng.gen_range(0.0..std::f32::consts::TAU),
                        scale: burst.scale * 0.15,
                        color: burst.color,
                        expires_at: deadline(now, tuning.particle_ttl_ms),
                    };
                    if particles.acquire(particle).is_none() {
                        pool_misses += 1;
                        break;
                    }
                }
            }
            FxRequest::Decal(spec) => {
                sink.spawn_decal(&spec);
                let decal = Decal {
                    material: spec.material,
                    position: spec.position,
                    rotation: spec.rotation,
                    scale: spec.scale,
                    expires_at: deadline(now, tuning.decal_ttl_ms),
                };
                if decals.acquire(decal).is_none() {
                    pool_misses += 1;
                }
            }
        });
        world.stats.fx_delivered += delivered as u64;
        let queue_drops = world.fx_queue.dropped();
        world.stats.fx_dropped += queue_drops.saturating_sub(self.seen_queue_drops) + pool_misses;
        self.seen_queue_drops = queue_drops;

        let gravity = config.physics.gravity;
        particles.handles_into(&mut self.handles);
        for &handle in self.handles.iter() {
            let Some(particle) = particles.get_mut(handle) else { continue };
            if particle.is_expired(now) {
                particles.release(handle);
                continue;
            }
            particle.integrate(dt, gravity);
        }

        decals.handles_into(&mut self.handles);
        for &handle in self.handles.iter() {
            if decals.get(handle).map(|d| d.is_expired(now)).unwrap_or(false) {
                decals.release(handle);
            }
        }
    }
}
