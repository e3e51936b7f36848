//! Drivable vehicles
//!
//! Vehicles are few and long-lived, so they live in a plain `Vec` on the
//! world rather than a pool. Each carries a spring-damped suspension whose
//! offset only feeds presentation.

use glam::{Vec2, Vec3};

use crate::collision::ImpactBody;
use crate::content::VehicleStats;
use crate::core::types::{from_ground, ground, BodyId};

/// Spring-damper for the chassis bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suspension {
    pub offset: f32,
    pub velocity: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Suspension {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            offset: 0.0,
            velocity: 0.0,
            stiffness,
            damping,
        }
    }

    /// Semi-implicit Euler step toward rest.
    pub fn step(&mut self, dt: f32) {
        let accel = -self.stiffness * self.offset - self.damping * self.velocity;
        self.velocity += accel * dt;
        self.offset += self.velocity * dt;
    }

    pub fn kick(&mut self, impulse: f32) {
        self.velocity += impulse;
    }

    pub fn is_settled(&self) -> bool {
        self.offset.abs() < 1e-3 && self.velocity.abs() < 1e-3
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub body: BodyId,
    pub type_key: String,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading angle (radians) on the ground plane
    pub heading: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub turn_rate: f32,
    pub mass: f32,
    pub radius: f32,
    pub collision_damage_multiplier: f32,
    pub knockback_constant: f32,
    pub suspension: Suspension,
    pub occupied: bool,
}

impl Vehicle {
    pub fn from_stats(body: BodyId, type_key: impl Into<String>, stats: &VehicleStats, position: Vec3) -> Self {
        Self {
            body,
            type_key: type_key.into(),
            position,
            velocity: Vec3::ZERO,
            heading: 0.0,
            max_speed: stats.max_speed,
            acceleration: stats.acceleration,
            turn_rate: stats.turn_rate,
            mass: stats.mass,
            radius: stats.radius,
            collision_damage_multiplier: stats.collision_damage_multiplier,
            knockback_constant: stats.knockback_constant,
            suspension: Suspension::new(stats.suspension_stiffness, stats.suspension_damping),
            occupied: false,
        }
    }

    /// Unit forward vector on the ground plane
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.heading.sin(), self.heading.cos())
    }

    pub fn speed(&self) -> f32 {
        ground(self.velocity).length()
    }

    pub fn ground_velocity(&self) -> Vec2 {
        ground(self.velocity)
    }

    pub fn set_ground_velocity(&mut self, v: Vec2) {
        self.velocity = from_ground(v, self.velocity.y);
    }

    /// Arcade drive: `throttle` in -1..1 along the heading, `steer` in -1..1.
    ///
    /// Steering authority scales with speed so a parked vehicle cannot spin
    /// in place. Velocity is re-aligned with the heading, friction bleeds
    /// speed when coasting and the result is clamped to `max_speed`.
    pub fn drive(&mut self, throttle: f32, steer: f32, friction: f32, dt: f32) {
        let throttle = throttle.clamp(-1.0, 1.0);
        let steer = steer.clamp(-1.0, 1.0);
        let speed = self.speed();
        let authority = if self.max_speed > 0.0 { (speed / self.max_speed).min(1.0) } else { 0.0 };
        self.heading += steer * self.turn_rate * authority * dt;

        let forward = self.forward();
        let mut along = ground(self.velocity).dot(forward);
        along += throttle * self.acceleration * dt;
        if throttle == 0.0 {
            let bleed = friction * dt * along.abs().max(1.0);
            along = if along.abs() <= bleed { 0.0 } else { along - bleed * along.signum() };
        }
        along = along.clamp(-self.max_speed * 0.5, self.max_speed);
        self.set_ground_velocity(forward * along);
    }

    /// Integrate position on the ground plane.
    pub fn integrate(&mut self, dt: f32) {
        self.position += Vec3::new(self.velocity.x, 0.0, self.velocity.z) * dt;
    }

    /// Scale ground speed after a ram.
    pub fn retain_speed(&mut self, fraction: f32) {
        let v = ground(self.velocity) * fraction.clamp(0.0, 1.0);
        self.set_ground_velocity(v);
    }

    pub fn step_suspension(&mut self, dt: f32) {
        self.suspension.step(dt);
    }

    pub fn kick(&mut self, impulse: f32) {
        self.suspension.kick(impulse);
    }

    pub fn impact_body(&self) -> ImpactBody {
        ImpactBody {
            id: self.body,
            position: self.position,
            velocity: self.velocity,
            mass: self.mass,
            max_speed: self.max_speed,
            collision_damage_multiplier: self.collision_damage_multiplier,
            knockback_constant: self.knockback_constant,
        }
    }
}
