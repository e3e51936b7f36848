//! Boundary to the render and audio layers
//!
//! The core never builds meshes or plays samples. It issues opaque requests
//! through [`EffectSink`], implemented once by the presentation layer and
//! injected into the session. Visual requests go through a pooled queue and
//! reach the sink at a bounded rate; sounds and hit feedback are
//! fire-and-forget.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use crate::pool::RequestQueue;

/// What a particle burst depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Blood,
    Gore,
    Debris,
    Sparks,
    Smoke,
    Embers,
    MuzzleFlash,
    /// Single corpse mesh left by a standard death
    Corpse,
    /// Single ash pile left by a burn or plasma death
    AshPile,
}

impl EffectKind {
    /// Whether the core simulates the burst as pooled particles. Corpses and
    /// ash piles are static meshes owned by the render layer.
    pub fn is_particle(&self) -> bool {
        !matches!(self, EffectKind::Corpse | EffectKind::AshPile)
    }

    /// Particles of this kind fall under gravity.
    pub fn has_weight(&self) -> bool {
        matches!(self, EffectKind::Blood | EffectKind::Gore | EffectKind::Debris | EffectKind::Sparks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecalMaterial {
    Blood,
    Scorch,
    Ash,
    Oil,
}

/// "Spawn `count` particles of `kind` at `position`"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    pub kind: EffectKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub count: u16,
    pub color: [f32; 4],
    pub scale: f32,
}

impl ParticleBurst {
    pub fn new(kind: EffectKind, position: Vec3, count: u16) -> Self {
        Self {
            kind,
            position,
            velocity: Vec3::ZERO,
            count,
            color: default_color(kind),
            scale: 1.0,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

fn default_color(kind: EffectKind) -> [f32; 4] {
    match kind {
        EffectKind::Blood | EffectKind::Gore => [0.55, 0.02, 0.02, 1.0],
        EffectKind::Debris => [0.35, 0.3, 0.25, 1.0],
        EffectKind::Sparks | EffectKind::MuzzleFlash => [1.0, 0.85, 0.4, 1.0],
        EffectKind::Embers => [1.0, 0.45, 0.1, 1.0],
        EffectKind::Smoke => [0.3, 0.3, 0.3, 0.6],
        EffectKind::Corpse => [1.0, 1.0, 1.0, 1.0],
        EffectKind::AshPile => [0.2, 0.2, 0.2, 1.0],
    }
}

/// "Place a decal at (x, z)"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalSpec {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub material: DecalMaterial,
}

/// A queued visual request. Pool slots hold either variant over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FxRequest {
    Particles(ParticleBurst),
    Decal(DecalSpec),
}

/// Symbolic sound effect ids understood by the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    ImpactFlesh,
    VehicleBump,
    Splatter,
    WalkerDeath,
    BossDeath,
    Burn,
    Zap,
    GunFire,
    DryFire,
    Reload,
    Pickup,
    CrateBreak,
    ObstacleHit,
    PlayerHurt,
    BossRoar,
}

impl SoundId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundId::ImpactFlesh => "impact_flesh",
            SoundId::VehicleBump => "vehicle_bump",
            SoundId::Splatter => "splatter",
            SoundId::WalkerDeath => "walker_death",
            SoundId::BossDeath => "boss_death",
            SoundId::Burn => "burn",
            SoundId::Zap => "zap",
            SoundId::GunFire => "gun_fire",
            SoundId::DryFire => "dry_fire",
            SoundId::Reload => "reload",
            SoundId::Pickup => "pickup",
            SoundId::CrateBreak => "crate_break",
            SoundId::ObstacleHit => "obstacle_hit",
            SoundId::PlayerHurt => "player_hurt",
            SoundId::BossRoar => "boss_roar",
        }
    }
}

/// Severity class of a hit, for camera and rumble feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    Bullet,
    Push,
    Knockback,
    Splatter,
    Crate,
    Obstacle,
    PlayerHurt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitFeedback {
    pub kind: HitKind,
    pub position: Vec3,
    /// Camera shake magnitude (0 = none)
    pub shake: f32,
}

/// Presentation-layer hooks.
pub trait EffectSink {
    fn on_hit(&mut self, hit: &HitFeedback);
    fn spawn_effect(&mut self, burst: &ParticleBurst);
    fn spawn_decal(&mut self, decal: &DecalSpec);
    fn play_sound(&mut self, sound: SoundId);
}

/// Sink that discards everything (headless runs).
#[derive(Debug, Default)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn on_hit(&mut self, _hit: &HitFeedback) {}
    fn spawn_effect(&mut self, _burst: &ParticleBurst) {}
    fn spawn_decal(&mut self, _decal: &DecalSpec) {}
    fn play_sound(&mut self, _sound: SoundId) {}
}

/// Everything a [`RecordingSink`] has seen.
#[derive(Debug, Default, Clone)]
pub struct FxLog {
    pub hits: Vec<HitFeedback>,
    pub effects: Vec<ParticleBurst>,
    pub decals: Vec<DecalSpec>,
    pub sounds: Vec<SoundId>,
}

impl FxLog {
    pub fn effects_of(&self, kind: EffectKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    pub fn sounds_of(&self, sound: SoundId) -> usize {
        self.sounds.iter().filter(|s| **s == sound).count()
    }

    pub fn total_shake(&self) -> f32 {
        self.hits.iter().map(|h| h.shake).sum()
    }
}

/// Sink that records every call; the log stays readable after the sink
/// is boxed into a session.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    log: Rc<RefCell<FxLog>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the log.
    pub fn log(&self) -> Rc<RefCell<FxLog>> {
        Rc::clone(&self.log)
    }
}

impl EffectSink for RecordingSink {
    fn on_hit(&mut self, hit: &HitFeedback) {
        self.log.borrow_mut().hits.push(*hit);
    }

    fn spawn_effect(&mut self, burst: &ParticleBurst) {
        self.log.borrow_mut().effects.push(*burst);
    }

    fn spawn_decal(&mut self, decal: &DecalSpec) {
        self.log.borrow_mut().decals.push(*decal);
    }

    fn play_sound(&mut self, sound: SoundId) {
        self.log.borrow_mut().sounds.push(sound);
    }
}

/// Borrowed view over the fx queue and the sink for one system call.
pub struct FxBus<'a> {
    queue: &'a mut RequestQueue<FxRequest>,
    sink: &'a mut dyn EffectSink,
}

impl<'a> FxBus<'a> {
    pub fn new(queue: &'a mut RequestQueue<FxRequest>, sink: &'a mut dyn EffectSink) -> Self {
        Self { queue, sink }
    }

    /// Queue a particle burst; dropped if the queue is full.
    pub fn burst(&mut self, burst: ParticleBurst) -> bool {
        self.queue.push(FxRequest::Particles(burst))
    }

    /// Queue a decal; dropped if the queue is full.
    pub fn decal(&mut self, decal: DecalSpec) -> bool {
        self.queue.push(FxRequest::Decal(decal))
    }

    pub fn sound(&mut self, sound: SoundId) {
        self.sink.play_sound(sound);
    }

    pub fn hit(&mut self, kind: HitKind, position: Vec3, shake: f32) {
        self.sink.on_hit(&HitFeedback { kind, position, shake });
    }
}
