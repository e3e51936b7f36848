//! Weapon fire and enemy contact attacks

use glam::{Vec2, Vec3};

use crate::content::WeaponStats;
use crate::core::types::{deadline, from_ground, ground, Millis};
use crate::effects::{EffectKind, FxBus, HitKind, ParticleBurst, SoundId};
use crate::entity::{DeathState, Enemy, TriggerResult};
use crate::pool::{ObjectPool, PoolHandle};
use crate::simulation::scheduler::System;
use crate::simulation::session::{Session, SessionStats};
use crate::spatial::SpatialGrid;

/// Target chosen by the aim query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Enemy(PoolHandle),
    Boss,
}

/// Sound played when an enemy dies into `state`.
pub fn death_sound(enemy: &Enemy, state: DeathState) -> SoundId {
    if enemy.is_boss() {
        return SoundId::BossDeath;
    }
    match state {
        DeathState::Burning | DeathState::DyingAsh => SoundId::Burn,
        DeathState::Electrified => SoundId::Zap,
        DeathState::Exploded => SoundId::Splatter,
        _ => SoundId::WalkerDeath,
    }
}

/// Nearest living enemy within `range` of `origin` and inside the aim cone.
///
/// `candidates` is scratch space for the grid query.
#[allow(clippy::too_many_arguments)]
pub fn pick_target(
    grid: &SpatialGrid<PoolHandle>,
    enemies: &ObjectPool<Enemy>,
    boss: Option<&Enemy>,
    origin: Vec2,
    aim: Vec2,
    range: f32,
    cone_cos: f32,
    broad_margin: f32,
    candidates: &mut Vec<PoolHandle>,
) -> Option<Target> {
    let in_cone = |enemy: &Enemy| -> Option<f32> {
        if !enemy.is_alive() {
            return None;
        }
        let offset = ground(enemy.position) - origin;
        let dist_sq = offset.length_squared();
        let reach = range + enemy.radius;
        if dist_sq > reach * reach {
            return None;
        }
        // Point-blank targets are always in the cone.
        if dist_sq > enemy.radius * enemy.radius && offset.normalize().dot(aim) < cone_cos {
            return None;
        }
        Some(dist_sq)
    };

    grid.query_radius(origin, range + broad_margin, candidates);
    let mut best: Option<(Target, f32)> = None;
    for &handle in candidates.iter() {
        let Some(enemy) = enemies.get(handle) else { continue };
        if let Some(d) = in_cone(enemy) {
            if best.map(|(_, b)| d < b).unwrap_or(true) {
                best = Some((Target::Enemy(handle), d));
            }
        }
    }
    if let Some(d) = boss.and_then(in_cone) {
        if best.map(|(_, b)| d < b).unwrap_or(true) {
            best = Some((Target::Boss, d));
        }
    }
    best.map(|(t, _)| t)
}

/// Handles the player's weapon and enemies hitting the player.
#[derive(Debug, Default)]
pub struct CombatSystem {
    candidates: Vec<PoolHandle>,
    /// Equipped weapon, resolved once at init. `None` disarms the player.
    weapon: Option<WeaponStats>,
}

impl CombatSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn fire(&mut self, session: &mut Session, weapon: &WeaponStats, now: Millis) {
        let Session {
            world,
            grid,
            config,
            content,
            sink,
            ..
        } = session;
        let mut fx = FxBus::new(&mut world.fx_queue, sink.as_mut());
        let player = &mut world.player;

        match player.weapon.trigger(now, weapon) {
            TriggerResult::Fired => {}
            TriggerResult::ReloadStarted => {
                fx.sound(SoundId::DryFire);
                return;
            }
            TriggerResult::Cooling | TriggerResult::Reloading => return,
        }

        world.stats.shots_fired += 1;
        fx.sound(SoundId::GunFire);
        let origin = ground(player.position);
        let aim = player.facing;
        fx.burst(
            ParticleBurst::new(EffectKind::MuzzleFlash, from_ground(origin + aim * player.radius, 1.0), 3)
                .with_velocity(from_ground(aim * 2.0, 0.0)),
        );

        let margin = config.grid.max_enemy_radius.max(content.max_enemy_radius());
        let target = pick_target(
            grid,
            &world.enemies,
            world.boss.as_ref(),
            origin,
            aim,
            weapon.range,
            config.player.aim_cone_cos,
            margin,
            &mut self.candidates,
        );
        let victim = match target {
            Some(Target::Enemy(handle)) => world.enemies.get_mut(handle),
            Some(Target::Boss) => world.boss.as_mut(),
            None => None,
        };
        let Some(victim) = victim else { return };

        let kill_state = DeathState::from_element(weapon.element);
        let outcome = victim.apply_damage(weapon.damage, kill_state, now, &config.death);
        record_hit(&mut world.stats, outcome.dealt);

        let splash = if victim.armor > 0.3 { EffectKind::Sparks } else { EffectKind::Blood };
        fx.burst(
            ParticleBurst::new(splash, victim.position + Vec3::Y * 0.5, 6).with_velocity(from_ground(aim * 3.0, 1.0)),
        );
        fx.hit(HitKind::Bullet, victim.position, 0.0);
        if outcome.killed {
            fx.sound(death_sound(victim, kill_state));
        } else {
            fx.sound(SoundId::ImpactFlesh);
        }
    }

    fn contact_attacks(&mut self, session: &mut Session, now: Millis) {
        let Session {
            world,
            grid,
            config,
            content,
            sink,
            ..
        } = session;
        let player = &mut world.player;
        if !player.is_alive() || player.driving.is_some() {
            return;
        }

        let mut fx = FxBus::new(&mut world.fx_queue, sink.as_mut());
        let origin = ground(player.position);
        let margin = config.grid.max_enemy_radius.max(content.max_enemy_radius());
        grid.query_radius(origin, player.radius + margin, &mut self.candidates);

        let mut total = 0.0;
        for &handle in self.candidates.iter() {
            if let Some(enemy) = world.enemies.get_mut(handle) {
                total += try_attack(enemy, origin, player.radius, now);
            }
        }
        if let Some(boss) = world.boss.as_mut() {
            total += try_attack(boss, origin, player.radius, now);
        }

        if total > 0.0 {
            let dealt = player.take_damage(total);
            world.stats.damage_taken += dealt as f64;
            fx.sound(SoundId::PlayerHurt);
            fx.hit(HitKind::PlayerHurt, player.position, 0.1);
            fx.burst(ParticleBurst::new(EffectKind::Blood, player.position + Vec3::Y, 4));
            if !player.is_alive() {
                tracing::info!(now, "player died");
            }
        }
    }
}

/// Damage `enemy` deals this frame if it touches the player and its
/// attack deadline has passed.
fn try_attack(enemy: &mut Enemy, player_pos: Vec2, player_radius: f32, now: Millis) -> f32 {
    if !enemy.is_alive() || now < enemy.next_attack_at {
        return 0.0;
    }
    let reach = enemy.radius + player_radius;
    if ground(enemy.position).distance_squared(player_pos) > reach * reach {
        return 0.0;
    }
    enemy.next_attack_at = deadline(now, enemy.attack_cooldown_ms);
    enemy.contact_damage
}

fn record_hit(stats: &mut SessionStats, dealt: f32) {
    stats.shots_hit += 1;
    stats.damage_dealt += dealt as f64;
}

impl System for CombatSystem {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn init(&mut self, session: &mut Session) {
        self.candidates = Vec::with_capacity(session.config.pools.enemies);
        self.weapon = session.content.weapon(&session.world.player.weapon.weapon).cloned();
    }

    fn update(&mut self, session: &mut Session, _dt: f32, now: Millis) {
        if let Some(weapon) = self.weapon.take() {
            if session.world.player.weapon.tick(now, &weapon) {
                session.sink.play_sound(SoundId::Reload);
            }
            let player = &session.world.player;
            if session.input.fire && player.is_alive() && player.driving.is_none() {
                self.fire(session, &weapon, now);
            }
            self.weapon = Some(weapon);
        }

        self.contact_attacks(session, now);
    }
}
