//! Death finalization, grace timing and slot recycling across frames

use glam::Vec3;
use wreckage::collision::{CollisionResolver, ImpactBody, TargetKey};
use wreckage::content::ContentTables;
use wreckage::core::config::{DeathTuning, SimulationConfig};
use wreckage::core::types::BodyId;
use wreckage::effects::{EffectKind, FxBus, FxRequest, RecordingSink};
use wreckage::entity::{DeathState, Enemy, EnemyType};
use wreckage::pool::{ObjectPool, RequestQueue};
use wreckage::simulation::systems::{finalize, LifecycleSystem, TransformSyncSystem};
use wreckage::simulation::{Scheduler, Session};

#[derive(Debug, Default, PartialEq)]
struct Drained {
    debris: usize,
    gore: usize,
    other_bursts: usize,
    decals: usize,
}

fn drain(queue: &mut RequestQueue<FxRequest>) -> Drained {
    let mut out = Drained::default();
    while let Some(request) = queue.pop() {
        match request {
            FxRequest::Particles(b) if b.kind == EffectKind::Debris => out.debris += 1,
            FxRequest::Particles(b) if b.kind == EffectKind::Gore => out.gore += 1,
            FxRequest::Particles(_) => out.other_bursts += 1,
            FxRequest::Decal(_) => out.decals += 1,
        }
    }
    out
}

fn walker(position: Vec3) -> Enemy {
    let content = ContentTables::builtin().unwrap();
    Enemy::spawn(EnemyType::Walker, content.enemy("walker").unwrap(), position, 0)
}

#[test]
fn test_exploded_finalize_twice_fires_once() {
    let mut queue = RequestQueue::new("fx", 64);
    let mut sink = RecordingSink::new();
    let mut enemy = walker(Vec3::ZERO);
    enemy.force_kill(DeathState::Exploded, 0, &DeathTuning::default());

    let (first, second) = {
        let mut fx = FxBus::new(&mut queue, &mut sink);
        (finalize(&mut enemy, &mut fx), finalize(&mut enemy, &mut fx))
    };
    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(enemy.death.state, DeathState::Dead);
    assert_eq!(
        drain(&mut queue),
        Drained {
            debris: 1,
            gore: 1,
            other_bursts: 0,
            decals: 1
        }
    );
}

#[test]
fn test_finalize_after_splatter_adds_nothing_visual() {
    let config = SimulationConfig::default();
    let mut queue = RequestQueue::new("fx", 64);
    let mut sink = RecordingSink::new();
    let mut enemy = walker(Vec3::new(1.0, 0.0, 0.0));
    let mut slots: ObjectPool<()> = ObjectPool::new("slots", 1);
    let handle = slots.acquire(()).unwrap();
    let body = ImpactBody {
        id: BodyId(0),
        position: Vec3::ZERO,
        velocity: Vec3::new(15.0, 0.0, 0.0),
        mass: 12.0,
        max_speed: 18.0,
        collision_damage_multiplier: 1.0,
        knockback_constant: 9.0,
    };

    let mut resolver = CollisionResolver::new();
    {
        let mut fx = FxBus::new(&mut queue, &mut sink);
        resolver.resolve_impact(&body, TargetKey::Enemy(handle), &mut enemy, 0, &config, &mut fx);
    }
    let at_impact = drain(&mut queue);
    assert_eq!(at_impact.debris, 1);
    assert_eq!(at_impact.decals, 1);

    let reward = {
        let mut fx = FxBus::new(&mut queue, &mut sink);
        let reward = finalize(&mut enemy, &mut fx);
        finalize(&mut enemy, &mut fx);
        reward
    };
    // The reward is still paid out once.
    assert!(reward.is_some());
    assert_eq!(drain(&mut queue), Drained::default());
}

fn lifecycle_session() -> (Session, Scheduler) {
    let mut session = Session::headless(SimulationConfig::default()).unwrap();
    let mut scheduler = Scheduler::for_session(&session);
    scheduler.add_system(&mut session, Box::new(LifecycleSystem::new()));
    scheduler.add_system(&mut session, Box::new(TransformSyncSystem::new()));
    (session, scheduler)
}

#[test]
fn test_release_waits_for_grace_period() {
    let (mut session, mut scheduler) = lifecycle_session();
    let handle = session.spawn_enemy(EnemyType::Walker, Vec3::new(3.0, 0.0, 3.0)).unwrap();
    let tuning = session.config.death.clone();
    session.world.enemies.get_mut(handle).unwrap().force_kill(DeathState::Shot, 0, &tuning);

    let mut previous = 0;
    let released_at = loop {
        let now = scheduler.update(&mut session, 0.1);
        if session.world.enemy(handle).is_none() {
            break now;
        }
        previous = now;
        assert!(now < 5_000, "enemy never released");
    };
    assert!(released_at >= tuning.standard_grace_ms);
    assert!(previous < tuning.standard_grace_ms);
    assert_eq!(session.world.stats.kills, 1);
    assert_eq!(session.world.player.xp, 1);
    assert_eq!(session.world.stats.xp_awarded, 1);
}

#[test]
fn test_exploded_enemies_use_lean_grace() {
    let (mut session, mut scheduler) = lifecycle_session();
    let handle = session.spawn_enemy(EnemyType::Runner, Vec3::ZERO).unwrap();
    let tuning = session.config.death.clone();
    session.world.enemies.get_mut(handle).unwrap().force_kill(DeathState::Exploded, 0, &tuning);

    for _ in 0..4 {
        scheduler.update(&mut session, 0.1);
    }
    assert!(session.world.enemy(handle).is_some());
    for _ in 0..2 {
        scheduler.update(&mut session, 0.1);
    }
    assert!(session.world.enemy(handle).is_none());
}

#[test]
fn test_released_slot_is_reused_clean() {
    let (mut session, mut scheduler) = lifecycle_session();
    let old = session.spawn_enemy(EnemyType::Tank, Vec3::new(2.0, 0.0, 0.0)).unwrap();
    let tuning = session.config.death.clone();
    session.world.enemies.get_mut(old).unwrap().force_kill(DeathState::Burning, 0, &tuning);
    for _ in 0..25 {
        scheduler.update(&mut session, 0.1);
    }
    assert!(session.world.enemy(old).is_none());
    assert!(session.world.enemies.instance_transforms()[old.index() as usize].is_hidden());

    let new = session.spawn_enemy(EnemyType::Walker, Vec3::new(-2.0, 0.0, 0.0)).unwrap();
    assert_eq!(new.index(), old.index());
    assert_ne!(new.generation(), old.generation());
    assert!(session.world.enemy(old).is_none());

    let fresh = session.world.enemy(new).unwrap();
    assert_eq!(fresh.ty(), EnemyType::Walker);
    assert_eq!(fresh.hp, fresh.max_hp);
    assert!(fresh.is_alive());
    assert_eq!(fresh.death.since, None);
    assert!(!fresh.death.fired.ash);
    assert!(!fresh.death.fired.rewarded);
    assert_eq!(fresh.spawned_at, session.world.now);
}

#[test]
fn test_boss_stays_dead_and_hidden() {
    let (mut session, mut scheduler) = lifecycle_session();
    let stats = session.content.enemy("boss").unwrap().clone();
    let mut boss = Enemy::spawn(EnemyType::Boss, &stats, Vec3::new(0.0, 0.0, 10.0), 0);
    let tuning = session.config.death.clone();
    boss.force_kill(DeathState::Shot, 0, &tuning);
    session.world.boss = Some(boss);

    scheduler.update(&mut session, 0.1);
    assert!(!session.world.boss_instance.is_hidden());

    // The boss lingers for its own, longer grace period.
    for _ in 0..35 {
        scheduler.update(&mut session, 0.1);
    }
    assert!(session.world.boss.as_ref().unwrap().death.state.is_dying());
    for _ in 0..10 {
        scheduler.update(&mut session, 0.1);
    }
    let boss = session.world.boss.as_ref().unwrap();
    assert_eq!(boss.death.state, DeathState::Dead);
    assert_eq!(session.world.stats.boss_kills, 1);
    assert_eq!(session.world.stats.kills, 1);
    assert!(session.world.boss_instance.is_hidden());
    assert_eq!(session.world.loot.live(), 8);
    assert_eq!(session.world.player.xp, 100);

    for _ in 0..10 {
        scheduler.update(&mut session, 0.1);
    }
    assert_eq!(session.world.stats.boss_kills, 1);
    assert!(session.world.boss.is_some());
}

#[test]
fn test_alive_enemies_are_never_released() {
    let (mut session, mut scheduler) = lifecycle_session();
    let handle = session.spawn_enemy(EnemyType::Walker, Vec3::ZERO).unwrap();
    for _ in 0..50 {
        scheduler.update(&mut session, 0.1);
    }
    assert!(session.world.enemy(handle).unwrap().is_alive());
    assert_eq!(session.world.stats.kills, 0);
}
