//! Full-frame sessions through the default system set

use glam::{Vec2, Vec3};
use wreckage::content::ContentTables;
use wreckage::core::config::SimulationConfig;
use wreckage::effects::{RecordingSink, SoundId};
use wreckage::entity::EnemyType;
use wreckage::input::InputSnapshot;
use wreckage::simulation::{install_default_systems, Scheduler, Session};

const DT: f32 = 1.0 / 60.0;

fn quiet_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.waves.interval_ms = 0;
    config
}

fn start(config: SimulationConfig, sink: RecordingSink) -> (Session, Scheduler) {
    let mut session = Session::new(config, ContentTables::builtin().unwrap(), Box::new(sink)).unwrap();
    let mut scheduler = Scheduler::for_session(&session);
    install_default_systems(&mut scheduler, &mut session);
    (session, scheduler)
}

#[test]
fn test_default_systems_run_in_frame_order() {
    let (_session, scheduler) = start(quiet_config(), RecordingSink::new());
    let names: Vec<_> = scheduler.system_names().collect();
    assert_eq!(
        names,
        vec![
            "spawn",
            "player",
            "enemy_movement",
            "spatial_index",
            "combat",
            "collision",
            "lifecycle",
            "loot",
            "fx",
            "transform_sync",
        ]
    );
}

#[test]
fn test_shooting_on_foot_reaches_the_sink() {
    let sink = RecordingSink::new();
    let log = sink.log();
    let (mut session, mut scheduler) = start(quiet_config(), sink);
    session.spawn_enemy(EnemyType::Walker, Vec3::new(0.0, 0.0, 6.0)).unwrap();
    session.set_input(InputSnapshot {
        aim: Vec2::Y,
        fire: true,
        ..InputSnapshot::idle()
    });

    for _ in 0..240 {
        scheduler.update(&mut session, DT);
    }

    let stats = &session.world.stats;
    assert!(stats.shots_fired > 0);
    assert!(stats.shots_hit > 0);
    assert_eq!(stats.kills, 1);
    assert!(log.borrow().sounds_of(SoundId::GunFire) > 0);
    assert!(log.borrow().sounds_of(SoundId::WalkerDeath) >= 1);
    // Corpse and decal made it through the fx queue.
    assert!(stats.fx_delivered > 0);
    assert!(!log.borrow().decals.is_empty());
}

#[test]
fn test_driving_through_a_column_rams_enemies() {
    let (mut session, mut scheduler) = start(quiet_config(), RecordingSink::new());
    session.add_vehicle("buggy", Vec3::new(0.0, 0.0, 1.0)).unwrap();
    for i in 0..8 {
        session.spawn_enemy(EnemyType::Walker, Vec3::new(0.0, 0.0, 30.0 + i as f32 * 2.0));
    }

    session.set_input(InputSnapshot {
        interact: true,
        ..InputSnapshot::idle()
    });
    scheduler.update(&mut session, DT);
    assert_eq!(session.world.player.driving, Some(0));

    session.set_input(InputSnapshot {
        move_axis: Vec2::new(0.0, 1.0),
        ..InputSnapshot::idle()
    });
    for _ in 0..300 {
        scheduler.update(&mut session, DT);
    }

    let stats = &session.world.stats;
    assert!(stats.pushes + stats.knockbacks + stats.splatters > 0);
    assert!(stats.damage_dealt > 0.0);
    assert!(stats.kills > 0);
    assert!(session.world.vehicles[0].position.z > 1.0);
    // The driver rides along.
    assert_eq!(session.world.player.position, session.world.vehicles[0].position);
}

fn scripted_run(seed: u64, frames: usize) -> serde_json::Value {
    let mut config = SimulationConfig::default();
    config.waves.seed = seed;
    config.waves.interval_ms = 1_000;
    let (mut session, mut scheduler) = start(config, RecordingSink::new());
    for frame in 0..frames {
        let angle = frame as f32 * 0.02;
        session.set_input(InputSnapshot {
            move_axis: Vec2::new(0.3, 0.0),
            aim: Vec2::new(angle.sin(), angle.cos()),
            fire: true,
            interact: false,
        });
        scheduler.update(&mut session, DT);
    }
    serde_json::to_value(session.report()).unwrap()
}

#[test]
fn test_same_seed_same_outcome() {
    let a = scripted_run(42, 600);
    let b = scripted_run(42, 600);
    assert_eq!(a, b);
    assert!(a["stats"]["spawns"].as_u64().unwrap() > 0);
}

#[test]
fn test_spawn_budget_and_pool_limits_hold() {
    let mut config = SimulationConfig::default();
    config.waves.interval_ms = 100;
    config.waves.size = 40;
    config.pools.enemies = 64;
    let (mut session, mut scheduler) = start(config, RecordingSink::new());
    for _ in 0..300 {
        scheduler.update(&mut session, DT);
        assert!(session.world.live_enemies() <= 64);
    }
    let stats = &session.world.stats;
    assert!(stats.spawns_dropped > 0);
    assert_eq!(stats.peak_live_enemies, 64);
}

#[test]
fn test_dispose_runs_cleanup() {
    let (mut session, mut scheduler) = start(SimulationConfig::default(), RecordingSink::new());
    for _ in 0..30 {
        scheduler.update(&mut session, DT);
    }
    assert!(!session.grid.is_empty());

    scheduler.dispose(&mut session);
    assert!(scheduler.is_empty());
    assert!(session.grid.is_empty());
    assert_eq!(session.resolver.tracked_pairs(), 0);
    assert!(session.world.boss_instance.is_hidden());

    // A disposed scheduler still advances time but touches nothing.
    let live = session.world.live_enemies();
    scheduler.update(&mut session, DT);
    assert_eq!(session.world.live_enemies(), live);
}

#[test]
fn test_report_serializes() {
    let (mut session, mut scheduler) = start(quiet_config(), RecordingSink::new());
    for _ in 0..10 {
        scheduler.update(&mut session, DT);
    }
    let report = session.report();
    assert_eq!(report.frames, 10);
    assert_eq!(report.elapsed_ms, scheduler.now());
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"peak_live_enemies\""));
    assert!(json.contains("\"player_level\":1"));
}

#[test]
fn test_bad_frame_deltas_do_not_advance_time() {
    let (mut session, mut scheduler) = start(quiet_config(), RecordingSink::new());
    scheduler.update(&mut session, f32::NAN);
    scheduler.update(&mut session, -1.0);
    scheduler.update(&mut session, f32::INFINITY);
    assert_eq!(session.world.now, 0);
    assert_eq!(session.world.frame, 3);
}
