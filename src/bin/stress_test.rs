use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use wreckage::core::config::SimulationConfig;
use wreckage::entity::EnemyType;
use wreckage::input::InputSnapshot;
use wreckage::simulation::{install_default_systems, Scheduler, Session};

const ENEMIES: usize = 4000;
const FRAMES: usize = 600;
const DT: f32 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wreckage=warn")),
        )
        .init();

    println!("=== STRESS TEST: {} enemies, {} frames ===\n", ENEMIES, FRAMES);

    let mut config = SimulationConfig::default();
    config.pools.enemies = ENEMIES;
    config.pools.particles = 8192;
    config.pools.fx_requests = 1024;
    config.waves.interval_ms = 0;

    let mut session = match Session::headless(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("failed to build session: {e}");
            std::process::exit(1);
        }
    };

    // 40 clusters of 100 in a ring, 10x10 lattice 1.5 units apart
    println!("Spawning {} enemies in 40 clusters...", ENEMIES);
    let kinds = [EnemyType::Walker, EnemyType::Runner, EnemyType::Tank];
    for i in 0..ENEMIES {
        let cluster = i / 100;
        let angle = cluster as f32 * std::f32::consts::TAU / 40.0;
        let center = Vec2::new(angle.cos(), angle.sin()) * 60.0;
        let local = Vec2::new((i % 10) as f32 * 1.5, ((i % 100) / 10) as f32 * 1.5);
        let p = center + local;
        session.spawn_enemy(kinds[i % kinds.len()], Vec3::new(p.x, 0.0, p.y));
    }
    if let Err(e) = session.add_vehicle("truck", Vec3::new(0.0, 0.0, -5.0)) {
        eprintln!("failed to add vehicle: {e}");
        std::process::exit(1);
    }

    let mut scheduler = Scheduler::for_session(&session);
    install_default_systems(&mut scheduler, &mut session);

    let mut frame_times = Vec::with_capacity(FRAMES);
    for frame in 0..FRAMES {
        // Walk toward the truck, pressing interact until seated.
        let input = match session.world.player.driving {
            None => InputSnapshot {
                move_axis: Vec2::new(0.0, -1.0),
                interact: true,
                ..InputSnapshot::idle()
            },
            Some(_) => InputSnapshot {
                move_axis: Vec2::new(0.35, 1.0),
                ..InputSnapshot::idle()
            },
        };
        session.set_input(input);

        let start = Instant::now();
        scheduler.update(&mut session, DT);
        let elapsed = start.elapsed();
        frame_times.push(elapsed);

        if frame % 60 == 59 {
            let stats = &session.world.stats;
            println!(
                "Frame {:>4}: {:>9.2?} | live {:>5} | kills {:>5} | splatters {:>4} | particles {:>5}",
                frame + 1,
                elapsed,
                session.world.enemies.live(),
                stats.kills,
                stats.splatters,
                session.world.particles.live()
            );
        }
    }

    let total: Duration = frame_times.iter().sum();
    let avg = total / FRAMES as u32;
    let min = frame_times.iter().min().copied().unwrap_or_default();
    let max = frame_times.iter().max().copied().unwrap_or_default();
    let budget = Duration::from_secs_f32(DT);
    let over = frame_times.iter().filter(|t| **t > budget).count();

    println!("\n=== Performance Summary ===");
    println!("Total time:   {:?}", total);
    println!("Avg frame:    {:?}", avg);
    println!("Min frame:    {:?}", min);
    println!("Max frame:    {:?}", max);
    println!("Over budget:  {}/{} frames ({:?})", over, FRAMES, budget);
    println!("Frames/sec:   {:.1}", 1.0 / avg.as_secs_f64());

    println!("\n=== Pool Usage ===");
    let world = &session.world;
    for (label, live, created, capacity, dropped) in [
        (world.enemies.label(), world.enemies.live(), world.enemies.slots_created(), world.enemies.capacity(), world.enemies.dropped()),
        (world.particles.label(), world.particles.live(), world.particles.slots_created(), world.particles.capacity(), world.particles.dropped()),
        (world.decals.label(), world.decals.live(), world.decals.slots_created(), world.decals.capacity(), world.decals.dropped()),
        (world.loot.label(), world.loot.live(), world.loot.slots_created(), world.loot.capacity(), world.loot.dropped()),
    ] {
        println!("  {:<10} live {:>5} | high-water {:>5}/{:<5} | dropped {}", label, live, created, capacity, dropped);
    }
}
