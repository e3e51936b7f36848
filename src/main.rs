//! Headless session runner
//!
//! Runs a scripted session (shoot on foot, then take the buggy and ram
//! through the horde) and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use glam::{Vec2, Vec3};
use tracing_subscriber::EnvFilter;
use wreckage::content::ContentTables;
use wreckage::core::config::SimulationConfig;
use wreckage::core::error::Result;
use wreckage::effects::NullSink;
use wreckage::input::InputSnapshot;
use wreckage::simulation::{install_default_systems, Scheduler, Session};

/// Headless simulation driver
#[derive(Parser, Debug)]
#[command(name = "wreckage")]
#[command(about = "Run a scripted headless session and report the outcome")]
struct Args {
    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Wave RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Content tables TOML (defaults to the built-in tables)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Frame at which the scripted driver walks to the buggy
const ON_FOOT_FRAMES: u64 = 600;

fn scripted_input(session: &Session, frame: u64) -> InputSnapshot {
    let player = &session.world.player;
    if frame < ON_FOOT_FRAMES {
        // Turn slowly while firing.
        let angle = frame as f32 * 0.01;
        return InputSnapshot {
            move_axis: Vec2::ZERO,
            aim: Vec2::new(angle.sin(), angle.cos()),
            fire: true,
            interact: false,
        };
    }
    match player.driving {
        None => {
            let Some(vehicle) = session.world.vehicles.first() else {
                return InputSnapshot::idle();
            };
            let to_vehicle = Vec2::new(vehicle.position.x - player.position.x, vehicle.position.z - player.position.z);
            InputSnapshot {
                move_axis: to_vehicle.normalize_or_zero(),
                interact: to_vehicle.length() < session.config.player.enter_radius * 0.5,
                ..InputSnapshot::idle()
            }
        }
        // Full throttle with a gentle, periodically reversing turn.
        Some(_) => InputSnapshot {
            move_axis: Vec2::new(((frame / 240) % 2) as f32 * 0.8 - 0.4, 1.0),
            ..InputSnapshot::idle()
        },
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wreckage=info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.waves.seed = seed;
    }
    let content = match &args.content {
        Some(path) => ContentTables::load(path)?,
        None => ContentTables::builtin()?,
    };

    let mut session = Session::new(config, content, Box::new(NullSink))?;
    session.add_vehicle("buggy", Vec3::new(4.0, 0.0, -3.0))?;
    for (x, z, r) in [(15.0, 10.0, 2.0), (-12.0, 18.0, 3.0), (20.0, -20.0, 2.5)] {
        session.add_obstacle(Vec2::new(x, z), r);
    }
    for i in 0..6 {
        let angle = i as f32 * std::f32::consts::TAU / 6.0;
        session.add_crate(Vec3::new(angle.cos() * 12.0, 0.0, angle.sin() * 12.0));
    }

    let mut scheduler = Scheduler::for_session(&session);
    install_default_systems(&mut scheduler, &mut session);
    tracing::info!(frames = args.frames, dt = args.dt, "session started");

    for frame in 0..args.frames {
        let input = scripted_input(&session, frame);
        session.set_input(input);
        scheduler.update(&mut session, args.dt);
        if !session.world.player.is_alive() {
            tracing::info!(frame, "player down, stopping early");
            break;
        }
    }

    scheduler.dispose(&mut session);
    let report = session.report();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let stats = &report.stats;
        println!("=== WRECKAGE SESSION ===");
        println!("Frames:        {}", report.frames);
        println!("Elapsed:       {:.1}s", report.elapsed_ms as f64 / 1000.0);
        println!("Player HP:     {:.0} (level {})", report.player_hp, report.player_level);
        println!("Kills:         {} (boss {})", stats.kills, stats.boss_kills);
        println!(
            "Rams:          {} push / {} knockback / {} splatter",
            stats.pushes, stats.knockbacks, stats.splatters
        );
        println!("Shots:         {} fired, {} hit", stats.shots_fired, stats.shots_hit);
        println!("Spawns:        {} ({} dropped)", stats.spawns, stats.spawns_dropped);
        println!("XP:            {} awarded, {} from gems", stats.xp_awarded, stats.xp_collected);
        println!("Loot:          {} dropped, {} collected", stats.loot_dropped, stats.loot_collected);
        println!("Fx:            {} delivered, {} dropped", stats.fx_delivered, stats.fx_dropped);
        println!("Live enemies:  {} (peak {})", report.live_enemies, stats.peak_live_enemies);
        if let Some(boss) = &report.boss {
            println!("Boss:          {}", boss);
        }
    }

    Ok(())
}
