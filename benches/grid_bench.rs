use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wreckage::core::config::SimulationConfig;
use wreckage::entity::EnemyType;
use wreckage::simulation::{install_default_systems, Scheduler, Session};
use wreckage::spatial::SpatialGrid;

fn scatter(count: usize, extent: f32, seed: u64) -> Vec<(u32, Vec2)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count as u32)
        .map(|i| (i, Vec2::new(rng.gen_range(-extent..extent), rng.gen_range(-extent..extent))))
        .collect()
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_rebuild");
    for &count in &[500_usize, 2000, 8000] {
        let entities = scatter(count, 150.0, 7);
        let mut grid = SpatialGrid::new(10.0);
        grid.rebuild(entities.iter().copied());
        group.bench_with_input(BenchmarkId::from_parameter(count), &entities, |b, entities| {
            b.iter(|| grid.rebuild(black_box(entities.iter().copied())));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_query_radius");
    let entities = scatter(4000, 150.0, 11);
    let mut grid = SpatialGrid::new(10.0);
    grid.rebuild(entities.iter().copied());
    let mut out = Vec::with_capacity(4000);
    for &radius in &[2.0_f32, 5.0, 20.0] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| grid.query_radius(black_box(Vec2::new(3.0, -7.0)), radius, &mut out));
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut config = SimulationConfig::default();
    config.pools.enemies = 2000;
    config.waves.interval_ms = 0;
    let Ok(mut session) = Session::headless(config) else {
        return;
    };
    for (i, (_, p)) in scatter(2000, 80.0, 3).into_iter().enumerate() {
        let ty = if i % 5 == 0 { EnemyType::Tank } else { EnemyType::Walker };
        session.spawn_enemy(ty, Vec3::new(p.x, 0.0, p.y));
    }
    let mut scheduler = Scheduler::for_session(&session);
    install_default_systems(&mut scheduler, &mut session);

    c.bench_function("frame_2000_enemies", |b| {
        b.iter(|| scheduler.update(&mut session, black_box(1.0 / 60.0)));
    });
}

criterion_group!(benches, bench_rebuild, bench_query, bench_frame);
criterion_main!(benches);
