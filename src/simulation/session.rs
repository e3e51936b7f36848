//! Session: the world state plus everything systems borrow while updating it

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::collision::{CollisionResolver, Obstacle};
use crate::content::ContentTables;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{BodyId, Millis};
use crate::effects::{EffectSink, FxBus, FxRequest};
use crate::entity::{Decal, Enemy, EnemyType, LootItem, Particle, Player, Vehicle};
use crate::input::InputSnapshot;
use crate::pool::{InstanceTransform, ObjectPool, PoolHandle, RequestQueue};
use crate::spatial::SpatialGrid;

/// Pending enemy spawn, drained by the spawn system under a per-frame budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub ty: EnemyType,
    pub position: Vec2,
}

/// Running counters for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub spawns: u64,
    pub spawns_dropped: u64,
    pub kills: u64,
    pub boss_kills: u64,
    pub pushes: u64,
    pub knockbacks: u64,
    pub splatters: u64,
    pub shots_fired: u64,
    pub shots_hit: u64,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub obstacle_hits: u64,
    pub crates_broken: u64,
    pub loot_dropped: u64,
    pub loot_collected: u64,
    /// Credited at finalization
    pub xp_awarded: u64,
    /// Picked up from gems
    pub xp_collected: u64,
    pub coins_collected: u64,
    pub fx_delivered: u64,
    pub fx_dropped: u64,
    pub peak_live_enemies: usize,
}

/// Mutable aggregate of everything in the arena
#[derive(Debug)]
pub struct WorldState {
    pub player: Player,
    pub vehicles: Vec<Vehicle>,
    pub enemies: ObjectPool<Enemy>,
    /// Not pooled; stays in `Dead` once finalized
    pub boss: Option<Enemy>,
    pub particles: ObjectPool<Particle>,
    pub decals: ObjectPool<Decal>,
    pub loot: ObjectPool<LootItem>,
    pub obstacles: Vec<Obstacle>,
    pub fx_queue: RequestQueue<FxRequest>,
    pub spawn_queue: RequestQueue<SpawnRequest>,
    /// Instance transforms for vehicles (suspension offset applied)
    pub vehicle_instances: Vec<InstanceTransform>,
    pub boss_instance: InstanceTransform,
    pub stats: SessionStats,
    pub now: Millis,
    pub frame: u64,
}

impl WorldState {
    pub fn new(config: &SimulationConfig, player: Player) -> Self {
        let pools = &config.pools;
        Self {
            player,
            vehicles: Vec::new(),
            enemies: ObjectPool::new("enemies", pools.enemies),
            boss: None,
            particles: ObjectPool::new("particles", pools.particles),
            decals: ObjectPool::new("decals", pools.decals),
            loot: ObjectPool::new("loot", pools.loot),
            obstacles: Vec::new(),
            fx_queue: RequestQueue::new("fx_requests", pools.fx_requests),
            spawn_queue: RequestQueue::new("spawn_requests", pools.spawn_requests),
            vehicle_instances: Vec::new(),
            boss_instance: InstanceTransform::HIDDEN,
            stats: SessionStats::default(),
            now: 0,
            frame: 0,
        }
    }

    pub fn live_enemies(&self) -> usize {
        self.enemies.live()
    }

    /// Enemy by handle, for tests and tools.
    pub fn enemy(&self, handle: PoolHandle) -> Option<&Enemy> {
        self.enemies.get(handle)
    }
}

/// Serializable end-of-run summary
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub frames: u64,
    pub elapsed_ms: Millis,
    pub live_enemies: usize,
    pub live_particles: usize,
    pub live_decals: usize,
    pub live_loot: usize,
    pub player_hp: f32,
    pub player_level: u32,
    pub boss: Option<String>,
    pub stats: SessionStats,
}

/// Exclusive owner of the world state and its collaborators.
///
/// Systems borrow the whole session for one update call.
pub struct Session {
    pub world: WorldState,
    pub grid: SpatialGrid<PoolHandle>,
    pub content: ContentTables,
    pub config: SimulationConfig,
    pub input: InputSnapshot,
    pub resolver: CollisionResolver,
    pub rng: ChaCha8Rng,
    pub sink: Box<dyn EffectSink>,
}

impl Session {
    /// Build a session from validated configuration and content.
    pub fn new(config: SimulationConfig, content: ContentTables, sink: Box<dyn EffectSink>) -> Result<Self> {
        config.validate()?;

        let player = Player::new(&config.player, content.weapon(&config.player.weapon), Vec3::ZERO);
        let world = WorldState::new(&config, player);
        // Cell size must cover the broadest collision query.
        let cell_size = config.grid.cell_size.max(content.max_enemy_radius());
        let grid = SpatialGrid::new(cell_size);
        let resolver = CollisionResolver::with_capacity(config.pools.enemies);
        let rng = ChaCha8Rng::seed_from_u64(config.waves.seed);

        tracing::debug!(
            enemies = config.pools.enemies,
            particles = config.pools.particles,
            cell_size,
            seed = config.waves.seed,
            "session created"
        );

        Ok(Self {
            world,
            grid,
            content,
            config,
            input: InputSnapshot::default(),
            resolver,
            rng,
            sink,
        })
    }

    /// Headless session with built-in content and a discarding sink.
    pub fn headless(config: SimulationConfig) -> Result<Self> {
        Self::new(config, ContentTables::builtin()?, Box::new(crate::effects::NullSink))
    }

    pub fn set_input(&mut self, input: InputSnapshot) {
        self.input = input;
    }

    /// Park a vehicle of `type_key`; returns its index.
    pub fn add_vehicle(&mut self, type_key: &str, position: Vec3) -> Result<usize> {
        let stats = self.content.require_vehicle(type_key)?;
        let index = self.world.vehicles.len();
        let vehicle = Vehicle::from_stats(BodyId::new(index as u32), type_key, stats, position);
        self.world.vehicles.push(vehicle);
        self.world.vehicle_instances.push(InstanceTransform::HIDDEN);
        Ok(index)
    }

    pub fn add_obstacle(&mut self, position: Vec2, radius: f32) {
        self.world.obstacles.push(Obstacle::new(position, radius));
    }

    /// Place a destructible crate. `None` if the loot pool is full.
    pub fn add_crate(&mut self, position: Vec3) -> Option<PoolHandle> {
        self.world.loot.acquire(LootItem::crate_at(position, self.config.loot.crate_hp))
    }

    /// Queue an enemy spawn for the spawn system.
    pub fn request_spawn(&mut self, ty: EnemyType, position: Vec2) -> bool {
        let queued = self.world.spawn_queue.push(SpawnRequest { ty, position });
        if !queued {
            self.world.stats.spawns_dropped += 1;
        }
        queued
    }

    /// Place an enemy immediately, bypassing the spawn queue.
    pub fn spawn_enemy(&mut self, ty: EnemyType, position: Vec3) -> Option<PoolHandle> {
        let stats = self.content.enemy(ty.key())?;
        let enemy = Enemy::spawn(ty, stats, position, self.world.now);
        let handle = self.world.enemies.acquire(enemy);
        match handle {
            Some(_) => self.world.stats.spawns += 1,
            None => self.world.stats.spawns_dropped += 1,
        }
        handle
    }

    /// Effect bus over this session's fx queue and sink.
    pub fn fx(&mut self) -> FxBus<'_> {
        FxBus::new(&mut self.world.fx_queue, self.sink.as_mut())
    }

    pub fn report(&self) -> SessionReport {
        let world = &self.world;
        SessionReport {
            frames: world.frame,
            elapsed_ms: world.now,
            live_enemies: world.enemies.live(),
            live_particles: world.particles.live(),
            live_decals: world.decals.live(),
            live_loot: world.loot.live(),
            player_hp: world.player.hp,
            player_level: world.player.level(),
            boss: world.boss.as_ref().map(|b| format!("{:?}", b.death.state)),
            stats: world.stats.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("now", &self.world.now)
            .field("frame", &self.world.frame)
            .field("live_enemies", &self.world.enemies.live())
            .finish_non_exhaustive()
    }
}
