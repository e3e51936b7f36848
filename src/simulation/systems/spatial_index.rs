//! Per-frame grid rebuild

use crate::core::types::{ground, Millis};
use crate::simulation::scheduler::System;
use crate::simulation::session::Session;

/// Rebuilds the enemy grid from scratch every frame. Dying enemies stay in
/// the grid until released; queries filter on state.
#[derive(Debug, Default)]
pub struct SpatialIndexSystem;

impl SpatialIndexSystem {
    pub fn new() -> Self {
        Self
    }
}

impl System for SpatialIndexSystem {
    fn name(&self) -> &'static str {
        "spatial_index"
    }

    fn update(&mut self, session: &mut Session, _dt: f32, _now: Millis) {
        let enemies = &session.world.enemies;
        session
            .grid
            .rebuild(enemies.iter().map(|(handle, enemy)| (handle, ground(enemy.position))));

        let stats = &mut session.world.stats;
        stats.peak_live_enemies = stats.peak_live_enemies.max(session.world.enemies.live());
    }

    fn cleanup(&mut self, session: &mut Session) {
        session.grid.clear();
    }
}
