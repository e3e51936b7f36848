//! Uniform bucket grid for ground-plane proximity queries
//!
//! Buckets are keyed by `(floor(x / cell), floor(z / cell))` and rebuilt from
//! scratch every frame. Bucket vectors are cleared rather than dropped, so a
//! steady-state rebuild performs no allocation.

use ahash::{AHashMap, RandomState};
use glam::Vec2;

/// Buckets left empty after a rebuild are discarded once they outnumber
/// occupied ones by this factor (entities roamed far away).
const STALE_BUCKET_FACTOR: usize = 4;
const MIN_RETAINED_BUCKETS: usize = 256;

/// Fixed hasher seeds: the map-walk query path yields buckets in hash
/// order, which must not vary between runs.
const BUCKET_SEEDS: [u64; 4] = [0x243f_6a88_85a3_08d3, 0x1319_8a2e_0370_7344, 0xa409_3822_299f_31d0, 0x082e_fa98_ec4e_6c89];

/// Uniform grid over the ground plane for broad-phase queries
#[derive(Debug, Clone)]
pub struct SpatialGrid<K> {
    cell_size: f32,
    inv_cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<K>>,
    len: usize,
}

impl<K: Copy> SpatialGrid<K> {
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            tracing::warn!("Invalid grid cell size {}, falling back to 1.0", cell_size);
            1.0
        };
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: AHashMap::with_hasher(RandomState::with_seeds(
                BUCKET_SEEDS[0],
                BUCKET_SEEDS[1],
                BUCKET_SEEDS[2],
                BUCKET_SEEDS[3],
            )),
            len: 0,
        }
    }

    #[inline]
    pub fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x * self.inv_cell_size).floor() as i32,
            (pos.y * self.inv_cell_size).floor() as i32,
        )
    }

    /// Number of bucket rings a query of radius `r` has to sweep.
    #[inline]
    pub fn rings_for(&self, radius: f32) -> i32 {
        if radius.is_nan() || radius <= 0.0 {
            0
        } else {
            (radius * self.inv_cell_size).ceil().min(i32::MAX as f32 / 2.0) as i32
        }
    }

    /// Empty every bucket, keeping their storage.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.len = 0;
    }

    pub fn insert(&mut self, key: K, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(key);
        self.len += 1;
    }

    /// Rebuild from the live entity set. Each entity lands in exactly one
    /// bucket.
    pub fn rebuild(&mut self, entities: impl IntoIterator<Item = (K, Vec2)>) {
        self.clear();
        for (key, pos) in entities {
            self.insert(key, pos);
        }

        let occupied = self.cells.values().filter(|b| !b.is_empty()).count();
        if self.cells.len() > MIN_RETAINED_BUCKETS.max(occupied * STALE_BUCKET_FACTOR) {
            self.cells.retain(|_, bucket| !bucket.is_empty());
        }
    }

    /// Broad phase: write every entity in the buckets within
    /// `ceil(radius / cell_size)` rings of `center` into `out`.
    ///
    /// Candidates are unfiltered; callers run the exact distance check.
    /// Returns the number of candidates written.
    pub fn query_radius(&self, center: Vec2, radius: f32, out: &mut Vec<K>) -> usize {
        out.clear();
        if self.len == 0 {
            return 0;
        }

        let (cx, cy) = self.cell_coord(center);
        let rings = self.rings_for(radius);

        // Sweeping more buckets than exist: walk the map instead.
        let span = (2 * rings as i64 + 1).pow(2);
        if span > self.cells.len() as i64 {
            for (&(x, y), bucket) in &self.cells {
                if (x as i64 - cx as i64).abs() <= rings as i64 && (y as i64 - cy as i64).abs() <= rings as i64 {
                    out.extend_from_slice(bucket);
                }
            }
            return out.len();
        }

        for dx in -rings..=rings {
            for dy in -rings..=rings {
                if let Some(bucket) = self.cells.get(&(cx.wrapping_add(dx), cy.wrapping_add(dy))) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.len()
    }

    /// Query entities in the 3x3 neighbourhood of `center`
    pub fn query_neighbors(&self, center: Vec2, out: &mut Vec<K>) -> usize {
        self.query_radius(center, self.cell_size, out)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Entities inserted since the last rebuild.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_coord_floors_negative_positions() {
        let grid: SpatialGrid<u32> = SpatialGrid::new(10.0);
        assert_eq!(grid.cell_coord(Vec2::new(5.0, 5.0)), (0, 0));
        assert_eq!(grid.cell_coord(Vec2::new(-0.5, 19.9)), (-1, 1));
        assert_eq!(grid.cell_coord(Vec2::new(-10.0, -10.1)), (-1, -2));
    }

    #[test]
    fn test_empty_grid_returns_nothing() {
        let grid: SpatialGrid<u32> = SpatialGrid::new(10.0);
        let mut out = vec![99];
        assert_eq!(grid.query_radius(Vec2::ZERO, 50.0, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_rebuild_replaces_previous_frame() {
        let mut grid = SpatialGrid::new(10.0);
        grid.rebuild([(1u32, Vec2::new(1.0, 1.0)), (2, Vec2::new(50.0, 50.0))]);
        grid.rebuild([(3u32, Vec2::new(2.0, 2.0))]);
        assert_eq!(grid.len(), 1);

        let mut out = Vec::new();
        grid.query_radius(Vec2::ZERO, 100.0, &mut out);
        assert_eq!(out, vec![3]);
    }

    #[test]
    fn test_rings_follow_radius() {
        let grid: SpatialGrid<u32> = SpatialGrid::new(10.0);
        assert_eq!(grid.rings_for(0.0), 0);
        assert_eq!(grid.rings_for(-3.0), 0);
        assert_eq!(grid.rings_for(f32::NAN), 0);
        assert_eq!(grid.rings_for(5.0), 1);
        assert_eq!(grid.rings_for(10.0), 1);
        assert_eq!(grid.rings_for(10.5), 2);
    }

    #[test]
    fn test_query_skips_far_buckets() {
        let mut grid = SpatialGrid::new(10.0);
        grid.rebuild([
            (1u32, Vec2::new(1.0, 1.0)),
            (2, Vec2::new(12.0, 1.0)),
            (3, Vec2::new(95.0, 95.0)),
        ]);
        let mut out = Vec::new();
        grid.query_radius(Vec2::new(1.0, 1.0), 5.0, &mut out);
        out.sort();
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn test_stale_buckets_are_compacted() {
        let mut grid = SpatialGrid::new(1.0);
        grid.rebuild((0..1000u32).map(|i| (i, Vec2::new(i as f32 * 3.0, 0.0))));
        assert_eq!(grid.bucket_count(), 1000);
        grid.rebuild([(0u32, Vec2::ZERO)]);
        assert_eq!(grid.bucket_count(), 1);
    }
}
