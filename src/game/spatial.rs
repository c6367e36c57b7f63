//! Spatial hash grid for O(n) collision detection
//!
//! Divides the world into square cells and stores vehicle proxies in each
//! cell. Collision queries only check a cell and its neighbors. The grid is
//! rebuilt from scratch every tick, so it always reflects start-of-tick
//! positions.

#![allow(dead_code)] // Utility methods for spatial queries

use crate::game::state::VehicleId;
use crate::util::vec2::Vec2;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Default cell size (world units).
/// Should be ~2x the maximum vehicle diameter so overlapping pairs always
/// land in the same or an adjacent cell.
pub const GRID_CELL_SIZE: f32 = 256.0;

/// Initial capacity for the cell map (number of expected non-empty cells)
const GRID_INITIAL_CAPACITY: usize = 128;

/// Inline capacity per cell; most cells hold a handful of vehicles
const CELL_INLINE_CAPACITY: usize = 4;

type Cell = SmallVec<[SpatialEntity; CELL_INLINE_CAPACITY]>;

/// Packed cell key: column in the high 32 bits, row in the low 32 bits.
/// A single integer key hashes much faster than a coordinate tuple.
pub type CellKey = i64;

#[inline]
fn pack_key(col: i32, row: i32) -> CellKey {
    ((col as i64) << 32) | (row as i64 & 0xFFFF_FFFF)
}

/// Vehicle proxy stored in the grid
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntity {
    pub id: VehicleId,
    pub position: Vec2,
    pub radius: f32,
}

/// Spatial hash grid for efficient broad-phase collision detection
pub struct SpatialGrid {
    /// Cell size in world units
    cell_size: f32,
    /// Inverse cell size for fast position-to-cell conversion
    inv_cell_size: f32,
    /// Map from packed cell key to entities in that cell
    cells: HashMap<CellKey, Cell>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::with_capacity(GRID_INITIAL_CAPACITY),
        }
    }

    /// Clear all entities, keeping cell allocations for reuse
    #[inline]
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    #[inline]
    fn cell_coords(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x * self.inv_cell_size).floor() as i32,
            (position.y * self.inv_cell_size).floor() as i32,
        )
    }

    #[inline]
    pub fn insert(&mut self, entity: SpatialEntity) {
        let (col, row) = self.cell_coords(entity.position);
        self.cells
            .entry(pack_key(col, row))
            .or_insert_with(Cell::new)
            .push(entity);
    }

    /// Rebuild from an entity iterator (the per-tick path)
    pub fn rebuild(&mut self, entities: impl Iterator<Item = SpatialEntity>) {
        self.clear();
        for e in entities {
            self.insert(e);
        }
    }

    /// Iterate entities in the 3x3 cell block around a position
    pub fn query_radius(
        &self,
        position: Vec2,
        _radius: f32,
    ) -> impl Iterator<Item = &SpatialEntity> {
        let (col, row) = self.cell_coords(position);
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                self.cells
                    .get(&pack_key(col + dx, row + dy))
                    .into_iter()
                    .flat_map(|cell| cell.iter())
            })
        })
    }

    /// Visit each potential collision pair exactly once.
    ///
    /// For every cell: pairs within the cell, then pairs against the right,
    /// bottom, bottom-right and bottom-left neighbors. That half-neighborhood
    /// covers all adjacent cells without ever producing a duplicate pair.
    #[inline]
    pub fn for_each_potential_collision<F>(&self, mut callback: F)
    where
        F: FnMut(SpatialEntity, SpatialEntity),
    {
        for (&key, entities) in &self.cells {
            let col = (key >> 32) as i32;
            let row = key as i32;

            for i in 0..entities.len() {
                for j in (i + 1)..entities.len() {
                    callback(entities[i], entities[j]);
                }
            }

            for (dx, dy) in [(1, 0), (0, 1), (1, 1), (-1, 1)] {
                if let Some(neighbor) = self.cells.get(&pack_key(col + dx, row + dy)) {
                    for entity in entities {
                        for other in neighbor {
                            callback(*entity, *other);
                        }
                    }
                }
            }
        }
    }

    /// Total entities currently stored
    pub fn len(&self) -> usize {
        self.cells.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entity(x: f32, y: f32, radius: f32) -> SpatialEntity {
        SpatialEntity {
            id: Uuid::new_v4(),
            position: Vec2::new(x, y),
            radius,
        }
    }

    #[test]
    fn test_pack_key_distinct() {
        // Negative coordinates must not collide with positive ones
        let keys = [
            pack_key(0, 0),
            pack_key(-1, 0),
            pack_key(0, -1),
            pack_key(-1, -1),
            pack_key(1, 0),
            pack_key(0, 1),
        ];
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                assert_ne!(keys[i], keys[j], "keys {i} and {j} collide");
            }
        }
    }

    #[test]
    fn test_insert_and_query() {
        let mut grid = SpatialGrid::new(256.0);
        let e = entity(100.0, 100.0, 20.0);
        let id = e.id;
        grid.insert(e);

        let results: Vec<_> = grid.query_radius(Vec2::new(100.0, 100.0), 50.0).collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, id);
    }

    #[test]
    fn test_query_finds_neighbor_cells() {
        let mut grid = SpatialGrid::new(256.0);
        grid.insert(entity(250.0, 100.0, 20.0)); // cell (0, 0)
        grid.insert(entity(260.0, 100.0, 20.0)); // cell (1, 0)

        let results: Vec<_> = grid.query_radius(Vec2::new(250.0, 100.0), 50.0).collect();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_clear_keeps_nothing() {
        let mut grid = SpatialGrid::new(256.0);
        grid.insert(entity(100.0, 100.0, 20.0));
        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.query_radius(Vec2::new(100.0, 100.0), 50.0).count(), 0);
    }

    #[test]
    fn test_pairs_same_cell() {
        let mut grid = SpatialGrid::new(256.0);
        grid.insert(entity(100.0, 100.0, 20.0));
        grid.insert(entity(110.0, 100.0, 20.0));

        let mut pairs = 0;
        grid.for_each_potential_collision(|_, _| pairs += 1);
        assert_eq!(pairs, 1);
    }

    #[test]
    fn test_pairs_across_cells_no_duplicates() {
        let mut grid = SpatialGrid::new(256.0);
        grid.insert(entity(100.0, 100.0, 20.0)); // (0, 0)
        grid.insert(entity(110.0, 100.0, 20.0)); // (0, 0)
        grid.insert(entity(300.0, 100.0, 20.0)); // (1, 0)

        let mut pairs = 0;
        grid.for_each_potential_collision(|_, _| pairs += 1);
        // (a,b) in cell + (a,c) and (b,c) across the boundary
        assert_eq!(pairs, 3);
    }

    #[test]
    fn test_diagonal_neighbors_covered() {
        let mut grid = SpatialGrid::new(256.0);
        // Corner-adjacent cells in both diagonal directions
        grid.insert(entity(250.0, 250.0, 20.0)); // (0, 0)
        grid.insert(entity(260.0, 260.0, 20.0)); // (1, 1)
        grid.insert(entity(250.0, 260.0, 20.0)); // (0, 1)
        grid.insert(entity(240.0, 260.0, 20.0)); // still (0, 1)

        let mut seen: Vec<(VehicleId, VehicleId)> = Vec::new();
        grid.for_each_potential_collision(|a, b| {
            let pair = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
            assert!(!seen.contains(&pair), "duplicate pair emitted");
            seen.push(pair);
        });
        // 4 entities, all mutually adjacent: C(4,2) = 6 pairs
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_distant_entities_not_paired() {
        let mut grid = SpatialGrid::new(256.0);
        grid.insert(entity(0.0, 0.0, 20.0));
        grid.insert(entity(4000.0, 4000.0, 20.0));

        let mut pairs = 0;
        grid.for_each_potential_collision(|_, _| pairs += 1);
        assert_eq!(pairs, 0);
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut grid = SpatialGrid::new(256.0);
        grid.insert(entity(0.0, 0.0, 20.0));

        let fresh = [entity(500.0, 500.0, 20.0), entity(510.0, 500.0, 20.0)];
        grid.rebuild(fresh.iter().copied());
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.query_radius(Vec2::ZERO, 50.0).count(), 0);
    }

    #[test]
    fn test_negative_coordinates() {
        let mut grid = SpatialGrid::new(256.0);
        grid.insert(entity(-100.0, -100.0, 20.0));
        grid.insert(entity(-110.0, -100.0, 20.0));

        let mut pairs = 0;
        grid.for_each_potential_collision(|_, _| pairs += 1);
        assert_eq!(pairs, 1);
    }
}
