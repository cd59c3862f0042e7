//! Terrain queries: the read-only contract a collision resolver consumes.
//!
//! [`TerrainQuery`] is the seam between the simulation and whatever owns the
//! level. Implementors supply the grid dimensions and a solidity lookup; the
//! region queries are provided on top of those four methods.

use serde::{Deserialize, Serialize};

use crate::Aabb;
use glam::Vec2;

/// Row/column address of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Row index (0 = top)
    pub row: usize,
    /// Column index (0 = left)
    pub col: usize,
}

impl TileCoord {
    /// Create a tile coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Read-only view of a fixed-size tile grid.
///
/// Cells outside `rows x cols` are never solid. All provided queries visit
/// tiles in row-major order, which callers rely on for deterministic
/// tie-breaking.
pub trait TerrainQuery {
    /// Number of tile rows.
    fn rows(&self) -> usize;

    /// Number of tile columns.
    fn cols(&self) -> usize;

    /// Edge length of one square tile in world units.
    fn tile_size(&self) -> f32;

    /// True if the tile at `(row, col)` blocks movement.
    fn is_solid(&self, row: usize, col: usize) -> bool;

    /// World-space rectangle covered by a tile.
    #[allow(clippy::cast_precision_loss)]
    fn tile_rect(&self, coord: TileCoord) -> Aabb {
        let size = self.tile_size();
        let min = Vec2::new(coord.col as f32 * size, coord.row as f32 * size);
        Aabb::new(min, min + Vec2::splat(size))
    }

    /// World-space rectangle covered by the whole grid.
    #[allow(clippy::cast_precision_loss)]
    fn world_bounds(&self) -> Aabb {
        let size = self.tile_size();
        Aabb::new(
            Vec2::ZERO,
            Vec2::new(self.cols() as f32 * size, self.rows() as f32 * size),
        )
    }

    /// Tiles whose interior overlaps `region`, clipped to the grid, in
    /// row-major order. Tiles that only touch an edge of `region` are excluded.
    fn tiles_overlapping(&self, region: &Aabb) -> Vec<TileCoord> {
        let size = self.tile_size();
        if size <= 0.0 || !region.is_valid() {
            return Vec::new();
        }
        let Some((col_first, col_last)) = span(region.min.x, region.max.x, size, self.cols())
        else {
            return Vec::new();
        };
        let Some((row_first, row_last)) = span(region.min.y, region.max.y, size, self.rows())
        else {
            return Vec::new();
        };

        let mut tiles = Vec::with_capacity((row_last - row_first + 1) * (col_last - col_first + 1));
        for row in row_first..=row_last {
            for col in col_first..=col_last {
                tiles.push(TileCoord::new(row, col));
            }
        }
        tiles
    }

    /// Solid tiles overlapping `region`, in row-major order.
    fn solid_tiles_overlapping(&self, region: &Aabb) -> Vec<TileCoord> {
        self.tiles_overlapping(region)
            .into_iter()
            .filter(|t| self.is_solid(t.row, t.col))
            .collect()
    }

    /// True if any solid tile overlaps `region`.
    fn any_solid_in(&self, region: &Aabb) -> bool {
        self.tiles_overlapping(region)
            .into_iter()
            .any(|t| self.is_solid(t.row, t.col))
    }
}

/// Inclusive index range of cells overlapping the open interval `(lo, hi)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn span(lo: f32, hi: f32, size: f32, count: usize) -> Option<(usize, usize)> {
    if count == 0 {
        return None;
    }
    let first = (lo / size).floor() as i64;
    let last = (hi / size).ceil() as i64 - 1;
    let first = first.max(0);
    let last = last.min(count as i64 - 1);
    if last < first {
        return None;
    }
    Some((first as usize, last as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileGrid;

    fn open_grid() -> TileGrid {
        TileGrid::new(4, 4, 10.0)
    }

    mod span_tests {
        use super::*;

        #[test]
        fn edge_aligned_region_excludes_touching_cells() {
            assert_eq!(span(10.0, 20.0, 10.0, 4), Some((1, 1)));
        }

        #[test]
        fn region_left_of_grid_is_empty() {
            assert_eq!(span(-30.0, -5.0, 10.0, 4), None);
        }

        #[test]
        fn region_is_clipped_to_grid() {
            assert_eq!(span(-5.0, 55.0, 10.0, 4), Some((0, 3)));
        }
    }

    mod region_query_tests {
        use super::*;

        #[test]
        fn tiles_are_row_major() {
            let grid = open_grid();
            let region = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0));
            assert_eq!(
                grid.tiles_overlapping(&region),
                vec![
                    TileCoord::new(0, 0),
                    TileCoord::new(0, 1),
                    TileCoord::new(1, 0),
                    TileCoord::new(1, 1),
                ]
            );
        }

        #[test]
        fn only_solid_tiles_are_reported() {
            let mut grid = open_grid();
            grid.set_solid(1, 1, true);
            let region = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0));
            assert_eq!(grid.solid_tiles_overlapping(&region), vec![TileCoord::new(1, 1)]);
            assert!(grid.any_solid_in(&region));
        }

        #[test]
        fn degenerate_region_overlaps_nothing() {
            let grid = open_grid();
            let region = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(5.0, 15.0));
            assert!(grid.tiles_overlapping(&region).is_empty());
        }

        #[test]
        fn tile_rect_matches_grid_spacing() {
            let grid = open_grid();
            let rect = grid.tile_rect(TileCoord::new(2, 3));
            assert_eq!(rect.min, Vec2::new(30.0, 20.0));
            assert_eq!(rect.max, Vec2::new(40.0, 30.0));
        }

        #[test]
        fn world_bounds_cover_all_tiles() {
            let grid = TileGrid::new(3, 5, 16.0);
            let bounds = grid.world_bounds();
            assert_eq!(bounds.max, Vec2::new(80.0, 48.0));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reported_tiles_overlap_region(
                x in -50.0f32..100.0,
                y in -50.0f32..100.0,
                w in 0.5f32..40.0,
                h in 0.5f32..40.0,
            ) {
                let grid = TileGrid::new(6, 6, 10.0);
                let region = Aabb::from_position_size(Vec2::new(x, y), Vec2::new(w, h));
                for tile in grid.tiles_overlapping(&region) {
                    prop_assert!(tile.row < 6 && tile.col < 6);
                    prop_assert!(grid.tile_rect(tile).intersects(&region));
                }
            }
        }
    }
}
