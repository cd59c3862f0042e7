//! In-memory tile grid.
//!
//! [`TileGrid`] is the default [`TerrainQuery`] implementation: a dense
//! row-major array of solid/empty flags. Levels can be built cell by cell,
//! from numeric tile ids (any non-zero id is solid), or from an ASCII layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::query::TerrainQuery;

/// Errors raised while building a [`TileGrid`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// The layout had no rows or no columns.
    #[error("terrain layout is empty")]
    Empty,

    /// A row's length differs from the first row's.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Offending row index
        row: usize,
        /// Column count of the first row
        expected: usize,
        /// Column count of the offending row
        found: usize,
    },

    /// An ASCII layout contained a character other than `#` or `.`.
    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// The unrecognised character
        glyph: char,
    },

    /// Tile size must be a finite positive number.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),
}

/// Dense grid of solid/empty tiles.
///
/// # Example
///
/// ```
/// use strata::{TerrainQuery, TileGrid};
///
/// let grid = TileGrid::from_rows(&[vec![0, 0, 0], vec![1, 3, 1]], 16.0).unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert!(grid.is_solid(1, 1));
/// assert!(!grid.is_solid(0, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tile_size: f32,
    /// Row-major solidity flags, `rows * cols` long.
    solid: Vec<bool>,
}

impl TileGrid {
    /// Create an all-empty grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize, tile_size: f32) -> Self {
        Self {
            rows,
            cols,
            tile_size,
            solid: vec![false; rows * cols],
        }
    }

    /// Build a grid from numeric tile ids, treating every non-zero id as solid.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError`] if the layout is empty, ragged, or the tile
    /// size is not positive.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R], tile_size: f32) -> Result<Self, TerrainError> {
        check_tile_size(tile_size)?;
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.is_empty() || cols == 0 {
            return Err(TerrainError::Empty);
        }

        let mut grid = Self::new(rows.len(), cols, tile_size);
        for (row, ids) in rows.iter().enumerate() {
            let ids = ids.as_ref();
            if ids.len() != cols {
                return Err(TerrainError::RaggedRow {
                    row,
                    expected: cols,
                    found: ids.len(),
                });
            }
            for (col, id) in ids.iter().enumerate() {
                grid.set_solid(row, col, *id != 0);
            }
        }

        debug!(rows = grid.rows, cols = grid.cols, solid = grid.solid_count(), "built tile grid");
        Ok(grid)
    }

    /// Parse an ASCII layout: `#` is solid, `.` is empty, one line per row.
    ///
    /// Leading and trailing whitespace on each line is ignored, and blank
    /// lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError`] on unknown glyphs, ragged rows, an empty
    /// layout, or a non-positive tile size.
    pub fn parse(layout: &str, tile_size: f32) -> Result<Self, TerrainError> {
        let mut rows: Vec<Vec<i32>> = Vec::new();
        for line in layout.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = rows.len();
            let ids = line
                .chars()
                .enumerate()
                .map(|(col, glyph)| match glyph {
                    '#' => Ok(1),
                    '.' => Ok(0),
                    _ => Err(TerrainError::UnknownGlyph { row, col, glyph }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(ids);
        }
        Self::from_rows(&rows, tile_size)
    }

    /// Mark a tile solid or empty. Out-of-range coordinates are ignored.
    pub fn set_solid(&mut self, row: usize, col: usize, solid: bool) {
        if let Some(index) = self.index(row, col) {
            self.solid[index] = solid;
        }
    }

    /// Fill a whole row with solid tiles.
    pub fn fill_row(&mut self, row: usize) {
        for col in 0..self.cols {
            self.set_solid(row, col, true);
        }
    }

    /// Number of solid tiles.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|s| **s).count()
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

fn check_tile_size(tile_size: f32) -> Result<(), TerrainError> {
    if tile_size.is_finite() && tile_size > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::InvalidTileSize(tile_size))
    }
}

impl TerrainQuery for TileGrid {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn is_solid(&self, row: usize, col: usize) -> bool {
        self.index(row, col).is_some_and(|i| self.solid[i])
    }
}
