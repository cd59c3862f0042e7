//! # Strata
//!
//! Tile-grid terrain substrate for 2D collision queries.
//!
//! Strata represents static level geometry as a fixed-size grid of square
//! tiles, each either solid or empty. It answers the questions a collision
//! resolver needs:
//!
//! - **Point lookups**: is the tile at `(row, col)` solid?
//! - **Region queries**: which tiles does a rectangle overlap, in row-major order?
//! - **Geometry**: world-space rectangle of a tile and of the whole grid
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec2;
//! use strata::{Aabb, TerrainQuery, TileGrid};
//!
//! let grid = TileGrid::parse(
//!     "....\n\
//!      ....\n\
//!      #####",
//!     16.0,
//! )
//! .unwrap();
//!
//! // A 10x10 box resting just above the floor row touches nothing solid.
//! let body = Aabb::from_position_size(Vec2::new(4.0, 22.0), Vec2::new(10.0, 10.0));
//! assert!(!grid.any_solid_in(&body));
//!
//! // Push it two units down and it overlaps the floor.
//! let sunk = body.translated(Vec2::new(0.0, 2.0));
//! assert!(grid.any_solid_in(&sunk));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod query;

// Re-exports for convenience
pub use grid::{TerrainError, TileGrid};
pub use query::{TerrainQuery, TileCoord};

use glam::Vec2;

/// Axis-aligned rectangle in world space.
///
/// Screen-space convention: `min` is the top-left corner, `max` the
/// bottom-right, and y grows downward. Edges are treated as open, so two
/// rectangles that merely share an edge do not intersect.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a rectangle from its two corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from a top-left position and a size.
    #[must_use]
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Left edge x coordinate.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    /// Right edge x coordinate.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    /// Top edge y coordinate.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    /// Bottom edge y coordinate.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// True if both extents are strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Return a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Overlap extent on each axis.
    ///
    /// Components are positive only where the rectangles overlap on that
    /// axis; a zero or negative component means they are separated (or just
    /// touching) along it.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Vec2 {
        let x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        Vec2::new(x, y)
    }

    /// True if the rectangles share interior area.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}
