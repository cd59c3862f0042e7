//! Collision resolver: motion integration against static tile terrain.
//!
//! The `CollisionResolver` runs once per entity per tick:
//! 1. Gravity while airborne, friction while grounded (not while dashing)
//! 2. Integration: `position += velocity`
//! 3. Penetration resolution against solid tiles, nearest tile first
//! 4. Ground sensor probe when nothing was landed on; a hit pulls the feet
//!    down onto the sensed surface
//! 5. Optional clamp to the terrain's horizontal extent
//!
//! # Side Disambiguation
//!
//! The entity's collider at the start of the tick decides which side of a
//! tile it came from. A body whose previous bottom was at or above the tile
//! top landed on it; one whose previous left edge was at or right of the
//! tile's right edge ran into it from the right, and so on. When both a
//! vertical and a horizontal side qualify the axis with the smaller overlap
//! wins. A penetration with no qualifying side reverts the whole move.

use bitflags::bitflags;
use glam::Vec2;
use strata::{Aabb, TerrainQuery};
use tracing::{trace, warn};

use crate::config::{PhysicsConfig, SimConfig};
use crate::entity::Entity;
use crate::state::ActionState;

/// Upper bound on resolution passes per tick.
pub const MAX_PASSES: usize = 4;

/// Slack when comparing previous edges against tile edges.
const CONTACT_EPSILON: f32 = 1e-3;

bitflags! {
    /// Sides of the entity that touched terrain this tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sides: u8 {
        /// Landed on a tile top.
        const BOTTOM = 1;
        /// Bumped a tile bottom.
        const TOP = 1 << 1;
        /// Ran into a tile on the left.
        const LEFT = 1 << 2;
        /// Ran into a tile on the right.
        const RIGHT = 1 << 3;
    }
}

/// What happened to an entity during collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contact {
    /// Sides that were resolved against a tile.
    pub sides: Sides,
    /// A penetration had no determinable side and the move was reverted.
    pub unresolved: bool,
    /// The entity was pushed back inside the world's horizontal extent.
    pub clamped: bool,
}

/// Resolver for motion integration and tile collisions.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use strata::TileGrid;
/// use emberfall_core::config::{ActorProfile, SimConfig};
/// use emberfall_core::entity::{Entity, EntityId, EntityKind};
/// use emberfall_core::resolver::CollisionResolver;
///
/// let mut terrain = TileGrid::new(4, 4, 16.0);
/// terrain.fill_row(3);
///
/// let mut profile = ActorProfile::enemy();
/// profile.size = Vec2::new(10.0, 10.0);
/// let mut e = Entity::new(EntityId::new(0), EntityKind::Enemy, profile, Vec2::new(4.0, 30.0));
///
/// let resolver = CollisionResolver::new(&SimConfig::default());
/// for _ in 0..20 {
///     e.body.snapshot();
///     resolver.resolve(&mut e, &terrain);
/// }
/// assert!(e.body.on_ground);
/// assert_eq!(e.bounding_box().bottom(), 48.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    physics: PhysicsConfig,
}

impl CollisionResolver {
    /// Creates a collision resolver from the simulation tuning.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            physics: config.physics.clone(),
        }
    }

    /// Advances `entity` one tick and resolves it against `terrain`.
    ///
    /// The caller snapshots `previous_position` before the tick's first write.
    pub fn resolve(&self, entity: &mut Entity, terrain: &impl TerrainQuery) -> Contact {
        let id = entity.id();
        let dashing = entity.state() == ActionState::Dashing;
        let dead = entity.state() == ActionState::Death;
        let p = &self.physics;
        let body = &mut entity.body;

        if !body.on_ground {
            body.velocity.y = (body.velocity.y + p.gravity).min(p.max_fall_speed);
        }
        if body.on_ground && !dashing {
            body.velocity.x *= p.friction;
            if body.velocity.x.abs() < p.velocity_epsilon {
                body.velocity.x = 0.0;
            }
        }
        if dead {
            body.velocity.x = 0.0;
        }
        body.position += body.velocity;

        let mut contact = Contact::default();
        let mut settled = false;
        for _ in 0..MAX_PASSES {
            let Some((tile, overlap)) = nearest_solid(terrain, &body.bounding_box()) else {
                settled = true;
                break;
            };
            let Some(side) = classify(&body.previous_box(), &tile, overlap) else {
                break;
            };
            if side == Sides::BOTTOM {
                body.position.y = tile.top() - body.size.y;
                body.velocity.y = 0.0;
                body.on_ground = true;
            } else if side == Sides::TOP {
                body.position.y = tile.bottom();
                body.velocity.y = 0.0;
            } else {
                body.position.x = body.previous_position.x;
                body.velocity.x = 0.0;
            }
            trace!(entity = %id, ?side, "terrain contact");
            contact.sides |= side;
        }

        if !settled {
            warn!(
                entity = %id,
                position = ?body.position,
                previous = ?body.previous_position,
                "unresolvable terrain penetration, reverting move"
            );
            body.position = body.previous_position;
            contact.unresolved = true;
        }

        if !contact.sides.contains(Sides::BOTTOM) && !contact.unresolved {
            let feet = body.bounding_box();
            let sensor = Aabb::new(
                Vec2::new(feet.left(), feet.bottom()),
                Vec2::new(feet.right(), feet.bottom() + p.ground_sensor_depth),
            );
            let surface = if body.velocity.y >= 0.0 {
                surface_top(terrain, &sensor)
            } else {
                None
            };
            body.on_ground = surface.is_some();
            if let Some(top) = surface {
                body.position.y = top - body.size.y;
                body.velocity.y = 0.0;
            }
        }

        if p.clamp_to_world {
            contact.clamped = clamp_horizontal(entity, &terrain.world_bounds());
        }
        contact
    }
}

/// Highest solid tile top under the sensor band, if any.
fn surface_top(terrain: &impl TerrainQuery, sensor: &Aabb) -> Option<f32> {
    terrain
        .solid_tiles_overlapping(sensor)
        .into_iter()
        .map(|coord| terrain.tile_rect(coord).top())
        .reduce(f32::min)
}

/// Solid tile needing the smallest push to clear, with its overlap.
///
/// Ties keep the first tile in row-major order.
fn nearest_solid(terrain: &impl TerrainQuery, region: &Aabb) -> Option<(Aabb, Vec2)> {
    let mut best: Option<(Aabb, Vec2, f32)> = None;
    for coord in terrain.solid_tiles_overlapping(region) {
        let tile = terrain.tile_rect(coord);
        let overlap = region.overlap(&tile);
        if overlap.x <= 0.0 || overlap.y <= 0.0 {
            continue;
        }
        let distance = overlap.x.min(overlap.y);
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((tile, overlap, distance));
        }
    }
    best.map(|(tile, overlap, _)| (tile, overlap))
}

/// Which side of the entity met `tile`, judged from where it started.
fn classify(previous: &Aabb, tile: &Aabb, overlap: Vec2) -> Option<Sides> {
    let vertical = if previous.bottom() <= tile.top() + CONTACT_EPSILON {
        Some(Sides::BOTTOM)
    } else if previous.top() >= tile.bottom() - CONTACT_EPSILON {
        Some(Sides::TOP)
    } else {
        None
    };
    let horizontal = if previous.right() <= tile.left() + CONTACT_EPSILON {
        Some(Sides::RIGHT)
    } else if previous.left() >= tile.right() - CONTACT_EPSILON {
        Some(Sides::LEFT)
    } else {
        None
    };

    match (vertical, horizontal) {
        (Some(v), Some(h)) => Some(if overlap.y <= overlap.x { v } else { h }),
        (v, h) => v.or(h),
    }
}

fn clamp_horizontal(entity: &mut Entity, bounds: &Aabb) -> bool {
    let body = &mut entity.body;
    if body.size.x > bounds.width() {
        return false;
    }
    if body.position.x < bounds.left() {
        body.position.x = bounds.left();
    } else if body.position.x + body.size.x > bounds.right() {
        body.position.x = bounds.right() - body.size.x;
    } else {
        return false;
    }
    body.velocity.x = 0.0;
    true
}
