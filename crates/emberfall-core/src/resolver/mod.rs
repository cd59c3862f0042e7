//! Resolvers turn a tick's intents into committed state.
//!
//! # Architecture
//!
//! Resolution runs in two phases per tick, after the state machine has
//! consumed that tick's intents:
//! 1. [`CollisionResolver`] moves every entity and settles it against terrain
//! 2. [`CombatResolver`] tests live hit-boxes against post-collision
//!    bounding boxes and applies the outcome
//!
//! # Invariants
//!
//! - Collision reads `previous_position` only for side disambiguation
//! - Combat never resolves the same swing against the same defender twice
//! - Neither resolver returns an error; failures degrade to a revert or
//!   [`Outcome::None`]
//!
//! # Available Resolvers
//!
//! - [`CollisionResolver`]: Gravity, friction, integration and tile collisions
//! - [`CombatResolver`]: Hit-box tests and hit/parry/dash arbitration

mod combat;
mod physics;

pub use combat::{
    hit_box, CombatResolver, Outcome, HITBOX_FORWARD_OFFSET, HITBOX_HEIGHT_RATIO, HITBOX_WIDTH_RATIO,
};
pub use physics::{CollisionResolver, Contact, Sides, MAX_PASSES};
