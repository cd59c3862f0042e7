//! # Emberfall Core
//!
//! Melee combat and platformer physics core simulation for Emberfall.
//!
//! This crate simulates one player-controlled character and any number of
//! enemies in a tile-gridded 2D world. It integrates motion, resolves
//! collisions against static terrain, and arbitrates melee combat (attacks,
//! parries, dash invulnerability, hit-stun, death) through one state
//! machine shared by every entity.
//!
//! ## Architecture
//!
//! - **Entities**: One struct for player and enemies, tagged by kind and
//!   capability flags ([`entity`])
//! - **State machine**: Cooldown-gated action transitions ([`state`])
//! - **Resolvers**: Tile collision and melee arbitration ([`resolver`])
//! - **AI**: Chase-and-strike decisions for enemies ([`ai`])
//! - **Orchestration**: The fixed-order tick ([`simulation`]) and the
//!   between-tick wave director ([`director`])
//!
//! Terrain comes from the [`strata`] crate through the
//! [`TerrainQuery`](strata::TerrainQuery) trait; time comes from a
//! [`Clock`](clock::Clock) sampled once per tick.
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use strata::TileGrid;
//! use emberfall_core::config::SimConfig;
//! use emberfall_core::simulation::{PlayerInput, Simulation};
//! use emberfall_core::state::ActionState;
//!
//! let mut terrain = TileGrid::new(12, 20, 50.0);
//! terrain.fill_row(10);
//!
//! let mut sim = Simulation::new(SimConfig::default(), terrain).unwrap();
//! let player = sim.spawn_player(Vec2::new(100.0, 450.0));
//! sim.spawn_enemy(Vec2::new(600.0, 450.0));
//!
//! let input = PlayerInput { attack: true, ..PlayerInput::default() };
//! let report = sim.step(0, &input);
//!
//! assert_eq!(sim.arena().get(player).unwrap().state(), ActionState::Attacking);
//! assert!(!report.events.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export strata for terrain types
pub use strata;

// Core modules
pub mod ai;
pub mod arena;
pub mod clock;
pub mod config;
pub mod director;
pub mod entity;
pub mod event;
pub mod resolver;
pub mod simulation;
pub mod state;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use arena::Arena;
pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use config::{ConfigError, SimConfig};
pub use entity::{Entity, EntityId, EntityKind};
pub use event::{Event, TickReport};
pub use resolver::Outcome;
pub use simulation::{PlayerInput, Simulation};
pub use state::{Action, ActionState};
