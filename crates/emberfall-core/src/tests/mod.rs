//! Crate-level scenario tests.
//!
//! - `integration.rs`: End-to-end ticks through [`Simulation`](crate::simulation::Simulation)
//! - `properties.rs`: Property tests over the state machine and resolvers
//! - `helpers.rs`: Terrain and entity setup shared by both

mod helpers;
mod integration;

pub use helpers::*;
