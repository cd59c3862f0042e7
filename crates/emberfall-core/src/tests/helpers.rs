//! Test helper functions for setting up simulations and entities.

use glam::Vec2;
use strata::TileGrid;

use crate::clock::Millis;
use crate::config::SimConfig;
use crate::entity::EntityId;
use crate::event::TickReport;
use crate::simulation::{PlayerInput, Simulation};

/// Frame length used by the scenario tests.
pub const FRAME_MS: Millis = 16;

/// Top edge of the floor row in [`floor_terrain`].
pub const FLOOR_TOP: f32 = 500.0;

/// Y coordinate at which a 50-unit-tall body rests on the floor.
pub const STANDING_Y: f32 = FLOOR_TOP - 50.0;

// =============================================================================
// Setup
// =============================================================================

/// 24 x 12 grid of 50-unit tiles with a solid floor whose top is at y = 500.
pub fn floor_terrain() -> TileGrid {
    let mut terrain = TileGrid::new(12, 24, 50.0);
    terrain.fill_row(10);
    terrain
}

/// Simulation over [`floor_terrain`] with default tuning.
pub fn floor_sim() -> Simulation {
    Simulation::new(SimConfig::default(), floor_terrain()).unwrap()
}

/// Spawns the player standing on the floor at `x`.
pub fn grounded_player(sim: &mut Simulation, x: f32) -> EntityId {
    let id = sim.spawn_player(Vec2::new(x, STANDING_Y));
    sim.arena_mut().get_mut(id).unwrap().body.on_ground = true;
    id
}

/// Spawns an enemy standing on the floor at `x`.
pub fn grounded_enemy(sim: &mut Simulation, x: f32) -> EntityId {
    let id = sim.spawn_enemy(Vec2::new(x, STANDING_Y));
    sim.arena_mut().get_mut(id).unwrap().body.on_ground = true;
    id
}

// =============================================================================
// Inputs
// =============================================================================

/// No buttons held.
pub fn idle() -> PlayerInput {
    PlayerInput::default()
}

/// Attack pressed.
pub fn attack() -> PlayerInput {
    PlayerInput {
        attack: true,
        ..PlayerInput::default()
    }
}

/// Parry pressed.
pub fn parry() -> PlayerInput {
    PlayerInput {
        parry: true,
        ..PlayerInput::default()
    }
}

/// Dash pressed.
pub fn dash() -> PlayerInput {
    PlayerInput {
        dash: true,
        ..PlayerInput::default()
    }
}

// =============================================================================
// Driving
// =============================================================================

/// Runs `frames` idle ticks starting at `start`, one [`FRAME_MS`] apart.
///
/// # Returns
///
/// Every report, and the time of the frame after the last one.
pub fn run_idle(sim: &mut Simulation, start: Millis, frames: u64) -> (Vec<TickReport>, Millis) {
    let reports = (0..frames)
        .map(|i| sim.step(start + i * FRAME_MS, &idle()))
        .collect();
    (reports, start + frames * FRAME_MS)
}
