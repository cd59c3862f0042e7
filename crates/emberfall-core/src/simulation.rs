//! Simulation module: the per-frame tick.
//!
//! The `Simulation` struct sequences every subsystem once per frame, in a
//! fixed order:
//!
//! 1. **SNAPSHOT**: Record each body's starting position, clear last outcomes
//! 2. **TIMERS**: Age out attack, parry, dash and hit-stun states
//! 3. **AI**: Each enemy decides and feeds its intent to the state machine
//! 4. **INPUT**: The player's requested actions go to the state machine
//! 5. **COLLISION**: Integrate motion and settle against terrain
//! 6. **LOCOMOTION**: Re-derive Idle / Running / Jumping from the bodies
//! 7. **COMBAT**: Player swings at every enemy, then every enemy at the player
//! 8. **BOOKKEEPING**: Credit enemy deaths to the player
//!
//! # Determinism
//!
//! One `now` value is threaded through every phase, and enemies are
//! visited in ID order, so a given sequence of `(now, input)` pairs always
//! produces the same arena.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use strata::TileGrid;
//! use emberfall_core::config::SimConfig;
//! use emberfall_core::simulation::{PlayerInput, Simulation};
//!
//! let terrain = TileGrid::parse(
//!     "..........\n\
//!      ..........\n\
//!      ###########",
//!     50.0,
//! )
//! .unwrap();
//! let mut sim = Simulation::new(SimConfig::default(), terrain).unwrap();
//! sim.spawn_player(Vec2::new(20.0, 40.0));
//!
//! for frame in 0..60 {
//!     sim.step(frame * 16, &PlayerInput::default());
//! }
//!
//! let player = sim.arena().player().unwrap();
//! assert!(player.body.on_ground);
//! assert_eq!(player.bounding_box().bottom(), 100.0);
//! assert_eq!(sim.tick(), 60);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strata::{TerrainQuery, TileGrid};
use tracing::debug;

use crate::ai::EnemyController;
use crate::arena::Arena;
use crate::clock::{Clock, Millis};
use crate::config::{ConfigError, SimConfig};
use crate::entity::{Capabilities, Entity, EntityId, EntityKind};
use crate::event::{Event, TickReport};
use crate::resolver::{CollisionResolver, CombatResolver};
use crate::state::{Action, ActionState, ActionStateMachine, Direction};

// =============================================================================
// Input
// =============================================================================

/// The player's requests for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Held horizontal direction, if any.
    pub move_dir: Option<Direction>,
    /// Jump pressed.
    pub jump: bool,
    /// Attack pressed.
    pub attack: bool,
    /// Parry pressed.
    pub parry: bool,
    /// Dash pressed.
    pub dash: bool,
}

impl PlayerInput {
    /// Requested actions in the order they are offered to the state machine.
    ///
    /// Jump, attack, parry and dash come before movement, so a move held
    /// while starting an attack is refused rather than overriding it.
    fn actions(&self) -> impl Iterator<Item = Action> {
        [
            self.jump.then_some(Action::Jump),
            self.attack.then_some(Action::Attack),
            self.parry.then_some(Action::Parry),
            self.dash.then_some(Action::Dash),
            self.move_dir.map(Action::Move),
        ]
        .into_iter()
        .flatten()
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Orchestrates one player, any number of enemies, and the terrain.
#[derive(Debug)]
pub struct Simulation<T = TileGrid> {
    arena: Arena,
    terrain: T,
    config: SimConfig,
    machine: ActionStateMachine,
    collision: CollisionResolver,
    combat: CombatResolver,
    ai: EnemyController,
}

impl<T: TerrainQuery> Simulation<T> {
    /// Creates an empty simulation over `terrain`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(config: SimConfig, terrain: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            arena: Arena::new(),
            terrain,
            machine: ActionStateMachine::new(&config),
            collision: CollisionResolver::new(&config),
            combat: CombatResolver::new(&config),
            ai: EnemyController::new(&config),
            config,
        })
    }

    /// Spawns the player with the configured player profile.
    pub fn spawn_player(&mut self, position: Vec2) -> EntityId {
        self.arena.spawn_player(self.config.player.clone(), position)
    }

    /// Spawns an enemy with the configured enemy profile.
    pub fn spawn_enemy(&mut self, position: Vec2) -> EntityId {
        self.arena.spawn_enemy(self.config.enemy.clone(), position)
    }

    /// Advances the simulation by one tick at time `now`.
    pub fn step(&mut self, now: Millis, input: &PlayerInput) -> TickReport {
        let Self {
            arena,
            terrain,
            machine,
            collision,
            combat,
            ai,
            ..
        } = self;
        arena.advance_tick();
        let mut events = Vec::new();

        for entity in arena.entities_mut() {
            entity.body.snapshot();
            entity.last_outcome = None;
        }

        let mut died = Vec::new();
        for entity in arena.entities_mut() {
            let from = entity.state();
            machine.tick(entity, now);
            if record(&mut events, entity, from) && entity.state() == ActionState::Death {
                events.push(Event::EntityDied {
                    entity: entity.id(),
                    kind: entity.kind(),
                });
                died.push(entity.kind());
            }
        }

        let (player, enemies) = arena.split_mut();
        let target = player.as_deref();
        for enemy in enemies {
            let from = enemy.state();
            let intent = ai.decide(enemy, target);
            ai.apply(enemy, intent, machine, now);
            record(&mut events, enemy, from);
        }

        if let Some(player) = arena.player_mut() {
            for action in input.actions() {
                let from = player.state();
                machine.request(player, action, now);
                record(&mut events, player, from);
            }
        }

        for entity in arena.entities_mut() {
            let contact = collision.resolve(entity, &*terrain);
            if contact.unresolved {
                events.push(Event::TerrainUnresolved {
                    entity: entity.id(),
                });
            }
        }

        for entity in arena.entities_mut() {
            let from = entity.state();
            machine.refresh_locomotion(entity, now);
            record(&mut events, entity, from);
        }

        if let (Some(player), enemies) = arena.split_mut() {
            for enemy in enemies {
                swing(combat, player, enemy, now, &mut events);
            }
        }
        if let (Some(player), enemies) = arena.split_mut() {
            for enemy in enemies {
                swing(combat, enemy, player, now, &mut events);
            }
        }

        let kills = died.iter().filter(|kind| **kind == EntityKind::Enemy).count();
        if kills > 0 {
            if let Some(player) = arena
                .player_mut()
                .filter(|p| p.has(Capabilities::DEFEAT_COUNTER))
            {
                let kills = u32::try_from(kills).unwrap_or(u32::MAX);
                player.progress.enemies_defeated =
                    player.progress.enemies_defeated.saturating_add(kills);
                debug!(
                    kills,
                    total = player.progress.enemies_defeated,
                    "credited enemy defeats"
                );
            }
        }

        TickReport {
            tick: arena.current_tick(),
            now,
            events,
        }
    }

    /// Advances one tick, sampling `clock` once for the whole tick.
    pub fn step_with_clock(&mut self, clock: &impl Clock, input: &PlayerInput) -> TickReport {
        self.step(clock.now(), input)
    }

    /// Returns a reference to the arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns a mutable reference to the arena.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Returns the terrain.
    #[must_use]
    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    /// Returns the tuning this simulation was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns the shared state machine.
    #[must_use]
    pub fn machine(&self) -> &ActionStateMachine {
        &self.machine
    }

    /// Returns the current tick number.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.current_tick()
    }
}

/// Pushes a `StateChanged` event if `entity` left `from`. Returns whether it did.
fn record(events: &mut Vec<Event>, entity: &Entity, from: ActionState) -> bool {
    let to = entity.state();
    if to == from {
        return false;
    }
    events.push(Event::StateChanged {
        entity: entity.id(),
        from,
        to,
    });
    true
}

fn swing(
    combat: &CombatResolver,
    attacker: &mut Entity,
    defender: &mut Entity,
    now: Millis,
    events: &mut Vec<Event>,
) {
    let from = defender.state();
    let outcome = combat.resolve_hit(attacker, Some(&mut *defender), now);
    if outcome.is_reportable() {
        events.push(Event::Combat {
            attacker: attacker.id(),
            defender: defender.id(),
            outcome,
        });
    }
    record(events, defender, from);
}
