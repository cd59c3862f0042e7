//! Observable side effects of a tick.
//!
//! The core never calls into presentation code. Everything an animation,
//! audio or scoring layer needs to react to is recorded as an [`Event`] in
//! the [`TickReport`] returned from
//! [`Simulation::step`](crate::simulation::Simulation::step), in the order
//! it happened.

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::entity::{EntityId, EntityKind};
use crate::resolver::Outcome;
use crate::state::ActionState;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An entity's action state changed.
    StateChanged {
        /// Entity whose state changed
        entity: EntityId,
        /// Previous state
        from: ActionState,
        /// New state
        to: ActionState,
    },
    /// A swing produced a reportable outcome.
    Combat {
        /// Entity that swung
        attacker: EntityId,
        /// Entity that was swung at
        defender: EntityId,
        /// What happened
        outcome: Outcome,
    },
    /// An entity entered terminal `Death`.
    EntityDied {
        /// The entity that died
        entity: EntityId,
        /// Its kind
        kind: EntityKind,
    },
    /// Collision could not find a side to resolve and reverted the move.
    TerrainUnresolved {
        /// The entity that was reverted
        entity: EntityId,
    },
    /// The wave director added an entity.
    Spawned {
        /// The new entity
        entity: EntityId,
        /// Its kind
        kind: EntityKind,
    },
    /// The wave director removed a dead entity.
    Despawned {
        /// The removed entity
        entity: EntityId,
    },
}

/// Everything one call to `step` produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Arena tick number after this step.
    pub tick: u64,
    /// Time the step ran at.
    pub now: Millis,
    /// Events in the order they occurred.
    pub events: Vec<Event>,
}

impl TickReport {
    /// Combat events only.
    pub fn combat(&self) -> impl Iterator<Item = (EntityId, EntityId, Outcome)> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Combat {
                attacker,
                defender,
                outcome,
            } => Some((*attacker, *defender, *outcome)),
            _ => None,
        })
    }

    /// Entities that died this tick.
    pub fn deaths(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::EntityDied { entity, .. } => Some(*entity),
            _ => None,
        })
    }

    /// State transitions recorded for `entity`, in order.
    #[must_use]
    pub fn transitions_of(&self, entity: EntityId) -> Vec<(ActionState, ActionState)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::StateChanged { entity: e, from, to } if *e == entity => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}
