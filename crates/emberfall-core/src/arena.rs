//! Arena module: storage for every entity in a simulation.
//!
//! The Arena provides:
//! - A single player slot plus enemy storage with deterministic iteration
//!   order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn)
//! - Simulation tick tracking
//!
//! # Architecture
//!
//! The player lives in its own slot rather than in the enemy map. Every
//! phase of a tick pairs the player with each enemy in turn, and keeping
//! them in separate fields lets [`Arena::split_mut`] hand out both mutable
//! borrows at once.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use emberfall_core::arena::Arena;
//! use emberfall_core::config::ActorProfile;
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn_player(ActorProfile::player(), Vec2::new(0.0, 0.0));
//! let e1 = arena.spawn_enemy(ActorProfile::enemy(), Vec2::new(100.0, 0.0));
//! let e2 = arena.spawn_enemy(ActorProfile::enemy(), Vec2::new(200.0, 0.0));
//!
//! assert_eq!(arena.player_id(), Some(player));
//! let ids: Vec<_> = arena.enemy_ids_sorted().collect();
//! assert_eq!(ids, vec![e1, e2]);
//! ```

use std::collections::btree_map::ValuesMut;
use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ActorProfile;
use crate::entity::{Entity, EntityId, EntityKind};

/// Container for the player and all enemies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// The player, if spawned.
    player: Option<Entity>,
    /// Enemy storage with deterministic iteration order.
    enemies: BTreeMap<EntityId, Entity>,
    /// Current simulation tick.
    tick: u64,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns the player, replacing any existing one.
    pub fn spawn_player(&mut self, profile: ActorProfile, position: Vec2) -> EntityId {
        let id = self.allocate_id();
        if let Some(old) = self.player.take() {
            debug!(old = %old.id(), new = %id, "replacing player");
        }
        self.player = Some(Entity::new(id, EntityKind::Player, profile, position));
        debug!(entity = %id, ?position, "spawned player");
        id
    }

    /// Spawns an enemy.
    ///
    /// # Returns
    ///
    /// The unique ID assigned to the new enemy.
    pub fn spawn_enemy(&mut self, profile: ActorProfile, position: Vec2) -> EntityId {
        let id = self.allocate_id();
        self.enemies
            .insert(id, Entity::new(id, EntityKind::Enemy, profile, position));
        debug!(entity = %id, ?position, "spawned enemy");
        id
    }

    /// Removes an entity, player or enemy.
    ///
    /// # Returns
    ///
    /// The removed entity, if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let removed = if self.player_id() == Some(id) {
            self.player.take()
        } else {
            self.enemies.remove(&id)
        };
        if removed.is_some() {
            debug!(entity = %id, "despawned");
        }
        removed
    }

    /// Gets an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        match &self.player {
            Some(player) if player.id() == id => Some(player),
            _ => self.enemies.get(&id),
        }
    }

    /// Gets a mutable entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match &mut self.player {
            Some(player) if player.id() == id => Some(player),
            _ => self.enemies.get_mut(&id),
        }
    }

    /// The player, if spawned.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    /// Mutable access to the player.
    #[must_use]
    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.as_mut()
    }

    /// ID of the player, if spawned.
    #[must_use]
    pub fn player_id(&self) -> Option<EntityId> {
        self.player.as_ref().map(Entity::id)
    }

    /// Enemy IDs in ascending order.
    pub fn enemy_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.enemies.keys().copied()
    }

    /// Enemies in ascending ID order.
    pub fn enemies(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.enemies.values()
    }

    /// Mutable enemies in ascending ID order.
    pub fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.enemies.values_mut()
    }

    /// Every entity, player first, then enemies by ID.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.player.iter_mut().chain(self.enemies.values_mut())
    }

    /// Disjoint mutable access to the player and the enemies.
    pub fn split_mut(&mut self) -> (Option<&mut Entity>, ValuesMut<'_, EntityId, Entity>) {
        (self.player.as_mut(), self.enemies.values_mut())
    }

    /// Number of enemies.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Total number of entities, player included.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.enemies.len() + usize::from(self.player.is_some())
    }

    /// Returns true if the arena holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}
