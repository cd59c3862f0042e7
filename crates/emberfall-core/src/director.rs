//! Wave director: corpse removal and enemy replacement.
//!
//! The core tick never deletes an entity. The director runs after
//! [`Simulation::step`](crate::simulation::Simulation::step), removes
//! enemies that have lain in `Death` for the death-animation duration, and
//! drops replacements in beside them until the spawn budget is spent.
//!
//! Random placement uses a [`ChaCha8Rng`]. A director built with
//! [`WaveDirector::with_seed`] places enemies identically on every run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata::TerrainQuery;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::clock::Millis;
use crate::config::{ActorProfile, DirectorConfig, SimConfig};
use crate::entity::{EntityId, EntityKind};
use crate::event::Event;
use crate::state::ActionState;

/// Spawns and reaps enemies between ticks.
#[derive(Debug, Clone)]
pub struct WaveDirector {
    config: DirectorConfig,
    profile: ActorProfile,
    /// Enemies spawned through this director, initial ones included.
    spawned: u32,
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl WaveDirector {
    /// Creates a director with an entropy-seeded RNG.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            config: config.director.clone(),
            profile: config.enemy.clone(),
            spawned: 0,
            rng: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// Creates a director with a deterministic RNG.
    #[must_use]
    pub fn with_seed(config: &SimConfig, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
            ..Self::new(config)
        }
    }

    /// Seed passed to [`WaveDirector::with_seed`], if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Enemies spawned so far.
    #[must_use]
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Spawns an enemy at `position` and counts it against the budget.
    pub fn spawn_enemy(&mut self, arena: &mut Arena, position: Vec2) -> EntityId {
        self.spawned = self.spawned.saturating_add(1);
        arena.spawn_enemy(self.profile.clone(), position)
    }

    /// Spawns an enemy at a random x inside the terrain, at the configured
    /// spawn height.
    pub fn spawn_random_enemy(
        &mut self,
        arena: &mut Arena,
        terrain: &impl TerrainQuery,
    ) -> EntityId {
        let max_x = (terrain.world_bounds().width() - self.profile.size.x).max(0.0);
        let x = self.rng.gen_range(0.0..=max_x);
        self.spawn_enemy(arena, Vec2::new(x, self.config.spawn_height))
    }

    /// Reaps finished corpses and spawns their replacements.
    ///
    /// Each reaped enemy yields a replacement `replacement_offset` to its
    /// left while the spawn count is at most `max_spawns`, and a second one
    /// to its right while the count is still below it.
    pub fn update(&mut self, arena: &mut Arena, now: Millis) -> Vec<Event> {
        let expired: Vec<EntityId> = arena
            .enemies()
            .filter(|e| {
                e.state() == ActionState::Death
                    && now.saturating_sub(e.action.state_entered_at)
                        >= self.config.death_animation_ms
            })
            .map(|e| e.id())
            .collect();

        let mut events = Vec::new();
        for id in expired {
            let Some(corpse) = arena.despawn(id) else {
                continue;
            };
            events.push(Event::Despawned { entity: id });

            let at = corpse.body.position;
            let offset = Vec2::new(self.config.replacement_offset, 0.0);
            if self.spawned <= self.config.max_spawns {
                let left = self.spawn_enemy(arena, at - offset);
                events.push(Event::Spawned {
                    entity: left,
                    kind: EntityKind::Enemy,
                });
                if self.spawned < self.config.max_spawns {
                    let right = self.spawn_enemy(arena, at + offset);
                    events.push(Event::Spawned {
                        entity: right,
                        kind: EntityKind::Enemy,
                    });
                }
                info!(fallen = %id, spawned = self.spawned, "spawned replacements");
            } else {
                debug!(fallen = %id, "spawn budget spent");
            }
        }
        events
    }
}
