//! Component structs carried by every [`Entity`](super::Entity).
//!
//! Player and enemy share these verbatim; behaviour differences come from
//! [`Capabilities`](super::Capabilities) and the entity's
//! [`ActorProfile`](crate::config::ActorProfile), not from distinct
//! component sets.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strata::Aabb;

use crate::clock::Millis;
use crate::entity::EntityId;
use crate::state::ActionState;

// =============================================================================
// Kinematics
// =============================================================================

/// Position, velocity and collider of an entity.
///
/// `position` is the top-left corner of the collider in screen space
/// (y grows downward). Velocity is in world units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Top-left corner of the collider.
    pub position: Vec2,
    /// Position at the start of the current tick.
    pub previous_position: Vec2,
    /// Units per tick.
    pub velocity: Vec2,
    /// True while standing on solid terrain.
    pub on_ground: bool,
    /// Collider width and height.
    pub size: Vec2,
}

impl KinematicBody {
    /// Creates a body at rest, airborne, at `position`.
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            on_ground: false,
            size,
        }
    }

    /// Records the current position as the tick's starting point.
    ///
    /// Must run before any write to `position` in a tick.
    pub fn snapshot(&mut self) {
        self.previous_position = self.position;
    }

    /// Collider at the current position.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    /// Collider at the snapshotted position.
    #[must_use]
    pub fn previous_box(&self) -> Aabb {
        Aabb::from_position_size(self.previous_position, self.size)
    }
}

// =============================================================================
// Action bookkeeping
// =============================================================================

/// How far a swing has got against one defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingMark {
    /// A miss was already reported; a later intersection may still land.
    Missed,
    /// The swing produced its outcome against this defender.
    Resolved,
}

/// Per-swing record of which defenders have been dealt with.
///
/// Cleared whenever the owning entity starts a new attack, so an outcome
/// is reported at most once per swing and defender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwingLog {
    swing: u32,
    marks: Vec<(EntityId, SwingMark)>,
}

impl SwingLog {
    /// Starts a new swing, forgetting every previous mark.
    pub fn begin(&mut self) {
        self.swing = self.swing.wrapping_add(1);
        self.marks.clear();
    }

    /// Number of swings started so far.
    #[must_use]
    pub fn swing(&self) -> u32 {
        self.swing
    }

    /// Mark recorded against `defender` during the current swing.
    #[must_use]
    pub fn mark(&self, defender: EntityId) -> Option<SwingMark> {
        self.marks
            .iter()
            .find(|(id, _)| *id == defender)
            .map(|(_, mark)| *mark)
    }

    /// Records `mark` against `defender`, replacing any earlier mark.
    pub fn set_mark(&mut self, defender: EntityId, mark: SwingMark) {
        match self.marks.iter_mut().find(|(id, _)| *id == defender) {
            Some(entry) => entry.1 = mark,
            None => self.marks.push((defender, mark)),
        }
    }
}

/// State machine data: the current state plus every timer and flag its
/// guards read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionData {
    /// Current action state.
    pub state: ActionState,
    /// When `state` was entered.
    pub state_entered_at: Millis,
    /// Last accepted attack, `None` if never.
    pub last_attack: Option<Millis>,
    /// Last accepted parry, `None` if never.
    pub last_parry: Option<Millis>,
    /// Last accepted dash, `None` if never.
    pub last_dash: Option<Millis>,
    /// True exactly while dashing.
    pub is_invincible: bool,
    /// Set once the current dash has produced its single parry.
    pub has_parried_during_dash: bool,
    /// Terminal flag; once set the entity stays in `Death`.
    pub permanently_disabled: bool,
    /// Targets already handled by the current swing.
    pub swings: SwingLog,
}

impl ActionData {
    /// Fresh bookkeeping in `Idle`, entered at `now`.
    #[must_use]
    pub fn new(now: Millis) -> Self {
        Self {
            state: ActionState::Idle,
            state_entered_at: now,
            last_attack: None,
            last_parry: None,
            last_dash: None,
            is_invincible: false,
            has_parried_during_dash: false,
            permanently_disabled: false,
            swings: SwingLog::default(),
        }
    }
}

impl Default for ActionData {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Player progression counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Enemies that reached `Death`.
    pub enemies_defeated: u32,
    /// Parry outcomes credited to this entity.
    pub successful_parries: u32,
}
