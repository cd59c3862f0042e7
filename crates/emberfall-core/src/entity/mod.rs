//! Entity types shared by the player and every enemy.
//!
//! - [`EntityId`]: Unique identifier for entities
//! - [`EntityKind`]: Player or enemy tag
//! - [`Capabilities`]: Feature flags that gate player-only actions
//! - [`Entity`]: The complete entity container
//!
//! # Architecture
//!
//! Player and enemy are one structural shape. The kind tag decides who
//! fights whom; the capability flags decide which actions the state machine
//! will accept. There is no per-kind component storage.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use emberfall_core::config::ActorProfile;
//! use emberfall_core::entity::{Capabilities, Entity, EntityId, EntityKind};
//!
//! let enemy = Entity::new(
//!     EntityId::new(7),
//!     EntityKind::Enemy,
//!     ActorProfile::enemy(),
//!     Vec2::new(100.0, 0.0),
//! );
//!
//! assert_eq!(enemy.id().as_u64(), 7);
//! assert!(!enemy.has(Capabilities::DASH));
//! assert_eq!(enemy.bounding_box().width(), 32.0);
//! ```

pub mod components;

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use strata::Aabb;

use crate::config::ActorProfile;
use crate::resolver::Outcome;
use crate::state::ActionState;

pub use components::{ActionData, KinematicBody, Progress, SwingLog, SwingMark};

/// Unique identifier for an entity.
///
/// IDs are handed out monotonically by the [`Arena`](crate::arena::Arena)
/// and never reused, so ordering by ID is ordering by spawn time.
///
/// # Example
///
/// ```
/// use emberfall_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Which side of the fight an entity is on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The input-driven character
    Player,
    /// An AI-driven opponent
    Enemy,
}

impl EntityKind {
    /// Capabilities an entity of this kind is spawned with.
    #[must_use]
    pub fn default_capabilities(self) -> Capabilities {
        match self {
            Self::Player => Capabilities::all(),
            Self::Enemy => Capabilities::empty(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
        }
    }
}

bitflags! {
    /// Optional behaviours an entity may have.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// May enter `Dashing`.
        const DASH = 1;
        /// May enter `Parrying`.
        const PARRY = 1 << 1;
        /// Counts enemy deaths toward dash unlock.
        const DEFEAT_COUNTER = 1 << 2;
    }
}

/// A player or enemy in the simulation.
///
/// Fields that other subsystems mutate every tick (`body`, `action`,
/// `facing_right`, `progress`, `last_outcome`) are public; identity and
/// tuning are fixed at spawn and exposed through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    capabilities: Capabilities,
    profile: ActorProfile,
    /// Kinematics and collider.
    pub body: KinematicBody,
    /// Facing direction, used for hit-box placement and dash direction.
    pub facing_right: bool,
    /// State machine data.
    pub action: ActionData,
    /// Defeat and parry counters.
    pub progress: Progress,
    /// Most recent combat outcome involving this entity this tick.
    pub last_outcome: Option<Outcome>,
}

impl Entity {
    /// Creates an entity in `Idle`, at rest and airborne, with the default
    /// capabilities for its kind.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, profile: ActorProfile, position: Vec2) -> Self {
        Self {
            id,
            kind,
            capabilities: kind.default_capabilities(),
            body: KinematicBody::new(position, profile.size),
            profile,
            facing_right: true,
            action: ActionData::default(),
            progress: Progress::default(),
            last_outcome: None,
        }
    }

    /// Replaces the capability set.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the entity's capability set.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// True if every flag in `capability` is set.
    #[must_use]
    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    /// Per-kind tuning this entity was spawned with.
    #[must_use]
    pub const fn profile(&self) -> &ActorProfile {
        &self.profile
    }

    /// Current action state.
    #[must_use]
    pub const fn state(&self) -> ActionState {
        self.action.state
    }

    /// True once the entity has entered terminal `Death`.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.action.permanently_disabled
    }

    /// Hurt-box and collider.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.body.bounding_box()
    }

    /// Centre of the bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.bounding_box().center()
    }
}
