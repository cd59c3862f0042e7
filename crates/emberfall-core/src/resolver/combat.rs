//! Melee hit detection and outcome arbitration.
//!
//! The `CombatResolver` decides what one attacker's swing does to one
//! defender on one tick:
//! - No live hit-box, invalid target, or nothing left to report: [`Outcome::None`]
//! - Hit-box misses the defender: [`Outcome::Miss`] (once per swing)
//! - Defender dashing: a single [`Outcome::Parried`] per dash, then
//!   [`Outcome::NegatedByDash`]
//! - Defender parrying: knockback on the defender, [`Outcome::Parried`]
//! - Otherwise: hit-stun, [`Outcome::Hit`]
//!
//! # Hit-box Geometry
//!
//! The hit-box is `width / HITBOX_WIDTH_RATIO` wide and
//! `height / HITBOX_HEIGHT_RATIO` tall, top-aligned with the attacker's
//! bounding box, and starts [`HITBOX_FORWARD_OFFSET`] beyond the side it
//! faces. The hurt-box is the defender's bounding box.
//!
//! With the default 32-wide colliders the swing connects at centre
//! distances between 25 and about 66, which covers the enemy attack range.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strata::Aabb;
use tracing::debug;

use crate::clock::Millis;
use crate::config::SimConfig;
use crate::entity::{Entity, SwingMark};
use crate::state::{ActionState, ActionStateMachine};

/// Bounding-box width divided by this gives the hit-box width.
pub const HITBOX_WIDTH_RATIO: f32 = 3.5;

/// Bounding-box height divided by this gives the hit-box height.
pub const HITBOX_HEIGHT_RATIO: f32 = 2.0;

/// Gap between the attacker's facing edge and the near edge of its hit-box.
pub const HITBOX_FORWARD_OFFSET: f32 = 25.0;

/// Result of resolving one swing against one defender on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing to report
    None,
    /// The swing missed this defender
    Miss,
    /// The defender entered hit-stun
    Hit,
    /// The defender parried (or dodged through a dash for the first time)
    Parried,
    /// The dash already produced its parry; the hit is absorbed
    NegatedByDash,
}

impl Outcome {
    /// True for every outcome except [`Outcome::None`].
    #[must_use]
    pub const fn is_reportable(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Hit-box an attacker would project right now, ignoring timing.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use emberfall_core::config::ActorProfile;
/// use emberfall_core::entity::{Entity, EntityId, EntityKind};
/// use emberfall_core::resolver::hit_box;
///
/// let mut profile = ActorProfile::player();
/// profile.size = Vec2::new(35.0, 50.0);
/// let player = Entity::new(EntityId::new(0), EntityKind::Player, profile, Vec2::ZERO);
///
/// let hb = hit_box(&player);
/// assert_eq!(hb.min, Vec2::new(60.0, 0.0));
/// assert_eq!(hb.max, Vec2::new(70.0, 25.0));
/// ```
#[must_use]
pub fn hit_box(attacker: &Entity) -> Aabb {
    let body = attacker.bounding_box();
    let size = Vec2::new(
        body.width() / HITBOX_WIDTH_RATIO,
        body.height() / HITBOX_HEIGHT_RATIO,
    );
    let x = if attacker.facing_right {
        body.right() + HITBOX_FORWARD_OFFSET
    } else {
        body.left() - HITBOX_FORWARD_OFFSET - size.x
    };
    Aabb::from_position_size(Vec2::new(x, body.top()), size)
}

/// Resolver for melee attacks between two entities.
#[derive(Debug, Clone, Default)]
pub struct CombatResolver {
    machine: ActionStateMachine,
}

impl CombatResolver {
    /// Creates a combat resolver from the simulation tuning.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            machine: ActionStateMachine::new(config),
        }
    }

    /// Hit-box of `attacker` if it is mid-swing and inside the active window.
    #[must_use]
    pub fn active_hit_box(&self, attacker: &Entity, now: Millis) -> Option<Aabb> {
        if attacker.state() != ActionState::Attacking {
            return None;
        }
        let elapsed = now.saturating_sub(attacker.action.state_entered_at);
        (elapsed <= attacker.profile().active_window_ms).then(|| hit_box(attacker))
    }

    /// Resolves `attacker`'s current swing against `defender`.
    ///
    /// Records the outcome on both entities' `last_outcome` when it is
    /// anything but [`Outcome::None`]. Calling again later in the same swing
    /// never resolves the same defender twice.
    pub fn resolve_hit(
        &self,
        attacker: &mut Entity,
        defender: Option<&mut Entity>,
        now: Millis,
    ) -> Outcome {
        let Some(defender) = defender else {
            return Outcome::None;
        };
        if defender.id() == attacker.id()
            || matches!(defender.state(), ActionState::TakeHit | ActionState::Death)
        {
            return Outcome::None;
        }
        let Some(reach) = self.active_hit_box(attacker, now) else {
            return Outcome::None;
        };

        let mark = attacker.action.swings.mark(defender.id());
        if mark == Some(SwingMark::Resolved) {
            return Outcome::None;
        }

        let outcome = if reach.intersects(&defender.bounding_box()) {
            attacker
                .action
                .swings
                .set_mark(defender.id(), SwingMark::Resolved);
            self.land(attacker, defender, now)
        } else if mark.is_none() {
            attacker
                .action
                .swings
                .set_mark(defender.id(), SwingMark::Missed);
            Outcome::Miss
        } else {
            Outcome::None
        };

        if outcome.is_reportable() {
            attacker.last_outcome = Some(outcome);
            defender.last_outcome = Some(outcome);
            debug!(
                attacker = %attacker.id(),
                defender = %defender.id(),
                ?outcome,
                swing = attacker.action.swings.swing(),
                "combat outcome"
            );
        }
        outcome
    }

    fn land(&self, attacker: &Entity, defender: &mut Entity, now: Millis) -> Outcome {
        let attacker_x = attacker.center().x;
        match defender.state() {
            ActionState::Dashing => {
                if defender.action.has_parried_during_dash {
                    Outcome::NegatedByDash
                } else {
                    defender.action.has_parried_during_dash = true;
                    defender.progress.successful_parries += 1;
                    Outcome::Parried
                }
            }
            ActionState::Parrying => {
                self.machine.apply_parry_knockback(defender, attacker_x);
                defender.progress.successful_parries += 1;
                Outcome::Parried
            }
            _ => {
                if self.machine.apply_hit(defender, attacker_x, now) {
                    Outcome::Hit
                } else {
                    Outcome::None
                }
            }
        }
    }
}
