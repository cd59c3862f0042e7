//! Action state machine shared by the player and every enemy.
//!
//! Every entity is in exactly one [`ActionState`]. Voluntary actions go
//! through [`ActionStateMachine::request`], which checks the guard for the
//! current state and either applies the transition or silently refuses it.
//! Timed states (attack, parry, dash, hit-stun) are aged out by
//! [`ActionStateMachine::tick`], and the locomotion states (idle, running,
//! jumping) follow the body after collision through
//! [`ActionStateMachine::refresh_locomotion`].
//!
//! # Transitions
//!
//! | From | Trigger | To |
//! |---|---|---|
//! | Idle / Running / Jumping | attack | Attacking |
//! | Idle / Running | parry | Parrying |
//! | Idle / Running / Jumping | dash | Dashing |
//! | Idle / Running / Jumping | jump (grounded) | Jumping |
//! | Attacking / Parrying | timer | Idle / Running / Jumping |
//! | Dashing | timer | Idle / Jumping |
//! | any but TakeHit / Death | hit | TakeHit |
//! | TakeHit | timer | Death |
//!
//! `Death` is absorbing.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use emberfall_core::config::{ActorProfile, SimConfig};
//! use emberfall_core::entity::{Entity, EntityId, EntityKind};
//! use emberfall_core::state::{Action, ActionState, ActionStateMachine};
//!
//! let machine = ActionStateMachine::new(&SimConfig::default());
//! let mut player = Entity::new(EntityId::new(0), EntityKind::Player, ActorProfile::player(), Vec2::ZERO);
//!
//! assert!(machine.request(&mut player, Action::Attack, 1_000));
//! assert_eq!(player.state(), ActionState::Attacking);
//!
//! // Still on cooldown 100 ms later.
//! assert!(!machine.request(&mut player, Action::Attack, 1_100));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::{elapsed_since, Millis};
use crate::config::{CombatConfig, DashConfig, PhysicsConfig, SimConfig};
use crate::entity::{Capabilities, Entity};

/// The single action state an entity is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionState {
    /// Grounded and (nearly) still
    Idle,
    /// Grounded and moving
    Running,
    /// Airborne
    Jumping,
    /// Swinging; the hit-box may be live
    Attacking,
    /// Deflecting incoming attacks
    Parrying,
    /// Invulnerable burst of movement
    Dashing,
    /// Hit-stun; ends in death
    TakeHit,
    /// Terminal
    Death,
}

impl ActionState {
    /// True for Idle, Running and Jumping.
    #[must_use]
    pub const fn is_locomotion(self) -> bool {
        matches!(self, Self::Idle | Self::Running | Self::Jumping)
    }

    /// True if no voluntary action can leave this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Death)
    }
}

/// Horizontal move direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward negative x
    Left,
    /// Toward positive x
    Right,
}

impl Direction {
    /// `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// A voluntary action request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk in a direction at the entity's move speed
    Move(Direction),
    /// Jump from the ground
    Jump,
    /// Start a melee swing
    Attack,
    /// Start a parry
    Parry,
    /// Dash forward (player only)
    Dash,
}

/// Cooldown guard: passes when the action was never used or `cooldown` has
/// elapsed since it was.
fn cooldown_ready(now: Millis, last: Option<Millis>, cooldown: Millis) -> bool {
    elapsed_since(now, last).map_or(true, |elapsed| elapsed >= cooldown)
}

/// Guard-checked transitions for [`Entity::action`].
#[derive(Debug, Clone, Default)]
pub struct ActionStateMachine {
    physics: PhysicsConfig,
    combat: CombatConfig,
    dash: DashConfig,
}

impl ActionStateMachine {
    /// Builds a state machine from the simulation tuning.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            physics: config.physics.clone(),
            combat: config.combat.clone(),
            dash: config.dash.clone(),
        }
    }

    /// Dash cooldown for a player with `defeated` kills.
    #[must_use]
    pub fn dash_cooldown(&self, defeated: u32) -> Millis {
        self.dash.cooldown(defeated)
    }

    /// Attempts a voluntary action.
    ///
    /// Returns `true` if the guard passed and the action took effect.
    /// Refusals change nothing and are logged at trace level.
    pub fn request(&self, entity: &mut Entity, action: Action, now: Millis) -> bool {
        let accepted = match action {
            Action::Move(direction) => self.try_move(entity, direction, now),
            Action::Jump => self.try_jump(entity, now),
            Action::Attack => Self::try_attack(entity, now),
            Action::Parry => self.try_parry(entity, now),
            Action::Dash => self.try_dash(entity, now),
        };
        if !accepted {
            trace!(entity = %entity.id(), ?action, state = ?entity.state(), "action rejected");
        }
        accepted
    }

    fn try_move(&self, entity: &mut Entity, direction: Direction, now: Millis) -> bool {
        let state = entity.state();
        if !(state.is_locomotion() || state == ActionState::Dashing) {
            return false;
        }
        entity.body.velocity.x = direction.sign() * entity.profile().move_speed;
        entity.facing_right = direction == Direction::Right;
        if entity.body.on_ground && state.is_locomotion() {
            self.settle(entity, now);
        }
        true
    }

    fn try_jump(&self, entity: &mut Entity, now: Millis) -> bool {
        if !entity.body.on_ground || !entity.state().is_locomotion() {
            return false;
        }
        entity.body.velocity.y = self.physics.jump_force;
        entity.body.on_ground = false;
        enter(entity, ActionState::Jumping, now);
        true
    }

    fn try_attack(entity: &mut Entity, now: Millis) -> bool {
        if !entity.state().is_locomotion()
            || !cooldown_ready(now, entity.action.last_attack, entity.profile().attack_cooldown_ms)
        {
            return false;
        }
        entity.action.last_attack = Some(now);
        entity.action.swings.begin();
        enter(entity, ActionState::Attacking, now);
        true
    }

    fn try_parry(&self, entity: &mut Entity, now: Millis) -> bool {
        let state = entity.state();
        if !entity.has(Capabilities::PARRY)
            || !matches!(state, ActionState::Idle | ActionState::Running)
            || !cooldown_ready(now, entity.action.last_parry, self.combat.parry_cooldown_ms)
        {
            return false;
        }
        entity.action.last_parry = Some(now);
        entity.body.velocity.x = 0.0;
        enter(entity, ActionState::Parrying, now);
        true
    }

    fn try_dash(&self, entity: &mut Entity, now: Millis) -> bool {
        let defeated = entity.progress.enemies_defeated;
        if !entity.has(Capabilities::DASH)
            || !entity.state().is_locomotion()
            || !self.dash.unlocked(defeated)
            || !cooldown_ready(now, entity.action.last_dash, self.dash_cooldown(defeated))
        {
            return false;
        }
        let direction = if entity.facing_right { 1.0 } else { -1.0 };
        entity.body.position.x += direction * self.dash.distance;
        entity.action.last_dash = Some(now);
        entity.action.is_invincible = true;
        entity.action.has_parried_during_dash = false;
        enter(entity, ActionState::Dashing, now);
        true
    }

    /// Ages out timed states.
    ///
    /// Attack and parry return to locomotion, dash returns to `Idle` or
    /// `Jumping`, and hit-stun ends in terminal `Death`.
    pub fn tick(&self, entity: &mut Entity, now: Millis) {
        let elapsed = now.saturating_sub(entity.action.state_entered_at);

        match entity.state() {
            ActionState::Attacking if elapsed >= entity.profile().attack_duration_ms => {
                self.settle(entity, now);
            }
            ActionState::Parrying if elapsed >= self.combat.parry_duration_ms => {
                self.settle(entity, now);
            }
            ActionState::Dashing if elapsed >= self.dash.duration_ms => {
                entity.action.is_invincible = false;
                let to = if entity.body.on_ground {
                    ActionState::Idle
                } else {
                    ActionState::Jumping
                };
                enter(entity, to, now);
            }
            ActionState::TakeHit if elapsed >= entity.profile().take_hit_duration_ms => {
                entity.action.permanently_disabled = true;
                entity.body.velocity.x = 0.0;
                enter(entity, ActionState::Death, now);
            }
            _ => {}
        }
    }

    /// Re-derives Idle / Running / Jumping from the body after collision.
    ///
    /// Non-locomotion states are left alone.
    pub fn refresh_locomotion(&self, entity: &mut Entity, now: Millis) {
        if entity.state().is_locomotion() {
            self.settle(entity, now);
        }
    }

    /// Puts an entity into hit-stun with knockback away from `attacker_x`.
    ///
    /// Rejected (returns `false`) while invincible, already in hit-stun, or
    /// dead.
    pub fn apply_hit(&self, defender: &mut Entity, attacker_x: f32, now: Millis) -> bool {
        if defender.action.is_invincible
            || defender.action.permanently_disabled
            || matches!(defender.state(), ActionState::TakeHit | ActionState::Death)
        {
            trace!(entity = %defender.id(), state = ?defender.state(), "hit rejected");
            return false;
        }
        let away = away_from(defender, attacker_x);
        defender.body.velocity.x = away * self.combat.knockback_force;
        defender.body.velocity.y = -self.combat.knockback_lift;
        defender.body.on_ground = false;
        enter(defender, ActionState::TakeHit, now);
        true
    }

    /// Pushes a parrying defender away from `attacker_x` without changing
    /// its state.
    pub fn apply_parry_knockback(&self, defender: &mut Entity, attacker_x: f32) {
        let away = away_from(defender, attacker_x);
        defender.body.velocity.x = away * self.combat.parry_knockback;
    }

    fn locomotion_state(&self, entity: &Entity) -> ActionState {
        if !entity.body.on_ground {
            ActionState::Jumping
        } else if entity.body.velocity.x.abs() > self.physics.run_threshold {
            ActionState::Running
        } else {
            ActionState::Idle
        }
    }

    /// Moves to whichever locomotion state fits the body.
    fn settle(&self, entity: &mut Entity, now: Millis) {
        let to = self.locomotion_state(entity);
        if to != entity.state() {
            enter(entity, to, now);
        }
    }
}

/// `1.0` if the defender should be pushed right, `-1.0` for left.
///
/// When the centres coincide the push goes against the defender's facing.
fn away_from(defender: &Entity, attacker_x: f32) -> f32 {
    let dx = defender.center().x - attacker_x;
    if dx > 0.0 {
        1.0
    } else if dx < 0.0 {
        -1.0
    } else if defender.facing_right {
        -1.0
    } else {
        1.0
    }
}

fn enter(entity: &mut Entity, to: ActionState, now: Millis) {
    let from = entity.action.state;
    entity.action.state = to;
    entity.action.state_entered_at = now;
    debug!(entity = %entity.id(), ?from, ?to, "state change");
}
