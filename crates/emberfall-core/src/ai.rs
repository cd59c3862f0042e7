//! Enemy decision making.
//!
//! [`EnemyController::decide`] is a pure function of the enemy and the
//! player; [`EnemyController::apply`] feeds the resulting [`Intent`] into
//! the state machine. Splitting the two keeps decisions testable without a
//! running simulation.

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::config::{AiConfig, SimConfig};
use crate::entity::Entity;
use crate::state::{Action, ActionState, ActionStateMachine, Direction};

/// What an enemy wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Walk toward a world x coordinate
    MoveToward(f32),
    /// Stand still
    Idle,
    /// Swing at a target standing at `target_x`
    Attack {
        /// Centre x of the target
        target_x: f32,
    },
}

/// Chase-and-strike controller for enemies.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use emberfall_core::ai::{EnemyController, Intent};
/// use emberfall_core::config::{ActorProfile, SimConfig};
/// use emberfall_core::entity::{Entity, EntityId, EntityKind};
///
/// let ai = EnemyController::new(&SimConfig::default());
/// let enemy = Entity::new(EntityId::new(1), EntityKind::Enemy, ActorProfile::enemy(), Vec2::new(200.0, 0.0));
/// let player = Entity::new(EntityId::new(0), EntityKind::Player, ActorProfile::player(), Vec2::new(40.0, 0.0));
///
/// assert!(matches!(ai.decide(&enemy, Some(&player)), Intent::MoveToward(_)));
/// assert_eq!(ai.decide(&enemy, None), Intent::Idle);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnemyController {
    ai: AiConfig,
}

impl EnemyController {
    /// Creates a controller from the simulation tuning.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            ai: config.ai.clone(),
        }
    }

    /// Picks this tick's intent. Distance is measured between box centres.
    #[must_use]
    pub fn decide(&self, enemy: &Entity, player: Option<&Entity>) -> Intent {
        if enemy.is_dead() || matches!(enemy.state(), ActionState::TakeHit | ActionState::Death) {
            return Intent::Idle;
        }
        let Some(player) = player.filter(|p| !p.is_dead()) else {
            return Intent::Idle;
        };

        let target = player.center();
        let distance = enemy.center().distance(target);
        if distance > self.ai.detection_range {
            Intent::Idle
        } else if distance > self.ai.attack_range {
            Intent::MoveToward(target.x)
        } else {
            Intent::Attack { target_x: target.x }
        }
    }

    /// Feeds `intent` into the state machine.
    ///
    /// Returns `true` if the machine accepted the resulting action.
    pub fn apply(
        &self,
        enemy: &mut Entity,
        intent: Intent,
        machine: &ActionStateMachine,
        now: Millis,
    ) -> bool {
        match intent {
            Intent::Idle => {
                enemy.body.velocity.x = 0.0;
                false
            }
            Intent::MoveToward(x) => {
                if matches!(
                    enemy.state(),
                    ActionState::Attacking | ActionState::TakeHit | ActionState::Death
                ) {
                    enemy.body.velocity.x = 0.0;
                    return false;
                }
                let dx = x - enemy.center().x;
                if dx.abs() > self.ai.move_threshold {
                    let direction = if dx > 0.0 {
                        Direction::Right
                    } else {
                        Direction::Left
                    };
                    machine.request(enemy, Action::Move(direction), now)
                } else {
                    enemy.body.velocity.x = 0.0;
                    false
                }
            }
            Intent::Attack { target_x } => {
                enemy.body.velocity.x = 0.0;
                if enemy.state() != ActionState::Attacking {
                    enemy.facing_right = target_x > enemy.center().x;
                }
                machine.request(enemy, Action::Attack, now)
            }
        }
    }
}
