//! Tuning configuration for the simulation.
//!
//! Every balance constant lives here rather than as a magic number in the
//! resolvers. [`SimConfig::default`] reproduces the shipped tuning; a partial
//! JSON document can override any subset of it because every section is
//! `#[serde(default)]`.
//!
//! # Example
//!
//! ```
//! use emberfall_core::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "dash": { "distance": 90.0 } }"#).unwrap();
//! assert_eq!(config.dash.distance, 90.0);
//! // Untouched sections keep their defaults.
//! assert_eq!(config.player.attack_cooldown_ms, 500);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::clock::Millis;

/// Errors produced while loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document was not valid JSON or did not match the schema.
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but violates an invariant the simulation relies on.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

// =============================================================================
// Sections
// =============================================================================

/// Motion integration and terrain response constants. Units are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration applied while airborne.
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up).
    pub jump_force: f32,
    /// Terminal downward speed.
    pub max_fall_speed: f32,
    /// Horizontal velocity multiplier applied each grounded tick.
    pub friction: f32,
    /// Horizontal speeds below this snap to zero under friction.
    pub velocity_epsilon: f32,
    /// Horizontal speed above which a grounded entity counts as running.
    pub run_threshold: f32,
    /// Depth of the ground sensor probed below an entity's feet.
    pub ground_sensor_depth: f32,
    /// Keep entities inside the terrain's horizontal extent.
    pub clamp_to_world: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_force: -10.0,
            max_fall_speed: 15.0,
            friction: 0.8,
            velocity_epsilon: 0.1,
            run_threshold: 0.5,
            ground_sensor_depth: 1.0,
            clamp_to_world: true,
        }
    }
}

/// Per-kind body and attack tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorProfile {
    /// Collider width and height.
    pub size: Vec2,
    /// Horizontal speed set by a move input.
    pub move_speed: f32,
    /// Minimum time between accepted attacks.
    pub attack_cooldown_ms: Millis,
    /// Length of the attack state.
    pub attack_duration_ms: Millis,
    /// Window after the swing starts during which the hit-box is live.
    pub active_window_ms: Millis,
    /// Length of hit-stun before death.
    pub take_hit_duration_ms: Millis,
}

impl ActorProfile {
    /// Default player tuning.
    #[must_use]
    pub fn player() -> Self {
        Self {
            size: Vec2::new(32.0, 50.0),
            move_speed: 4.0,
            attack_cooldown_ms: 500,
            attack_duration_ms: 300,
            active_window_ms: 100,
            take_hit_duration_ms: 300,
        }
    }

    /// Default enemy tuning.
    #[must_use]
    pub fn enemy() -> Self {
        Self {
            size: Vec2::new(32.0, 50.0),
            move_speed: 3.0,
            attack_cooldown_ms: 1000,
            attack_duration_ms: 300,
            active_window_ms: 100,
            take_hit_duration_ms: 300,
        }
    }
}

impl Default for ActorProfile {
    fn default() -> Self {
        Self::player()
    }
}

/// Hit reaction and parry tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Horizontal push applied on entering hit-stun.
    pub knockback_force: f32,
    /// Upward pop applied on entering hit-stun (positive = up).
    pub knockback_lift: f32,
    /// Horizontal push applied to a defender that parries.
    pub parry_knockback: f32,
    /// Minimum time between accepted parries.
    pub parry_cooldown_ms: Millis,
    /// Length of the parry state.
    pub parry_duration_ms: Millis,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            knockback_force: 5.0,
            knockback_lift: 4.0,
            parry_knockback: 6.0,
            parry_cooldown_ms: 800,
            parry_duration_ms: 200,
        }
    }
}

/// Dash unlock, cooldown curve, and movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Instantaneous forward offset applied at dash start.
    pub distance: f32,
    /// Length of the dash (and its invulnerability).
    pub duration_ms: Millis,
    /// Defeats required before dash unlocks.
    pub min_enemies: u32,
    /// Cooldown at exactly `min_enemies` defeats.
    pub base_cooldown_ms: Millis,
    /// Cooldown reduction per defeat beyond `min_enemies`.
    pub reduction_per_enemy_ms: Millis,
}

impl DashConfig {
    /// Dash cooldown after `defeated` enemies.
    ///
    /// `max(0, base - max(0, defeated - min_enemies) * reduction)`.
    ///
    /// # Example
    ///
    /// ```
    /// use emberfall_core::config::DashConfig;
    ///
    /// let dash = DashConfig::default();
    /// assert_eq!(dash.cooldown(15), 3000);
    /// assert_eq!(dash.cooldown(16), 2800);
    /// assert_eq!(dash.cooldown(1_000), 0);
    /// ```
    #[must_use]
    pub fn cooldown(&self, defeated: u32) -> Millis {
        let excess = Millis::from(defeated.saturating_sub(self.min_enemies));
        self.base_cooldown_ms
            .saturating_sub(excess.saturating_mul(self.reduction_per_enemy_ms))
    }

    /// True once enough enemies are defeated to dash at all.
    #[must_use]
    pub fn unlocked(&self, defeated: u32) -> bool {
        defeated >= self.min_enemies
    }
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            distance: 75.0,
            duration_ms: 200,
            min_enemies: 15,
            base_cooldown_ms: 3000,
            reduction_per_enemy_ms: 200,
        }
    }
}

/// Enemy decision thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Beyond this distance the enemy ignores the player.
    pub detection_range: f32,
    /// Within this distance the enemy attacks instead of approaching.
    pub attack_range: f32,
    /// Horizontal dead zone inside which the enemy stops walking.
    pub move_threshold: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            detection_range: 300.0,
            attack_range: 65.0,
            move_threshold: 5.0,
        }
    }
}

/// Wave director: corpse removal and replacement spawning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Time an enemy stays in Death before it is removed.
    pub death_animation_ms: Millis,
    /// Horizontal offset of replacements from the fallen enemy.
    pub replacement_offset: f32,
    /// Replacement spawns allowed over the whole run.
    pub max_spawns: u32,
    /// Height at which randomly placed enemies are dropped in.
    pub spawn_height: f32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            death_animation_ms: 1350,
            replacement_offset: 50.0,
            max_spawns: 3,
            spawn_height: 0.0,
        }
    }
}

// =============================================================================
// SimConfig
// =============================================================================

/// Complete simulation tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Motion and terrain response.
    pub physics: PhysicsConfig,
    /// Player body and attack tuning.
    pub player: ActorProfile,
    /// Enemy body and attack tuning.
    pub enemy: ActorProfile,
    /// Hit reaction and parry tuning.
    pub combat: CombatConfig,
    /// Dash tuning.
    pub dash: DashConfig,
    /// Enemy AI thresholds.
    pub ai: AiConfig,
    /// Wave director tuning.
    pub director: DirectorConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            player: ActorProfile::player(),
            enemy: ActorProfile::enemy(),
            combat: CombatConfig::default(),
            dash: DashConfig::default(),
            ai: AiConfig::default(),
            director: DirectorConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parses a (possibly partial) JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value breaks an invariant.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the resolvers rely on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("player.size", self.player.size)?;
        check_size("enemy.size", self.enemy.size)?;

        let p = &self.physics;
        if !(p.max_fall_speed > 0.0) {
            return Err(invalid("physics.max_fall_speed", "must be positive"));
        }
        if !(p.gravity >= 0.0) {
            return Err(invalid("physics.gravity", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&p.friction) {
            return Err(invalid("physics.friction", "must lie in [0, 1]"));
        }
        if !(p.ground_sensor_depth > 0.0) {
            return Err(invalid("physics.ground_sensor_depth", "must be positive"));
        }
        if !(self.ai.attack_range >= 0.0 && self.ai.detection_range >= self.ai.attack_range) {
            return Err(invalid(
                "ai.detection_range",
                "must be at least as large as ai.attack_range",
            ));
        }

        if self.enemy.move_speed > self.player.move_speed {
            warn!(
                enemy = self.enemy.move_speed,
                player = self.player.move_speed,
                "enemy move speed exceeds player move speed"
            );
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

fn check_size(field: &'static str, size: Vec2) -> Result<(), ConfigError> {
    if size.x > 0.0 && size.y > 0.0 && size.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("collider size must be positive, got {size}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod dash_cooldown_tests {
        use super::*;

        #[test]
        fn locked_below_minimum() {
            let dash = DashConfig::default();
            assert!(!dash.unlocked(14));
            assert!(dash.unlocked(15));
        }

        #[test]
        fn base_cooldown_at_minimum() {
            let dash = DashConfig::default();
            assert_eq!(dash.cooldown(15), dash.base_cooldown_ms);
            // Below the unlock threshold the formula clamps the excess at zero.
            assert_eq!(dash.cooldown(3), dash.base_cooldown_ms);
        }

        #[test]
        fn strictly_decreasing_until_floor() {
            let dash = DashConfig::default();
            let mut previous = dash.cooldown(15);
            for k in 1..=15 {
                let current = dash.cooldown(15 + k);
                assert!(current < previous, "k={k}: {current} !< {previous}");
                previous = current;
            }
            assert_eq!(previous, 0);
            assert_eq!(dash.cooldown(31), 0);
            assert_eq!(dash.cooldown(u32::MAX), 0);
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn empty_document_yields_defaults() {
            let config = SimConfig::from_json_str("{}").unwrap();
            assert_eq!(config, SimConfig::default());
        }

        #[test]
        fn partial_override_keeps_other_fields() {
            let config =
                SimConfig::from_json_str(r#"{ "physics": { "gravity": 0.75 } }"#).unwrap();
            assert_eq!(config.physics.gravity, 0.75);
            assert_eq!(config.physics.friction, 0.8);
            assert_eq!(config.enemy, ActorProfile::enemy());
        }

        #[test]
        fn round_trips_through_json() {
            let config = SimConfig::default();
            let json = serde_json::to_string(&config).unwrap();
            let back = SimConfig::from_json_str(&json).unwrap();
            assert_eq!(config, back);
        }

        #[test]
        fn malformed_json_is_a_parse_error() {
            let err = SimConfig::from_json_str("{ physics: ").unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            assert!(SimConfig::default().validate().is_ok());
        }

        #[test]
        fn zero_height_collider_is_rejected() {
            let mut config = SimConfig::default();
            config.enemy.size = Vec2::new(32.0, 0.0);
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "enemy.size", .. }));
        }

        #[test]
        fn friction_above_one_is_rejected() {
            let mut config = SimConfig::default();
            config.physics.friction = 1.5;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid { field: "physics.friction", .. })
            ));
        }

        #[test]
        fn attack_range_beyond_detection_is_rejected() {
            let mut config = SimConfig::default();
            config.ai.attack_range = 500.0;
            assert!(config.validate().is_err());
        }
    }
}
