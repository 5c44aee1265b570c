//! Tunable thresholds and gains of the wall-following control law.
//!
//! The defaults are the hand-tuned values of the e-puck controller.  Every
//! field can be overridden from configuration; missing fields keep their
//! default.

use serde::{Deserialize, Serialize};
use wallnav_types::NavError;

/// Maximum wheel speed of the e-puck motors, in rad/s.
#[allow(clippy::approx_constant)]
pub const DEFAULT_MAX_SPEED: f64 = 6.28;

/// Thresholds (sensor units) and gains (fractions of `max_speed`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Both front sensors above this means the robot has hit something.
    pub collision_threshold: f64,
    /// Either front sensor above this means an obstacle is ahead.
    pub obstacle_threshold: f64,
    /// Side-right below this means the wall on the right has been lost.
    pub clear_threshold: f64,
    /// Light intensity above this means the goal has been reached.
    pub goal_light_threshold: f64,
    pub max_speed: f64,
    pub turn_gain_in_place: f64,
    /// Left (outer) wheel gain of the right-hand arc.
    pub arc_outer_gain: f64,
    /// Right (inner) wheel gain of the right-hand arc.
    pub arc_inner_gain: f64,
    pub cruise_gain: f64,
    pub reverse_gain: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            collision_threshold: 100.0,
            obstacle_threshold: 80.0,
            clear_threshold: 60.0,
            goal_light_threshold: 600.0,
            max_speed: DEFAULT_MAX_SPEED,
            turn_gain_in_place: 0.4,
            arc_outer_gain: 0.6,
            arc_inner_gain: 0.2,
            cruise_gain: 0.5,
            reverse_gain: 0.5,
        }
    }
}

impl Thresholds {
    /// Reject values the control law cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Config`] when `max_speed` is not a positive finite
    /// number, when any threshold or gain is negative or not finite, or when
    /// `obstacle_threshold` exceeds `collision_threshold`.
    pub fn validate(&self) -> Result<(), NavError> {
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(NavError::Config(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }

        let fields = [
            ("collision_threshold", self.collision_threshold),
            ("obstacle_threshold", self.obstacle_threshold),
            ("clear_threshold", self.clear_threshold),
            ("goal_light_threshold", self.goal_light_threshold),
            ("turn_gain_in_place", self.turn_gain_in_place),
            ("arc_outer_gain", self.arc_outer_gain),
            ("arc_inner_gain", self.arc_inner_gain),
            ("cruise_gain", self.cruise_gain),
            ("reverse_gain", self.reverse_gain),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(NavError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        // A collision must also register as an obstacle ahead.
        if self.obstacle_threshold > self.collision_threshold {
            return Err(NavError::Config(format!(
                "obstacle_threshold ({}) must not exceed collision_threshold ({})",
                self.obstacle_threshold, self.collision_threshold
            )));
        }
        Ok(())
    }

    /// Copy with a usable `max_speed`.
    ///
    /// A zero, negative or non-finite speed is replaced by
    /// [`DEFAULT_MAX_SPEED`] so wheel commands stay finite and clamping is
    /// well defined.  Other fields are left as given.
    pub fn normalized(self) -> Self {
        if self.max_speed.is_finite() && self.max_speed > 0.0 {
            return self;
        }
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            ..self
        }
    }
}
