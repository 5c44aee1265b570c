//! [`NavigationEngine`] – the per-tick decision rule set.
//!
//! Each tick the engine classifies the [`SensorFrame`] with four rules,
//! evaluated in strict priority order.  The first match wins:
//!
//! | # | Rule | Condition | Wheels (× `max_speed`) | Indicator | Progress |
//! |---|---|---|---|---|---|
//! | 1 | Collision | `front_left > collision` **and** `front_right > collision` | `-reverse`, `-reverse` | obstacle | no |
//! | 2 | Obstacle ahead | `front_left > obstacle` **or** `front_right > obstacle` | `+turn`, `-turn` | turning | no |
//! | 3 | Right side clear | `side_right < clear` | `arc_outer`, `arc_inner` | turning | yes |
//! | 4 | Cruise | otherwise | `cruise`, `cruise` | go | yes |
//!
//! Rule 3 steers back toward a lost wall on the right, which is what makes
//! the robot follow the right-hand wall.
//!
//! Goal detection is independent of the motion rules.  When enabled it runs
//! on every tick: a light reading above `goal_light_threshold` latches
//! `goal_reached` and replaces the indicator with goal, while the motion
//! command of that tick is still issued.
//!
//! # Example
//!
//! ```
//! use wallnav_kernel::engine::{GoalDetection, Maneuver, NavigationEngine};
//! use wallnav_kernel::state::ControllerState;
//! use wallnav_kernel::thresholds::Thresholds;
//! use wallnav_types::{IndicatorState, SensorFrame};
//!
//! let engine = NavigationEngine::new(Thresholds::default(), GoalDetection::Disabled);
//! let mut state = ControllerState::new();
//!
//! let decision = engine.decide(&SensorFrame::new(120.0, 130.0, 0.0), &mut state);
//! assert_eq!(decision.maneuver, Maneuver::Reverse);
//! assert_eq!(decision.indicator, IndicatorState::Obstacle);
//! assert_eq!(state.collisions(), 1);
//! ```

use tracing::{debug, trace, warn};
use wallnav_types::{IndicatorState, MotorCommand, SensorFrame};

use crate::state::ControllerState;
use crate::thresholds::Thresholds;

// ────────────────────────────────────────────────────────────────────────────
// Public types
// ────────────────────────────────────────────────────────────────────────────

/// Whether the engine may declare the goal reached from light readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalDetection {
    Enabled,
    /// No light sensor: `goal_reached` can never be set by the engine.
    Disabled,
}

/// Motion chosen for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    /// Straight reverse after a collision, held for several ticks.
    Reverse,
    /// In-place clockwise pivot away from an obstacle ahead.
    Pivot,
    /// Forward arc to the right, toward a lost wall.
    ArcRight,
    /// Straight ahead along the wall.
    Cruise,
}

impl Maneuver {
    /// Whether this maneuver counts as progress for the stuck watchdog.
    pub fn makes_progress(&self) -> bool {
        matches!(self, Maneuver::ArcRight | Maneuver::Cruise)
    }
}

/// Outcome of one [`NavigationEngine::decide`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub command: MotorCommand,
    pub indicator: IndicatorState,
    pub maneuver: Maneuver,
    /// Whether this tick reset the stuck counter.
    pub progress: bool,
}

impl Decision {
    /// Extra ticks the run loop must hold this command before deciding again.
    pub fn hold_ticks(&self, reverse_hold_ticks: u32) -> u32 {
        match self.maneuver {
            Maneuver::Reverse => reverse_hold_ticks,
            _ => 0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// NavigationEngine
// ────────────────────────────────────────────────────────────────────────────

/// Right-hand wall-following decision engine.
#[derive(Debug, Clone)]
pub struct NavigationEngine {
    thresholds: Thresholds,
    goal_detection: GoalDetection,
}

impl NavigationEngine {
    /// Build an engine.  An unusable `max_speed` (zero, negative or not
    /// finite) is replaced by the default so deciding never fails.
    pub fn new(thresholds: Thresholds, goal_detection: GoalDetection) -> Self {
        let normalized = thresholds.normalized();
        if normalized.max_speed != thresholds.max_speed {
            warn!(
                max_speed = thresholds.max_speed,
                using = normalized.max_speed,
                "unusable max_speed replaced by default"
            );
        }
        Self {
            thresholds: normalized,
            goal_detection,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn goal_detection_enabled(&self) -> bool {
        self.goal_detection == GoalDetection::Enabled
    }

    /// Permanently turn goal detection off, e.g. when no light sensor exists.
    pub fn disable_goal_detection(&mut self) {
        self.goal_detection = GoalDetection::Disabled;
    }

    /// Apply the priority rules to `frame`.
    pub fn classify(&self, frame: &SensorFrame) -> Maneuver {
        let t = &self.thresholds;
        if frame.front_left > t.collision_threshold && frame.front_right > t.collision_threshold {
            Maneuver::Reverse
        } else if frame.front_left > t.obstacle_threshold || frame.front_right > t.obstacle_threshold
        {
            Maneuver::Pivot
        } else if frame.side_right < t.clear_threshold {
            Maneuver::ArcRight
        } else {
            Maneuver::Cruise
        }
    }

    /// Wheel velocities for `maneuver`, clamped to `max_speed`.
    pub fn command_for(&self, maneuver: Maneuver) -> MotorCommand {
        let t = &self.thresholds;
        let (left, right) = match maneuver {
            Maneuver::Reverse => (-t.reverse_gain, -t.reverse_gain),
            Maneuver::Pivot => (t.turn_gain_in_place, -t.turn_gain_in_place),
            Maneuver::ArcRight => (t.arc_outer_gain, t.arc_inner_gain),
            Maneuver::Cruise => (t.cruise_gain, t.cruise_gain),
        };
        MotorCommand::new(left * t.max_speed, right * t.max_speed).clamped(t.max_speed)
    }

    /// Decide this tick's command and indicator, updating `state`.
    pub fn decide(&self, frame: &SensorFrame, state: &mut ControllerState) -> Decision {
        let maneuver = self.classify(frame);
        let command = self.command_for(maneuver);
        let mut indicator = match maneuver {
            Maneuver::Reverse => IndicatorState::Obstacle,
            Maneuver::Pivot | Maneuver::ArcRight => IndicatorState::Turning,
            Maneuver::Cruise => IndicatorState::Go,
        };

        if maneuver == Maneuver::Reverse {
            state.record_collision();
            debug!(
                front_left = frame.front_left,
                front_right = frame.front_right,
                collisions = state.collisions(),
                "collision detected"
            );
        }
        let progress = maneuver.makes_progress();
        state.record_progress(progress);

        if self.goal_detection_enabled()
            && let Some(light) = frame.light
            && light > self.thresholds.goal_light_threshold
        {
            if !state.goal_reached() {
                debug!(light, "goal light detected");
            }
            state.mark_goal_reached();
            indicator = IndicatorState::Goal;
        }

        trace!(?maneuver, ?command, %indicator, "tick decided");
        Decision {
            command,
            indicator,
            maneuver,
            progress,
        }
    }
}

/// Single-call form of [`NavigationEngine::decide`].
///
/// Goal detection is enabled exactly when the frame carries a light reading.
pub fn decide(
    frame: &SensorFrame,
    state: &mut ControllerState,
    config: &Thresholds,
) -> (MotorCommand, IndicatorState) {
    let goal_detection = if frame.light.is_some() {
        GoalDetection::Enabled
    } else {
        GoalDetection::Disabled
    };
    let decision = NavigationEngine::new(*config, goal_detection).decide(frame, state);
    (decision.command, decision.indicator)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
