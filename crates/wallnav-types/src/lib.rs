use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Proximity (and optional light) readings captured for a single tick.
///
/// Built fresh every tick by the frame builder and consumed by exactly one
/// decision call.  Values are raw sensor units and are never validated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorFrame {
    pub front_left: f64,
    pub front_right: f64,
    pub side_right: f64,
    /// `None` when no light sensor is configured.
    pub light: Option<f64>,
}

impl SensorFrame {
    /// Frame with the three proximity readings and no light reading.
    pub fn new(front_left: f64, front_right: f64, side_right: f64) -> Self {
        Self {
            front_left,
            front_right,
            side_right,
            light: None,
        }
    }

    /// Attach a light reading to the frame.
    pub fn with_light(mut self, light: f64) -> Self {
        self.light = Some(light);
        self
    }
}

/// Which wheel of the differential-drive base a velocity applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelSide {
    Left,
    Right,
}

/// Commanded wheel velocities (rad/s) for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: f64,
    pub right: f64,
}

impl MotorCommand {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Both wheels stopped.
    pub fn stop() -> Self {
        Self::default()
    }

    /// Clamp each wheel to `[-|max_speed|, |max_speed|]`.
    ///
    /// A NaN limit leaves the command unchanged.
    pub fn clamped(self, max_speed: f64) -> Self {
        let limit = max_speed.abs();
        if limit.is_nan() {
            return self;
        }
        Self {
            left: self.left.clamp(-limit, limit),
            right: self.right.clamp(-limit, limit),
        }
    }

    /// Mean of the two commanded wheel velocities.
    pub fn average(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn velocity(&self, side: WheelSide) -> f64 {
        match side {
            WheelSide::Left => self.left,
            WheelSide::Right => self.right,
        }
    }
}

/// Visual state shown on the robot's indicators.
///
/// A pure function of the current tick's classification; how each state is
/// rendered on physical LEDs is the device layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorState {
    Go,
    Turning,
    Obstacle,
    Goal,
    Stuck,
    #[default]
    Idle,
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorState::Go => "go",
            IndicatorState::Turning => "turning",
            IndicatorState::Obstacle => "obstacle",
            IndicatorState::Goal => "goal",
            IndicatorState::Stuck => "stuck",
            IndicatorState::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// State of the run loop.  `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    #[default]
    Running,
    GoalReached,
    Stuck,
    ExternalStop,
}

impl TerminationCause {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TerminationCause::Running)
    }
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationCause::Running => "running",
            TerminationCause::GoalReached => "goal_reached",
            TerminationCause::Stuck => "stuck",
            TerminationCause::ExternalStop => "external_stop",
        };
        f.write_str(name)
    }
}

/// Final metrics of one navigation run, handed to the reporting side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationReport {
    pub run_id: Uuid,
    /// Wall-clock time at which the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock time at which the run ended.
    pub finished_at: DateTime<Utc>,
    /// Simulated seconds between run start and termination.
    pub total_time: f64,
    /// Distance estimated from commanded wheel velocities.
    pub distance: f64,
    pub collisions: u32,
    pub goal_reached: bool,
    pub final_cause: TerminationCause,
}

/// Error type for the recoverable failure classes of the controller.
///
/// None of these are fatal: a missing optional device disables the feature
/// that needs it, and a report that cannot be written is only logged.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum NavError {
    #[error("Device Unavailable: {device}: {details}")]
    DeviceUnavailable { device: String, details: String },

    #[error("Report Persistence Failed: {0}")]
    Persistence(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Sensor Trace Error: {0}")]
    Trace(String),
}
