//! In-process simulated robot for CI/CD testing without a simulator.
//!
//! [`SimRobot`] replays a [`SensorTrace`] one sample per tick and records
//! every motor and indicator command it receives.  This lets the complete
//! controller run headless in tests and CI pipelines.
//!
//! # Trace format
//!
//! ```json
//! {
//!   "light_sensor": true,
//!   "samples": [
//!     { "proximity": [120, 0, 120, 0, 0, 0, 0, 0], "light": 10.0 },
//!     { "proximity": [0, 0, 0, 0, 0, 0, 0, 90] }
//!   ]
//! }
//! ```
//!
//! A sample with fewer than eight proximity entries reports "no signal" for
//! the missing indices.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use wallnav_hal::device::RobotDevice;
//! use wallnav_hal::sim::SimRobot;
//! use wallnav_types::SensorFrame;
//!
//! let mut robot = SimRobot::from_frames(&[SensorFrame::new(120.0, 0.0, 120.0)]);
//! assert!(robot.advance_tick(Duration::from_millis(64)));
//! assert_eq!(robot.read_proximity(0), Some(120.0));
//! assert!(!robot.advance_tick(Duration::from_millis(64)));
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wallnav_types::{IndicatorState, MotorCommand, NavError, SensorFrame, WheelSide};

use crate::device::{DeviceCapabilities, RobotDevice};
use crate::indicator::{IndicatorMapper, LedColorMapper};

/// Number of indicator LEDs on the simulated robot.
const SIM_LED_COUNT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Trace format
// ────────────────────────────────────────────────────────────────────────────

/// One tick worth of recorded sensor readings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceSample {
    /// Proximity readings indexed `ps0..ps7`.
    pub proximity: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<f64>,
}

/// A recorded sequence of sensor samples, replayed by [`SimRobot`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorTrace {
    /// Whether the recorded robot carried a light sensor.
    #[serde(default)]
    pub light_sensor: bool,
    #[serde(default)]
    pub samples: Vec<TraceSample>,
}

impl SensorTrace {
    /// Parse a trace from its JSON representation.
    pub fn from_json(raw: &str) -> Result<Self, NavError> {
        serde_json::from_str(raw).map_err(|e| NavError::Trace(format!("invalid trace: {e}")))
    }

    /// Load a trace from a JSON file.
    pub fn load(path: &Path) -> Result<Self, NavError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            NavError::Trace(format!("failed to read trace at {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimRobot
// ────────────────────────────────────────────────────────────────────────────

/// A simulated differential-drive robot that replays a [`SensorTrace`].
///
/// Sample `k` becomes visible after the `k + 1`-th successful
/// [`advance_tick`][RobotDevice::advance_tick].  Once the trace is
/// exhausted `advance_tick` returns `false`, which the run loop treats as the
/// end of the simulation.
pub struct SimRobot {
    samples: Vec<TraceSample>,
    light_sensor: bool,
    ticks: usize,
    time: f64,
    command: MotorCommand,
    indicator: IndicatorState,
    indicator_history: Vec<IndicatorState>,
    leds: [u32; SIM_LED_COUNT],
    mapper: LedColorMapper,
}

impl SimRobot {
    pub fn new(trace: SensorTrace) -> Self {
        Self {
            samples: trace.samples,
            light_sensor: trace.light_sensor,
            ticks: 0,
            time: 0.0,
            command: MotorCommand::stop(),
            indicator: IndicatorState::Idle,
            indicator_history: Vec::new(),
            leds: [0; SIM_LED_COUNT],
            mapper: LedColorMapper,
        }
    }

    /// Build a trace from already-typed frames, placing the readings at the
    /// front-left (0), side-right (2) and front-right (7) sensor positions.
    ///
    /// The robot gets a light sensor when any frame carries a light reading.
    pub fn from_frames(frames: &[SensorFrame]) -> Self {
        let light_sensor = frames.iter().any(|f| f.light.is_some());
        let samples = frames
            .iter()
            .map(|f| {
                let mut proximity = vec![0.0; 8];
                proximity[0] = f.front_left;
                proximity[2] = f.side_right;
                proximity[7] = f.front_right;
                TraceSample {
                    proximity,
                    light: f.light,
                }
            })
            .collect();
        Self::new(SensorTrace {
            light_sensor,
            samples,
        })
    }

    /// Most recently commanded wheel velocities.
    pub fn command(&self) -> MotorCommand {
        self.command
    }

    /// Indicator currently shown.
    pub fn indicator(&self) -> IndicatorState {
        self.indicator
    }

    /// Every indicator change, in order.
    pub fn indicator_history(&self) -> &[IndicatorState] {
        &self.indicator_history
    }

    /// Encoded value currently driven onto the LEDs.
    pub fn led_value(&self) -> u32 {
        self.leds[0]
    }

    /// Number of successful tick advances so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    fn current(&self) -> Option<&TraceSample> {
        self.samples.get(self.ticks.saturating_sub(1))
    }
}

impl RobotDevice for SimRobot {
    fn capabilities(&self) -> DeviceCapabilities {
        DeviceCapabilities {
            proximity_sensors: 8,
            light_sensor: self.light_sensor,
            gyro: false,
            accelerometer: false,
            camera: true,
            indicators: SIM_LED_COUNT,
        }
    }

    fn read_proximity(&self, index: usize) -> Option<f64> {
        self.current()?.proximity.get(index).copied()
    }

    fn read_light(&self) -> Option<f64> {
        if !self.light_sensor {
            return None;
        }
        self.current()?.light
    }

    fn advance_tick(&mut self, duration: Duration) -> bool {
        if self.ticks >= self.samples.len() {
            debug!(ticks = self.ticks, "sim trace exhausted");
            return false;
        }
        self.ticks += 1;
        self.time += duration.as_secs_f64();
        true
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn set_motor_velocity(&mut self, side: WheelSide, value: f64) {
        match side {
            WheelSide::Left => self.command.left = value,
            WheelSide::Right => self.command.right = value,
        }
    }

    fn set_indicator(&mut self, state: IndicatorState) {
        let code = self.mapper.encode(state);
        self.leds.iter_mut().for_each(|led| *led = code);
        self.indicator = state;
        self.indicator_history.push(state);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(64);

    #[test]
    fn replays_one_sample_per_tick() {
        let mut robot = SimRobot::from_frames(&[
            SensorFrame::new(120.0, 5.0, 30.0),
            SensorFrame::new(1.0, 2.0, 3.0),
        ]);
        assert!(robot.advance_tick(TICK));
        assert_eq!(robot.read_proximity(0), Some(120.0));
        assert_eq!(robot.read_proximity(7), Some(5.0));
        assert_eq!(robot.read_proximity(2), Some(30.0));

        assert!(robot.advance_tick(TICK));
        assert_eq!(robot.read_proximity(0), Some(1.0));

        assert!(!robot.advance_tick(TICK));
        assert_eq!(robot.ticks(), 2);
        assert!((robot.time() - 0.128).abs() < 1e-12);
    }

    #[test]
    fn empty_trace_ends_immediately() {
        let mut robot = SimRobot::new(SensorTrace::default());
        assert!(!robot.advance_tick(TICK));
        assert_eq!(robot.read_proximity(0), None);
        assert_eq!(robot.time(), 0.0);
    }

    #[test]
    fn short_sample_reports_no_signal() {
        let trace = SensorTrace::from_json(r#"{"samples":[{"proximity":[10,20,30]}]}"#).unwrap();
        let mut robot = SimRobot::new(trace);
        robot.advance_tick(TICK);
        assert_eq!(robot.read_proximity(2), Some(30.0));
        assert_eq!(robot.read_proximity(7), None);
    }

    #[test]
    fn light_is_hidden_without_light_sensor() {
        let trace = SensorTrace::from_json(
            r#"{"light_sensor":false,"samples":[{"proximity":[0,0,0,0,0,0,0,0],"light":900}]}"#,
        )
        .unwrap();
        let mut robot = SimRobot::new(trace);
        robot.advance_tick(TICK);
        assert!(!robot.capabilities().light_sensor);
        assert_eq!(robot.read_light(), None);
    }

    #[test]
    fn from_frames_enables_light_sensor_when_present() {
        let mut robot = SimRobot::from_frames(&[SensorFrame::new(0.0, 0.0, 0.0).with_light(650.0)]);
        assert!(robot.capabilities().light_sensor);
        robot.advance_tick(TICK);
        assert_eq!(robot.read_light(), Some(650.0));
    }

    #[test]
    fn records_motor_and_indicator_commands() {
        let mut robot = SimRobot::from_frames(&[]);
        robot.set_motor_velocity(WheelSide::Left, 3.0);
        robot.set_motor_velocity(WheelSide::Right, -3.0);
        robot.set_indicator(IndicatorState::Obstacle);
        robot.set_indicator(IndicatorState::Go);

        assert_eq!(robot.command(), MotorCommand::new(3.0, -3.0));
        assert_eq!(robot.indicator(), IndicatorState::Go);
        assert_eq!(
            robot.indicator_history(),
            &[IndicatorState::Obstacle, IndicatorState::Go]
        );
        assert_eq!(robot.led_value(), 1);
    }

    #[test]
    fn trace_load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = SensorTrace::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, NavError::Trace(_)));
    }

    #[test]
    fn trace_load_reads_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("trace.json");
        fs::write(
            &path,
            r#"{"light_sensor":true,"samples":[{"proximity":[1,2,3,4,5,6,7,8],"light":42.0}]}"#,
        )
        .unwrap();
        let trace = SensorTrace::load(&path).unwrap();
        assert!(trace.light_sensor);
        assert_eq!(trace.samples.len(), 1);
        assert_eq!(trace.samples[0].light, Some(42.0));
    }
}
