//! [`RunLoop`] – tick-synchronous controller loop and termination policy.
//!
//! Each call to [`RunLoop::step`] is one control cycle:
//!
//! 1. **Check** – in order: external stop (stop flag set, or the device
//!    refuses to advance another tick), goal reached, stuck watchdog tripped.
//!    The first that applies ends the run.
//! 2. **Sense** – build a [`SensorFrame`][wallnav_types::SensorFrame] from
//!    the device's proximity ring and light sensor.
//! 3. **Decide** – run the [`NavigationEngine`] against the frame.
//! 4. **Act** – write wheel velocities and the indicator to the device.  A
//!    collision reverse is committed for a fixed number of extra ticks before
//!    control returns here.
//! 5. **Measure** – integrate the commanded velocities into the distance
//!    estimate.
//!
//! The loop is single-threaded and cooperative.  The stop flag is only read
//! at the top of a cycle, never mid-tick.
//!
//! # Example
//!
//! ```rust
//! use wallnav_hal::sim::SimRobot;
//! use wallnav_kernel::{GoalDetection, NavigationEngine, Thresholds};
//! use wallnav_runtime::run_loop::{RunLoop, RunLoopConfig};
//! use wallnav_types::{SensorFrame, TerminationCause};
//!
//! let robot = SimRobot::from_frames(&[SensorFrame::new(0.0, 0.0, 90.0); 3]);
//! let engine = NavigationEngine::new(Thresholds::default(), GoalDetection::Enabled);
//! let mut run = RunLoop::new(robot, engine, RunLoopConfig::default());
//!
//! let report = run.run();
//! assert_eq!(report.final_cause, TerminationCause::ExternalStop);
//! assert_eq!(report.collisions, 0);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;
use wallnav_hal::device::RobotDevice;
use wallnav_kernel::frame::{PROXIMITY_SENSOR_COUNT, build_frame};
use wallnav_kernel::metrics::accumulate;
use wallnav_kernel::{ControllerState, NavigationEngine, StuckWatchdog, WatchdogStatus};
use wallnav_types::{
    IndicatorState, MotorCommand, NavError, NavigationReport, TerminationCause, WheelSide,
};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Duration of one control tick.
pub const DEFAULT_TICK: Duration = Duration::from_millis(64);

/// Extra ticks a collision reverse is held for.
pub const DEFAULT_REVERSE_HOLD_TICKS: u32 = 5;

/// Configuration bundle for [`RunLoop`].
#[derive(Debug, Clone, Copy)]
pub struct RunLoopConfig {
    pub tick: Duration,
    pub reverse_hold_ticks: u32,
    pub watchdog: StuckWatchdog,
    /// Log every control cycle at `info` instead of `debug`.
    pub log_every_tick: bool,
}

impl Default for RunLoopConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            reverse_hold_ticks: DEFAULT_REVERSE_HOLD_TICKS,
            watchdog: StuckWatchdog::default(),
            log_every_tick: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RunLoop
// ─────────────────────────────────────────────────────────────────────────────

/// Drives a [`RobotDevice`] with a [`NavigationEngine`] until the run ends.
pub struct RunLoop<D: RobotDevice> {
    device: D,
    engine: NavigationEngine,
    config: RunLoopConfig,
    state: ControllerState,
    cause: TerminationCause,
    stop: Arc<AtomicBool>,
    /// Set when the device refused a tick during a held maneuver.
    device_ended: bool,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    cycles: u64,
}

impl<D: RobotDevice> RunLoop<D> {
    /// Set up a run on `device`.
    ///
    /// Optional devices that are missing are logged.  Without a light sensor
    /// goal detection is switched off for the whole run.
    pub fn new(device: D, mut engine: NavigationEngine, config: RunLoopConfig) -> Self {
        let caps = device.capabilities();
        if caps.proximity_sensors < PROXIMITY_SENSOR_COUNT {
            warn!(
                found = caps.proximity_sensors,
                expected = PROXIMITY_SENSOR_COUNT,
                "proximity ring incomplete; missing sensors read as 0"
            );
        }
        for missing in caps.unavailable() {
            match &missing {
                NavError::DeviceUnavailable { device: name, .. } if name == "light_sensor" => {
                    if engine.goal_detection_enabled() {
                        warn!(error = %missing, "no light sensor; goal detection disabled");
                    }
                    engine.disable_goal_detection();
                }
                _ => debug!(error = %missing, "optional device unavailable"),
            }
        }

        let mut state = ControllerState::new();
        state.begin(device.time());

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            tick_ms = config.tick.as_millis() as u64,
            goal_detection = engine.goal_detection_enabled(),
            stuck_watchdog = config.watchdog.enabled,
            max_stuck = config.watchdog.max_stuck,
            "controller started"
        );

        Self {
            device,
            engine,
            config,
            state,
            cause: TerminationCause::Running,
            stop: Arc::new(AtomicBool::new(false)),
            device_ended: false,
            run_id,
            started_at: Utc::now(),
            finished_at: None,
            cycles: 0,
        }
    }

    /// Observe `flag` as an external stop request (e.g. Ctrl-C).
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = flag;
        self
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Current run state; [`TerminationCause::Running`] until the run ends.
    pub fn cause(&self) -> TerminationCause {
        self.cause
    }

    /// Number of control cycles that reached a decision.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one control cycle.
    ///
    /// Returns [`TerminationCause::Running`] while the run continues, or the
    /// terminal cause once it has ended.  Calling `step` after termination
    /// does nothing and returns the same cause.
    pub fn step(&mut self) -> TerminationCause {
        if self.cause.is_terminal() {
            return self.cause;
        }
        if let Some(cause) = self.check_termination() {
            self.terminate(cause);
            return cause;
        }

        let device = &self.device;
        let frame = build_frame(|index| device.read_proximity(index), device.read_light());
        let decision = self.engine.decide(&frame, &mut self.state);
        self.apply(decision.command, decision.indicator);
        self.cycles += 1;

        if self.config.log_every_tick {
            info!(
                cycle = self.cycles,
                maneuver = ?decision.maneuver,
                indicator = %decision.indicator,
                "control cycle active"
            );
        } else {
            debug!(
                cycle = self.cycles,
                maneuver = ?decision.maneuver,
                indicator = %decision.indicator,
                stuck_counter = self.state.stuck_counter(),
                "control cycle"
            );
        }

        let hold = decision.hold_ticks(self.config.reverse_hold_ticks);
        self.hold(hold);

        accumulate(decision.command, self.config.tick, &mut self.state);
        TerminationCause::Running
    }

    /// Step until the run ends and return its report.
    pub fn run(&mut self) -> NavigationReport {
        while !self.step().is_terminal() {}
        self.report()
    }

    /// Snapshot of the run's metrics.
    ///
    /// Before termination `finished_at` is the time of the snapshot.
    pub fn report(&self) -> NavigationReport {
        NavigationReport {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: self.finished_at.unwrap_or_else(Utc::now),
            total_time: self.state.total_time(),
            distance: self.state.distance(),
            collisions: self.state.collisions(),
            goal_reached: self.state.goal_reached(),
            final_cause: self.cause,
        }
    }

    // -------------------------------------------------------------------------
    // Private helpers
    // -------------------------------------------------------------------------

    fn check_termination(&mut self) -> Option<TerminationCause> {
        if self.stop.load(Ordering::SeqCst) {
            info!("external stop requested");
            return Some(TerminationCause::ExternalStop);
        }
        if self.device_ended || !self.device.advance_tick(self.config.tick) {
            info!("simulation ended");
            return Some(TerminationCause::ExternalStop);
        }
        if self.state.goal_reached() {
            return Some(TerminationCause::GoalReached);
        }
        if self.config.watchdog.check(&self.state) == WatchdogStatus::Stuck {
            return Some(TerminationCause::Stuck);
        }
        None
    }

    /// Let `ticks` extra device ticks pass with the current command applied.
    fn hold(&mut self, ticks: u32) {
        for _ in 0..ticks {
            if !self.device.advance_tick(self.config.tick) {
                self.device_ended = true;
                break;
            }
        }
    }

    fn apply(&mut self, command: MotorCommand, indicator: IndicatorState) {
        self.device.set_motor_velocity(WheelSide::Left, command.left);
        self.device.set_motor_velocity(WheelSide::Right, command.right);
        self.device.set_indicator(indicator);
    }

    fn terminate(&mut self, cause: TerminationCause) {
        self.cause = cause;
        let indicator = match cause {
            TerminationCause::Stuck => IndicatorState::Stuck,
            _ if self.state.goal_reached() => IndicatorState::Goal,
            _ => IndicatorState::Idle,
        };
        self.apply(MotorCommand::stop(), indicator);
        self.state.finish(self.device.time());
        self.finished_at = Some(Utc::now());

        if cause == TerminationCause::Stuck {
            warn!(
                stuck_counter = self.state.stuck_counter(),
                "robot stuck; stopped for safety"
            );
        }
        info!(
            run_id = %self.run_id,
            %cause,
            cycles = self.cycles,
            total_time = self.state.total_time(),
            distance = self.state.distance(),
            collisions = self.state.collisions(),
            goal_reached = self.state.goal_reached(),
            "controller finished"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
