//! `wallnav-hal` – Device Boundary
//!
//! Everything the navigation core needs from the robot, and nothing more.
//!
//! # Modules
//!
//! - [`device`] – [`RobotDevice`][device::RobotDevice]: the lockstep device
//!   interface (proximity and light readings, tick advance, simulated clock,
//!   wheel velocities, indicator output) plus the
//!   [`DeviceCapabilities`][device::DeviceCapabilities] probed at setup.
//! - [`indicator`] – [`IndicatorMapper`][indicator::IndicatorMapper]: maps an
//!   [`IndicatorState`][wallnav_types::IndicatorState] onto an opaque output
//!   value.  [`LedColorMapper`][indicator::LedColorMapper] implements the
//!   `r + 2g + 4b` LED color packing.
//! - [`sim`] – [`SimRobot`][sim::SimRobot]: an in-process device that replays
//!   a recorded [`SensorTrace`][sim::SensorTrace] so the full controller can
//!   run headless in tests and CI.

pub mod device;
pub mod indicator;
pub mod sim;

pub use device::{DeviceCapabilities, RobotDevice};
pub use indicator::{IndicatorMapper, LedColorMapper, Rgb};
pub use sim::{SensorTrace, SimRobot, TraceSample};
