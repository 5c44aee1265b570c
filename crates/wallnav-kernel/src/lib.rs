//! `wallnav-kernel` – Navigation Core
//!
//! The only part of wallnav that makes decisions or keeps state across
//! ticks.  Pure arithmetic and comparisons: no I/O, no device access, and
//! nothing here can fail.
//!
//! # Modules
//!
//! - [`frame`] – [`build_frame`][frame::build_frame]: picks front-left,
//!   front-right and side-right out of the proximity ring.
//! - [`thresholds`] – [`Thresholds`][thresholds::Thresholds]: tunable
//!   thresholds and gains of the control law.
//! - [`state`] – [`ControllerState`][state::ControllerState]: collision,
//!   goal, stuck and distance bookkeeping for one run.
//! - [`engine`] – [`NavigationEngine`][engine::NavigationEngine]: the
//!   priority-ordered right-hand wall-following rules plus goal detection.
//! - [`watchdog`] – [`StuckWatchdog`][watchdog::StuckWatchdog]: trips when
//!   too many consecutive ticks make no progress.
//! - [`metrics`] – [`accumulate`][metrics::accumulate]: distance estimate
//!   from commanded wheel velocities.

pub mod engine;
pub mod frame;
pub mod metrics;
pub mod state;
pub mod thresholds;
pub mod watchdog;

pub use engine::{Decision, GoalDetection, Maneuver, NavigationEngine, decide};
pub use frame::build_frame;
pub use metrics::accumulate;
pub use state::ControllerState;
pub use thresholds::Thresholds;
pub use watchdog::{StuckWatchdog, WatchdogStatus};
