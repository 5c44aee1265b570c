//! [`StuckWatchdog`] – no-progress detector.
//!
//! The decision engine bumps the controller's stuck counter on every tick
//! that makes no progress (collision reverse, in-place pivot) and resets it
//! on every tick that does (arc, cruise).  The watchdog compares that counter
//! against a ceiling so the run loop can stop a robot that is trapped.
//!
//! A disabled watchdog still lets the counter grow; it simply never trips.

use serde::{Deserialize, Serialize};

use crate::state::ControllerState;

/// Default number of consecutive no-progress ticks tolerated.
pub const DEFAULT_MAX_STUCK: u32 = 50;

/// Result of a watchdog check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogStatus {
    /// The watchdog is switched off.
    Disabled,
    Healthy,
    /// The stuck counter reached the ceiling.
    Stuck,
}

/// Trips once the stuck counter reaches `max_stuck`.
///
/// # Example
///
/// ```
/// use wallnav_kernel::state::ControllerState;
/// use wallnav_kernel::watchdog::{StuckWatchdog, WatchdogStatus};
///
/// let watchdog = StuckWatchdog::new(50);
/// assert_eq!(watchdog.check(&ControllerState::new()), WatchdogStatus::Healthy);
/// assert_eq!(StuckWatchdog::disabled().check(&ControllerState::new()), WatchdogStatus::Disabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StuckWatchdog {
    pub enabled: bool,
    pub max_stuck: u32,
}

impl Default for StuckWatchdog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STUCK)
    }
}

impl StuckWatchdog {
    /// An enabled watchdog with the given ceiling.
    pub fn new(max_stuck: u32) -> Self {
        Self {
            enabled: true,
            max_stuck,
        }
    }

    /// A watchdog that never trips.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_stuck: DEFAULT_MAX_STUCK,
        }
    }

    pub fn check(&self, state: &ControllerState) -> WatchdogStatus {
        if !self.enabled {
            WatchdogStatus::Disabled
        } else if state.stuck_counter() >= self.max_stuck {
            WatchdogStatus::Stuck
        } else {
            WatchdogStatus::Healthy
        }
    }
}
