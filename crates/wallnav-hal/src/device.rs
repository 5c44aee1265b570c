//! Generic `RobotDevice` trait for the sensor/actuator collaborator.
//!
//! The navigation core never touches hardware or a simulator directly.  It
//! talks to this trait once per tick, in lockstep with the device clock, so a
//! Webots-style controller binding, a serial bridge, and the in-process
//! [`SimRobot`][crate::sim::SimRobot] are interchangeable.

use std::time::Duration;

use wallnav_types::{IndicatorState, NavError, WheelSide};

/// Devices found when the robot was set up.
///
/// Proximity sensors and wheel motors are mandatory.  Every other device is
/// optional and its absence only disables the feature that depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Number of proximity sensors that were found and enabled.
    pub proximity_sensors: usize,
    /// A light sensor is present; required for goal detection.
    pub light_sensor: bool,
    pub gyro: bool,
    pub accelerometer: bool,
    /// Enabled for parity with the physical robot; frames are never consumed.
    pub camera: bool,
    /// Number of indicator LEDs that were found.
    pub indicators: usize,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            proximity_sensors: 8,
            light_sensor: false,
            gyro: false,
            accelerometer: false,
            camera: false,
            indicators: 0,
        }
    }
}

impl DeviceCapabilities {
    /// One [`NavError::DeviceUnavailable`] per optional device that is missing.
    pub fn unavailable(&self) -> Vec<NavError> {
        let mut missing = Vec::new();
        let optional = [
            ("light_sensor", self.light_sensor, "goal detection disabled"),
            ("gyro", self.gyro, "not used by the controller"),
            ("accelerometer", self.accelerometer, "not used by the controller"),
            ("camera", self.camera, "not used by the controller"),
            ("indicators", self.indicators > 0, "state indicators will not be shown"),
        ];
        for (device, present, details) in optional {
            if !present {
                missing.push(NavError::DeviceUnavailable {
                    device: device.to_string(),
                    details: details.to_string(),
                });
            }
        }
        missing
    }
}

/// The robot as seen by the run loop.
///
/// All methods are infallible: readings are trusted and actuator writes are
/// fire-and-forget, exactly like the simulator controller API they abstract.
pub trait RobotDevice {
    /// Devices detected at setup.
    fn capabilities(&self) -> DeviceCapabilities;

    /// Proximity reading at `index` (0..8), or `None` when that sensor gives
    /// no signal.
    fn read_proximity(&self, index: usize) -> Option<f64>;

    /// Light intensity, or `None` when no light sensor is configured.
    fn read_light(&self) -> Option<f64>;

    /// Advance the device clock by one tick of `duration`.
    ///
    /// Returns `false` once the simulation has ended and no further ticks are
    /// available.
    fn advance_tick(&mut self, duration: Duration) -> bool;

    /// Simulated time in seconds.  Monotonic.
    fn time(&self) -> f64;

    /// Set the velocity target of one wheel motor.
    fn set_motor_velocity(&mut self, side: WheelSide, value: f64);

    /// Show `state` on the robot's indicators.
    fn set_indicator(&mut self, state: IndicatorState);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-process device used only for tests.
    struct MockDevice {
        time: f64,
        left: f64,
        right: f64,
        indicator: IndicatorState,
    }

    impl RobotDevice for MockDevice {
        fn capabilities(&self) -> DeviceCapabilities {
            DeviceCapabilities::default()
        }

        fn read_proximity(&self, index: usize) -> Option<f64> {
            (index < 8).then_some(index as f64 * 10.0)
        }

        fn read_light(&self) -> Option<f64> {
            None
        }

        fn advance_tick(&mut self, duration: Duration) -> bool {
            self.time += duration.as_secs_f64();
            true
        }

        fn time(&self) -> f64 {
            self.time
        }

        fn set_motor_velocity(&mut self, side: WheelSide, value: f64) {
            match side {
                WheelSide::Left => self.left = value,
                WheelSide::Right => self.right = value,
            }
        }

        fn set_indicator(&mut self, state: IndicatorState) {
            self.indicator = state;
        }
    }

    #[test]
    fn mock_device_drives_and_ticks() {
        let mut dev = MockDevice {
            time: 0.0,
            left: 0.0,
            right: 0.0,
            indicator: IndicatorState::Idle,
        };
        assert!(dev.advance_tick(Duration::from_millis(64)));
        assert!((dev.time() - 0.064).abs() < 1e-12);

        dev.set_motor_velocity(WheelSide::Left, 1.0);
        dev.set_motor_velocity(WheelSide::Right, -1.0);
        dev.set_indicator(IndicatorState::Turning);
        assert!((dev.left - 1.0).abs() < f64::EPSILON);
        assert!((dev.right + 1.0).abs() < f64::EPSILON);
        assert_eq!(dev.indicator, IndicatorState::Turning);

        assert_eq!(dev.read_proximity(7), Some(70.0));
        assert_eq!(dev.read_proximity(8), None);
        assert!(dev.read_light().is_none());
    }

    #[test]
    fn default_capabilities_report_every_optional_device_missing() {
        let missing = DeviceCapabilities::default().unavailable();
        assert_eq!(missing.len(), 5);
        assert!(missing.iter().all(|e| matches!(e, NavError::DeviceUnavailable { .. })));
        assert!(missing[0].to_string().contains("light_sensor"));
    }

    #[test]
    fn full_capabilities_report_nothing_missing() {
        let caps = DeviceCapabilities {
            proximity_sensors: 8,
            light_sensor: true,
            gyro: true,
            accelerometer: true,
            camera: true,
            indicators: 10,
        };
        assert!(caps.unavailable().is_empty());
    }
}
