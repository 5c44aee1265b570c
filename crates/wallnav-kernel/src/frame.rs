//! Sensor frame builder.
//!
//! Picks the three proximity sensors the wall-following law uses out of the
//! eight-sensor ring and packs them, with the optional light reading, into a
//! [`SensorFrame`].

use tracing::debug;
use wallnav_types::SensorFrame;

/// Number of proximity sensors on the ring (`ps0..ps7`).
pub const PROXIMITY_SENSOR_COUNT: usize = 8;
pub const FRONT_LEFT_INDEX: usize = 0;
pub const FRONT_RIGHT_INDEX: usize = 7;
pub const SIDE_RIGHT_INDEX: usize = 2;

/// Build this tick's [`SensorFrame`].
///
/// `read_proximity` gives indexed access to the ring.  Readings are passed
/// through untouched; an index that yields no signal is read as `0.0`.
pub fn build_frame<F>(read_proximity: F, light: Option<f64>) -> SensorFrame
where
    F: Fn(usize) -> Option<f64>,
{
    let read = |index: usize| {
        read_proximity(index).unwrap_or_else(|| {
            debug!(index, "proximity sensor gave no signal; reading as 0");
            0.0
        })
    };

    SensorFrame {
        front_left: read(FRONT_LEFT_INDEX),
        front_right: read(FRONT_RIGHT_INDEX),
        side_right: read(SIDE_RIGHT_INDEX),
        light,
    }
}
