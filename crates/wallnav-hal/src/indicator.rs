//! Indicator output mapping.
//!
//! The engine only decides *which* [`IndicatorState`] to show.  Turning that
//! into something a device understands is done here, on the device side.

use wallnav_types::IndicatorState;

/// Maps an [`IndicatorState`] onto an opaque, device-specific output value.
pub trait IndicatorMapper {
    fn encode(&self, state: IndicatorState) -> u32;
}

/// An on/off RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed LED value: `r + 2g + 4b`.
    pub fn code(self) -> u32 {
        u32::from(self.r) + u32::from(self.g) * 2 + u32::from(self.b) * 4
    }
}

/// Color scheme of the e-puck style LED ring.
///
/// | State | Color | Code |
/// |---|---|---|
/// | go | (1, 0, 0) | 1 |
/// | turning | (0, 0, 1) | 4 |
/// | obstacle | (0, 1, 0) | 2 |
/// | goal | (1, 1, 0) | 3 |
/// | stuck | (1, 0, 1) | 5 |
/// | idle | off | 0 |
#[derive(Debug, Clone, Copy, Default)]
pub struct LedColorMapper;

impl LedColorMapper {
    pub fn color(state: IndicatorState) -> Rgb {
        match state {
            IndicatorState::Go => Rgb::new(1, 0, 0),
            IndicatorState::Turning => Rgb::new(0, 0, 1),
            IndicatorState::Obstacle => Rgb::new(0, 1, 0),
            IndicatorState::Goal => Rgb::new(1, 1, 0),
            IndicatorState::Stuck => Rgb::new(1, 0, 1),
            IndicatorState::Idle => Rgb::default(),
        }
    }
}

impl IndicatorMapper for LedColorMapper {
    fn encode(&self, state: IndicatorState) -> u32 {
        Self::color(state).code()
    }
}
