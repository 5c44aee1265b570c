//! Distance metric integrated from commanded wheel velocities.
//!
//! `distance += |(left + right) / 2| × tick`.  The commanded, not measured,
//! velocities are used, so an in-place pivot contributes almost nothing even
//! though both wheels turn.  That undercount is part of the metric's
//! definition; do not replace it with per-wheel odometry.

use std::time::Duration;

use wallnav_types::MotorCommand;

use crate::state::ControllerState;

/// Distance covered by `command` held for `tick_duration`.
pub fn tick_distance(command: MotorCommand, tick_duration: Duration) -> f64 {
    command.average().abs() * tick_duration.as_secs_f64()
}

/// Add one tick's distance to `state`.
pub fn accumulate(command: MotorCommand, tick_duration: Duration, state: &mut ControllerState) {
    state.add_distance(tick_distance(command, tick_duration));
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(64);

    #[test]
    fn reverse_counts_as_distance() {
        let mut state = ControllerState::new();
        accumulate(MotorCommand::new(-3.0, -3.0), TICK, &mut state);
        assert!((state.distance() - 3.0 * 0.064).abs() < 1e-12);
    }

    #[test]
    fn pivot_adds_nothing() {
        let mut state = ControllerState::new();
        accumulate(MotorCommand::new(2.5, -2.5), TICK, &mut state);
        assert_eq!(state.distance(), 0.0);
    }

    #[test]
    fn matches_golden_sum_and_never_decreases() {
        let commands = [
            MotorCommand::new(-3.0, -3.0),
            MotorCommand::new(2.0, -2.0),
            MotorCommand::new(4.0, 1.0),
            MotorCommand::new(3.0, 3.0),
            MotorCommand::new(-1.0, 0.5),
            MotorCommand::stop(),
        ];
        let mut state = ControllerState::new();
        let mut expected = 0.0;
        let mut previous = 0.0;
        for cmd in commands {
            accumulate(cmd, TICK, &mut state);
            expected += ((cmd.left + cmd.right) / 2.0).abs() * 0.064;
            assert!(state.distance() >= previous);
            previous = state.distance();
        }
        // 0.192 + 0 + 0.16 + 0.192 + 0.016 + 0
        assert!((state.distance() - expected).abs() < 1e-12);
        assert!((state.distance() - 0.56).abs() < 1e-12);
    }
}
