//! [`ControllerState`] – the controller's memory across ticks.
//!
//! Owned by the run loop and mutated once per tick by the decision engine and
//! the metrics accumulator.  Fields are private so the monotonic counters can
//! only move in one direction.

/// Persistent state of one navigation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    collisions: u32,
    goal_reached: bool,
    stuck_counter: u32,
    distance: f64,
    elapsed_start: Option<f64>,
    elapsed_end: Option<f64>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collision ticks so far.  Never decreases.
    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    /// Whether the goal light has been seen.  Never reset once set.
    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// Consecutive ticks without progress.
    pub fn stuck_counter(&self) -> u32 {
        self.stuck_counter
    }

    /// Distance estimated from commanded velocities.  Never decreases.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Simulated time at which the run started.
    pub fn elapsed_start(&self) -> Option<f64> {
        self.elapsed_start
    }

    /// Simulated time at which the run ended.
    pub fn elapsed_end(&self) -> Option<f64> {
        self.elapsed_end
    }

    /// Seconds between [`begin`][Self::begin] and [`finish`][Self::finish].
    ///
    /// Zero until both timestamps have been captured.
    pub fn total_time(&self) -> f64 {
        match (self.elapsed_start, self.elapsed_end) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Capture the run start time.  Only the first call has an effect.
    pub fn begin(&mut self, time: f64) {
        self.elapsed_start.get_or_insert(time);
    }

    /// Capture the run end time.  Only the first call has an effect.
    pub fn finish(&mut self, time: f64) {
        self.elapsed_end.get_or_insert(time);
    }

    pub(crate) fn record_collision(&mut self) {
        self.collisions = self.collisions.saturating_add(1);
    }

    /// Progress resets the stuck counter; anything else bumps it.
    pub(crate) fn record_progress(&mut self, progress: bool) {
        if progress {
            self.stuck_counter = 0;
        } else {
            self.stuck_counter = self.stuck_counter.saturating_add(1);
        }
    }

    pub(crate) fn mark_goal_reached(&mut self) {
        self.goal_reached = true;
    }

    pub(crate) fn add_distance(&mut self, delta: f64) {
        if delta.is_finite() && delta > 0.0 {
            self.distance += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_zeroed() {
        let state = ControllerState::new();
        assert_eq!(state.collisions(), 0);
        assert!(!state.goal_reached());
        assert_eq!(state.stuck_counter(), 0);
        assert_eq!(state.distance(), 0.0);
        assert_eq!(state.total_time(), 0.0);
    }

    #[test]
    fn progress_resets_stuck_counter() {
        let mut state = ControllerState::new();
        state.record_progress(false);
        state.record_progress(false);
        assert_eq!(state.stuck_counter(), 2);
        state.record_progress(true);
        assert_eq!(state.stuck_counter(), 0);
    }

    #[test]
    fn distance_ignores_negative_and_non_finite_deltas() {
        let mut state = ControllerState::new();
        state.add_distance(0.5);
        state.add_distance(-1.0);
        state.add_distance(f64::NAN);
        assert_eq!(state.distance(), 0.5);
    }

    #[test]
    fn timestamps_are_captured_once() {
        let mut state = ControllerState::new();
        state.begin(1.0);
        state.begin(2.0);
        state.finish(4.5);
        state.finish(9.0);
        assert_eq!(state.elapsed_start(), Some(1.0));
        assert_eq!(state.elapsed_end(), Some(4.5));
        assert!((state.total_time() - 3.5).abs() < f64::EPSILON);
    }
}
