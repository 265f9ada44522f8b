//! Scroll speed progression
//!
//! Speed only ever grows within a run: each time the score reaches the next
//! threshold the speed is multiplied and the threshold moves up one step.

use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedController {
    /// Scroll speed in pixels per frame
    pub current: f32,
    /// Score at which the next increase happens
    pub next_threshold: u32,
}

impl SpeedController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            current: tuning.initial_scroll_speed,
            next_threshold: tuning.speed_threshold_step,
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Apply at most one increase for this frame; returns true if it fired.
    ///
    /// A score that jumps over several thresholds catches up one step per
    /// frame.
    pub fn update(&mut self, score: u32, tuning: &Tuning) -> bool {
        if score < self.next_threshold {
            return false;
        }
        self.current *= tuning.speed_increase_factor;
        self.next_threshold = self.next_threshold.saturating_add(tuning.speed_threshold_step);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_increase_below_threshold() {
        let tuning = Tuning::default();
        let mut speed = SpeedController::new(&tuning);
        assert!(!speed.update(90, &tuning));
        assert_eq!(speed.current, tuning.initial_scroll_speed);
        assert_eq!(speed.next_threshold, 100);
    }

    #[test]
    fn test_increase_at_threshold() {
        let tuning = Tuning::default();
        let mut speed = SpeedController::new(&tuning);
        assert!(speed.update(100, &tuning));
        assert!((speed.current - 4.0 * 1.10).abs() < 1e-5);
        assert_eq!(speed.next_threshold, 200);
        // Same score again does nothing
        assert!(!speed.update(100, &tuning));
    }

    #[test]
    fn test_one_step_per_frame_catch_up() {
        let tuning = Tuning::default();
        let mut speed = SpeedController::new(&tuning);
        assert!(speed.update(250, &tuning));
        assert_eq!(speed.next_threshold, 200);
        assert!(speed.update(250, &tuning));
        assert_eq!(speed.next_threshold, 300);
        assert!(!speed.update(250, &tuning));
        assert!((speed.current - 4.0 * 1.10 * 1.10).abs() < 1e-5);
    }

    #[test]
    fn test_reset() {
        let tuning = Tuning::default();
        let mut speed = SpeedController::new(&tuning);
        speed.update(100, &tuning);
        speed.reset(&tuning);
        assert_eq!(speed, SpeedController::new(&tuning));
    }
}
