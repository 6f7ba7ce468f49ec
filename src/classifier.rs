//! Touch classification
//!
//! Per-channel two-state machine over smoothed deltas. Crossing the threshold
//! counts an activation and starts the touch timer; dropping back below it
//! folds the elapsed touch into the cumulative timer.

use chrono::{DateTime, Utc};

use crate::types::{ThresholdMode, TouchState};

/// Threshold-based touch state machine for one monitored channel.
///
/// `update` must be called with monotonically non-decreasing timestamps for
/// the accumulated timer to be meaningful; that ordering is the caller's
/// responsibility.
#[derive(Debug, Clone)]
pub struct TouchClassifier {
    threshold: f64,
    mode: ThresholdMode,
    state: TouchState,
}

impl TouchClassifier {
    pub fn new(threshold: f64, mode: ThresholdMode) -> Self {
        Self {
            threshold,
            mode,
            state: TouchState::default(),
        }
    }

    /// Classify a new smoothed value and return the state after processing.
    pub fn update(&mut self, smoothed: f64, now: DateTime<Utc>) -> TouchState {
        if self.mode.exceeds(smoothed, self.threshold) {
            if !self.state.active {
                self.state.active = true;
                self.state.activation_count += 1;
                self.state.active_since = Some(now);
            }
            // Re-entry while active changes nothing.
        } else if self.state.active {
            if let Some(since) = self.state.active_since.take() {
                self.state.cumulative_active_seconds +=
                    (now - since).num_milliseconds() as f64 / 1000.0;
            }
            self.state.active = false;
        }
        self.state.clone()
    }

    /// Current state without processing a value.
    pub fn state(&self) -> &TouchState {
        &self.state
    }

    /// Clear count, timer, and any in-progress touch.
    pub fn reset(&mut self) {
        self.state = TouchState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap() + chrono::Duration::seconds(seconds)
    }

    #[test]
    fn test_single_touch_counts_once_and_times_exactly() {
        let mut classifier = TouchClassifier::new(10.0, ThresholdMode::Inclusive);

        let s0 = classifier.update(5.0, t(0));
        assert!(!s0.active);

        let s1 = classifier.update(10.0, t(1));
        assert!(s1.active);
        assert_eq!(s1.activation_count, 1);
        assert_eq!(s1.active_since, Some(t(1)));

        // Still above threshold: idempotent re-entry
        let s2 = classifier.update(15.0, t(2));
        assert_eq!(s2.activation_count, 1);
        assert_eq!(s2.active_since, Some(t(1)));

        // Falls below: touch lasted t(1) -> t(3) = 2 seconds
        let s3 = classifier.update(8.0, t(3));
        assert!(!s3.active);
        assert_eq!(s3.active_since, None);
        assert!((s3.cumulative_active_seconds - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_timer_accumulates_across_touches() {
        let mut classifier = TouchClassifier::new(10.0, ThresholdMode::Inclusive);
        classifier.update(12.0, t(0));
        classifier.update(2.0, t(1)); // 1s
        classifier.update(12.0, t(2));
        let state = classifier.update(2.0, t(5)); // 3s

        assert_eq!(state.activation_count, 2);
        assert!((state.cumulative_active_seconds - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_strict_mode_excludes_threshold_value() {
        let mut classifier = TouchClassifier::new(10.0, ThresholdMode::Strict);
        let state = classifier.update(10.0, t(0));
        assert!(!state.active);
        assert_eq!(state.activation_count, 0);

        let state = classifier.update(10.5, t(1));
        assert!(state.active);
    }

    #[test]
    fn test_active_since_set_iff_active() {
        let mut classifier = TouchClassifier::new(10.0, ThresholdMode::Inclusive);
        for (value, seconds) in [(5.0, 0), (15.0, 1), (15.0, 2), (3.0, 3), (20.0, 4)] {
            let state = classifier.update(value, t(seconds));
            assert_eq!(state.active, state.active_since.is_some());
        }
    }

    #[test]
    fn test_reset_clears_session_state() {
        let mut classifier = TouchClassifier::new(10.0, ThresholdMode::Inclusive);
        classifier.update(12.0, t(0));
        classifier.update(2.0, t(1));
        classifier.reset();

        assert_eq!(*classifier.state(), TouchState::default());
    }
}
