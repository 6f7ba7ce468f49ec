//! Rolling history
//!
//! Fixed-capacity, time-ordered buffer of recent smoothed values per tracked
//! channel, plus a shared timestamp sequence of equal length. Owned and
//! mutated only by the stream processor; the chart collaborator reads it.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Ring-buffer history of `(timestamp, smoothed value)` per channel.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    timestamps: VecDeque<DateTime<Utc>>,
    channels: Vec<VecDeque<f64>>,
    capacity: usize,
}

impl RollingHistory {
    /// Create a history for `channel_count` series, each capped at `capacity`
    /// entries (both >= 1; validated by the config layer).
    pub fn new(channel_count: usize, capacity: usize) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(capacity),
            channels: (0..channel_count)
                .map(|_| VecDeque::with_capacity(capacity))
                .collect(),
            capacity,
        }
    }

    /// Append one timestamped value per channel, evicting the oldest entries
    /// once past capacity. `values` must be index-aligned with the channels.
    pub fn push(&mut self, timestamp: DateTime<Utc>, values: &[f64]) {
        self.timestamps.push_back(timestamp);
        while self.timestamps.len() > self.capacity {
            self.timestamps.pop_front();
        }
        for (series, &value) in self.channels.iter_mut().zip(values) {
            series.push_back(value);
            while series.len() > self.capacity {
                series.pop_front();
            }
        }
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Shared timestamp sequence, oldest first.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.timestamps.iter().copied()
    }

    /// One channel's series, oldest first.
    pub fn series(&self, channel: usize) -> Option<impl Iterator<Item = f64> + '_> {
        self.channels.get(channel).map(|s| s.iter().copied())
    }

    /// Drop all retained entries, keeping capacity and channel count.
    pub fn clear(&mut self) {
        self.timestamps.clear();
        for series in &mut self.channels {
            series.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap() + chrono::Duration::seconds(seconds)
    }

    #[test]
    fn test_append_keeps_series_aligned() {
        let mut history = RollingHistory::new(2, 4);
        history.push(t(0), &[1.0, 10.0]);
        history.push(t(1), &[2.0, 20.0]);

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.series(0).unwrap().collect::<Vec<_>>(),
            vec![1.0, 2.0]
        );
        assert_eq!(
            history.series(1).unwrap().collect::<Vec<_>>(),
            vec![10.0, 20.0]
        );
        assert_eq!(history.timestamps().collect::<Vec<_>>(), vec![t(0), t(1)]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = RollingHistory::new(1, 3);
        for i in 0..4 {
            history.push(t(i), &[i as f64]);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(
            history.series(0).unwrap().collect::<Vec<_>>(),
            vec![1.0, 2.0, 3.0]
        );
        assert_eq!(history.timestamps().next(), Some(t(1)));
    }

    #[test]
    fn test_length_stays_constant_at_capacity() {
        let mut history = RollingHistory::new(1, 40);
        for i in 0..100 {
            history.push(t(i), &[0.0]);
            assert!(history.len() <= 40);
        }
        assert_eq!(history.len(), 40);
    }

    #[test]
    fn test_unknown_channel_is_none() {
        let history = RollingHistory::new(2, 4);
        assert!(history.series(2).is_none());
    }
}
