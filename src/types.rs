//! Core types for the touchstream pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: processor configuration, per-channel touch state, per-line
//! snapshots, and the periodic log record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default touch threshold applied to smoothed deltas
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// Default moving-average window (number of raw deltas averaged)
pub const DEFAULT_SMOOTHING_WINDOW: usize = 2;

/// Default rolling-history capacity (samples retained for charting)
pub const DEFAULT_HISTORY_CAPACITY: usize = 40;

/// Default sampling interval for the continuous logger (milliseconds)
pub const DEFAULT_LOG_INTERVAL_MS: u64 = 100;

/// How a smoothed delta is compared against the threshold.
///
/// The two deployed sensor program variants disagreed on this comparison;
/// it is configurable here with `Inclusive` as the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Touch when `value >= threshold`
    #[default]
    Inclusive,
    /// Touch when `value > threshold`
    Strict,
}

impl ThresholdMode {
    /// Evaluate the configured comparison.
    pub fn exceeds(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdMode::Inclusive => value >= threshold,
            ThresholdMode::Strict => value > threshold,
        }
    }
}

/// Configuration for a [`StreamProcessor`](crate::processor::StreamProcessor).
///
/// Fixed at construction; the processor never changes its shape mid-session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Number of tracked electrodes (N). Each input line carries `2 * N` fields.
    pub electrode_count: usize,
    /// Touch threshold applied to smoothed deltas
    pub threshold: f64,
    /// Moving-average window size (K)
    pub smoothing_window: usize,
    /// Rolling-history capacity in samples
    pub history_capacity: usize,
    /// Electrode indices of the two monitored channels, each in `[0, N)`
    pub channels: (usize, usize),
    /// Threshold comparison mode
    pub threshold_mode: ThresholdMode,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            electrode_count: 1,
            threshold: DEFAULT_THRESHOLD,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            channels: (0, 0),
            threshold_mode: ThresholdMode::default(),
        }
    }
}

impl ProcessorConfig {
    /// Number of numeric fields expected on each input line.
    pub fn expected_fields(&self) -> usize {
        self.electrode_count * 2
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.electrode_count == 0 {
            return Err(ConfigError::NoElectrodes);
        }
        if self.smoothing_window == 0 {
            return Err(ConfigError::EmptySmoothingWindow);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        for channel in [self.channels.0, self.channels.1] {
            if channel >= self.electrode_count {
                return Err(ConfigError::ChannelOutOfRange {
                    channel,
                    electrodes: self.electrode_count,
                });
            }
        }
        Ok(())
    }
}

/// Touch classification state for one monitored channel.
///
/// Invariant: `active_since` is `Some` iff `active` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchState {
    /// Whether the channel currently reads as touched
    pub active: bool,
    /// Number of Inactive -> Active transitions this session
    pub activation_count: u32,
    /// Total seconds spent in the Active state across completed touches
    pub cumulative_active_seconds: f64,
    /// When the current touch began, if one is in progress
    pub active_since: Option<DateTime<Utc>>,
}

impl TouchState {
    /// Seconds accumulated so far, including the in-progress touch if any.
    pub fn active_seconds_at(&self, now: DateTime<Utc>) -> f64 {
        let in_progress = self
            .active_since
            .map(|since| (now - since).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);
        self.cumulative_active_seconds + in_progress
    }
}

/// Immutable output record for one successfully processed line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the line was processed
    pub timestamp: DateTime<Utc>,
    /// Smoothed delta per tracked electrode, index-aligned with the sensor
    pub smoothed: Vec<f64>,
    /// Smoothed delta of monitored channel 1
    pub delta1: f64,
    /// Smoothed delta of monitored channel 2
    pub delta2: f64,
    /// Touch state of monitored channel 1 after this line
    pub channel1: TouchState,
    /// Touch state of monitored channel 2 after this line
    pub channel2: TouchState,
}

/// One row of the continuous log, sampled from the latest [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Wall-clock time the record was sampled
    pub timestamp: DateTime<Utc>,
    /// Seconds since logging started
    pub elapsed_seconds: f64,
    pub delta1: f64,
    pub count1: u32,
    pub timer1_seconds: f64,
    pub delta2: f64,
    pub count2: u32,
    pub timer2_seconds: f64,
}

impl LogRecord {
    /// Header row preceding all data rows when records are persisted as CSV.
    pub const CSV_HEADER: &'static str =
        "Timestamp,ElapsedSeconds,Delta1,Count1,Timer1Seconds,Delta2,Count2,Timer2Seconds";

    /// Build a record from the latest snapshot, or an all-zero record if no
    /// line has been processed yet.
    pub fn sample(
        snapshot: Option<&Snapshot>,
        timestamp: DateTime<Utc>,
        elapsed_seconds: f64,
    ) -> Self {
        match snapshot {
            Some(snap) => Self {
                timestamp,
                elapsed_seconds,
                delta1: snap.delta1,
                count1: snap.channel1.activation_count,
                timer1_seconds: snap.channel1.cumulative_active_seconds,
                delta2: snap.delta2,
                count2: snap.channel2.activation_count,
                timer2_seconds: snap.channel2.cumulative_active_seconds,
            },
            None => Self {
                timestamp,
                elapsed_seconds,
                delta1: 0.0,
                count1: 0,
                timer1_seconds: 0.0,
                delta2: 0.0,
                count2: 0,
                timer2_seconds: 0.0,
            },
        }
    }

    /// Render the record as one CSV data row.
    pub fn csv_row(&self) -> String {
        format!(
            "{},{:.2},{:.2},{},{:.2},{:.2},{},{:.2}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.elapsed_seconds,
            self.delta1,
            self.count1,
            self.timer1_seconds,
            self.delta2,
            self.count2,
            self.timer2_seconds,
        )
    }
}
