//! Pipeline orchestration
//!
//! The stream processor drives one line through the full pipeline:
//! decode -> delta extraction -> smoothing -> touch classification ->
//! rolling history -> snapshot. A rejected line mutates nothing: smoothing,
//! classification, and history writes only happen after decoding and delta
//! extraction have fully succeeded.

use chrono::{DateTime, Utc};

use crate::classifier::TouchClassifier;
use crate::decoder::LineDecoder;
use crate::delta::DeltaExtractor;
use crate::error::{ConfigError, ProcessError};
use crate::history::RollingHistory;
use crate::smoother::Smoother;
use crate::types::{ProcessorConfig, Snapshot, TouchState};

/// Stateful per-session processor: N independent smoothers, two touch
/// classifiers, and the rolling history for charting.
pub struct StreamProcessor {
    config: ProcessorConfig,
    decoder: LineDecoder,
    extractor: DeltaExtractor,
    smoothers: Vec<Smoother>,
    classifier1: TouchClassifier,
    classifier2: TouchClassifier,
    history: RollingHistory,
}

impl StreamProcessor {
    /// Build a processor from a validated configuration.
    pub fn new(config: ProcessorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let smoothers = (0..config.electrode_count)
            .map(|_| Smoother::new(config.smoothing_window))
            .collect();

        Ok(Self {
            decoder: LineDecoder::new(config.expected_fields()),
            extractor: DeltaExtractor::new(config.electrode_count),
            smoothers,
            classifier1: TouchClassifier::new(config.threshold, config.threshold_mode),
            classifier2: TouchClassifier::new(config.threshold, config.threshold_mode),
            history: RollingHistory::new(config.electrode_count, config.history_capacity),
            config,
        })
    }

    /// Process one raw line observed at `now`.
    ///
    /// `now` must be monotonically non-decreasing across calls; the touch
    /// timers depend on it.
    pub fn process_line(&mut self, line: &str, now: DateTime<Utc>) -> Result<Snapshot, ProcessError> {
        let sample = self.decoder.decode(line)?;
        let deltas = self.extractor.extract(&sample)?;

        // Everything below this point mutates state; nothing above does.
        let smoothed: Vec<f64> = self
            .smoothers
            .iter_mut()
            .zip(&deltas)
            .map(|(smoother, &delta)| smoother.update(delta))
            .collect();

        let delta1 = smoothed[self.config.channels.0];
        let delta2 = smoothed[self.config.channels.1];
        let channel1 = self.classifier1.update(delta1, now);
        let channel2 = self.classifier2.update(delta2, now);

        self.history.push(now, &smoothed);

        Ok(Snapshot {
            timestamp: now,
            smoothed,
            delta1,
            delta2,
            channel1,
            channel2,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Rolling history of smoothed values for all tracked channels.
    pub fn history(&self) -> &RollingHistory {
        &self.history
    }

    /// Current state of monitored channel 1.
    pub fn channel1(&self) -> &TouchState {
        self.classifier1.state()
    }

    /// Current state of monitored channel 2.
    pub fn channel2(&self) -> &TouchState {
        self.classifier2.state()
    }

    /// Restart the session: clears smoothers, classifiers, and history.
    pub fn reset(&mut self) {
        for smoother in &mut self.smoothers {
            smoother.reset();
        }
        self.classifier1.reset();
        self.classifier2.reset();
        self.history.clear();
    }
}
