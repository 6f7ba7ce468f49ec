//! Continuous logging
//!
//! While enabled, the logger wakes on a fixed interval, samples the latest
//! published snapshot (zeros if nothing has been processed yet), and appends
//! a [`LogRecord`] to its queue. The queue is drained exactly once, by
//! `stop`, after the sampling thread has fully halted; ownership of the
//! drained records transfers to the caller for persistence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Utc;
use log::info;

use crate::session::SnapshotCell;
use crate::types::{LogRecord, DEFAULT_LOG_INTERVAL_MS};

/// Periodic sampler of the latest snapshot.
pub struct ContinuousLogger {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Vec<LogRecord>>>,
}

impl ContinuousLogger {
    /// Start logging at the default 100ms cadence.
    pub fn start(cell: SnapshotCell) -> Self {
        Self::with_interval(cell, Duration::from_millis(DEFAULT_LOG_INTERVAL_MS))
    }

    /// Start logging at a custom cadence.
    pub fn with_interval(cell: SnapshotCell, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let started = Instant::now();
            let mut records = Vec::new();
            loop {
                thread::sleep(interval);
                // Cooperative stop: at most one interval of latency.
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                let latest = cell.latest();
                records.push(LogRecord::sample(
                    latest.as_ref(),
                    Utc::now(),
                    started.elapsed().as_secs_f64(),
                ));
            }
            records
        });

        info!("continuous logging started ({}ms interval)", interval.as_millis());
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Halt the sampling loop and drain the record queue.
    pub fn stop(mut self) -> Vec<LogRecord> {
        self.stop.store(true, Ordering::Relaxed);
        let records = self
            .handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        info!("continuous logging stopped ({} records)", records.len());
        records
    }
}

impl Drop for ContinuousLogger {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::StreamProcessor;
    use crate::types::ProcessorConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_logger_samples_latest_snapshot() {
        let cell = SnapshotCell::new();
        let mut processor = StreamProcessor::new(ProcessorConfig::default()).unwrap();
        cell.publish(processor.process_line("20,5", Utc::now()).unwrap());

        let logger = ContinuousLogger::with_interval(cell, Duration::from_millis(5));
        thread::sleep(Duration::from_millis(50));
        let records = logger.stop();

        assert!(!records.is_empty());
        for record in &records {
            assert_eq!(record.delta1, 15.0);
            assert_eq!(record.count1, 1);
        }
    }

    #[test]
    fn test_logger_records_zeros_before_first_snapshot() {
        let cell = SnapshotCell::new();
        let logger = ContinuousLogger::with_interval(cell, Duration::from_millis(5));
        thread::sleep(Duration::from_millis(30));
        let records = logger.stop();

        assert!(!records.is_empty());
        assert_eq!(records[0].delta1, 0.0);
        assert_eq!(records[0].count1, 0);
    }

    #[test]
    fn test_elapsed_seconds_increase() {
        let cell = SnapshotCell::new();
        let logger = ContinuousLogger::with_interval(cell, Duration::from_millis(5));
        thread::sleep(Duration::from_millis(40));
        let records = logger.stop();

        assert!(records.len() >= 2);
        assert!(records[0].elapsed_seconds < records[records.len() - 1].elapsed_seconds);
    }
}
