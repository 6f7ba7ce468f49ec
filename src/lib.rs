//! Touchstream - stream-processing core for multi-electrode capacitive touch sensing
//!
//! Touchstream turns raw comma-separated sensor lines into touch
//! classifications through a deterministic pipeline: line decoding ->
//! delta extraction -> moving-average smoothing -> threshold classification,
//! with per-channel touch counts, cumulative touch timers, and a bounded
//! rolling history for charting.
//!
//! ## Modules
//!
//! - **Pipeline**: [`StreamProcessor`] and its stages (decoder, delta
//!   extractor, smoother, classifier, history)
//! - **Session**: ingestion loop over any `BufRead` transport with an
//!   atomically published latest snapshot
//! - **Logger**: periodic sampling of the latest snapshot into CSV-ready
//!   log records

pub mod classifier;
pub mod decoder;
pub mod delta;
pub mod error;
pub mod history;
pub mod logger;
pub mod processor;
pub mod session;
pub mod smoother;
pub mod types;

pub use classifier::TouchClassifier;
pub use decoder::LineDecoder;
pub use delta::DeltaExtractor;
pub use error::{ConfigError, ProcessError};
pub use history::RollingHistory;
pub use logger::ContinuousLogger;
pub use processor::StreamProcessor;
pub use session::{IngestSession, SnapshotCell};
pub use smoother::Smoother;
pub use types::{LogRecord, ProcessorConfig, Snapshot, ThresholdMode, TouchState};

/// Touchstream version embedded in CLI output
pub const TOUCHSTREAM_VERSION: &str = env!("CARGO_PKG_VERSION");
