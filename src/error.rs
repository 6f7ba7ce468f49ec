//! Error types for touchstream

use thiserror::Error;

/// Errors that can occur while processing the sample stream.
///
/// The first three variants are recoverable: the offending line is dropped
/// and no pipeline state is mutated. `Transport` is fatal to the ingestion
/// loop and terminates the session.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("invalid data format: expected {expected} fields, got {actual}")]
    InvalidFormat { expected: usize, actual: usize },

    #[error("invalid data values: {0}")]
    InvalidValues(String),

    #[error("delta index {index} out of range for sample of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
}

impl ProcessError {
    /// Whether the error drops a single line (true) or ends the session (false).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProcessError::Transport(_))
    }
}

/// Errors raised when constructing a processor from an invalid configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("electrode count must be at least 1")]
    NoElectrodes,

    #[error("smoothing window must be at least 1")]
    EmptySmoothingWindow,

    #[error("history capacity must be at least 1")]
    EmptyHistory,

    #[error("monitored channel {channel} out of range for {electrodes} electrodes")]
    ChannelOutOfRange { channel: usize, electrodes: usize },
}
