//! Delta extraction
//!
//! Each electrode reports a raw reading pair; the difference between the pair
//! is the electrode's delta, the signal that actually indicates proximity or
//! contact.

use crate::error::ProcessError;

/// Extractor mapping a raw sample of paired readings to per-electrode deltas.
#[derive(Debug, Clone, Copy)]
pub struct DeltaExtractor {
    electrode_count: usize,
}

impl DeltaExtractor {
    pub fn new(electrode_count: usize) -> Self {
        Self { electrode_count }
    }

    /// Compute one delta per electrode: `sample[2i] - sample[2i + 1]`.
    ///
    /// A correctly sized sample cannot fail here; the length check is a
    /// defensive bound so a mis-sized sample drops the line instead of
    /// panicking.
    pub fn extract(&self, sample: &[f64]) -> Result<Vec<f64>, ProcessError> {
        let needed = self.electrode_count * 2;
        if sample.len() < needed {
            return Err(ProcessError::IndexOutOfRange {
                index: needed - 1,
                len: sample.len(),
            });
        }

        Ok((0..self.electrode_count)
            .map(|i| sample[2 * i] - sample[2 * i + 1])
            .collect())
    }
}
