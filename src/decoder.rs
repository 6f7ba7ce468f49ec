//! Line decoding
//!
//! This module parses one raw text line from the sensor transport into a
//! fixed-size numeric sample. A line is `2 * N` comma-separated decimal
//! fields, two raw readings per electrode.

use crate::error::ProcessError;

/// Decoder for raw sensor lines, fixed to one expected field count.
#[derive(Debug, Clone, Copy)]
pub struct LineDecoder {
    expected_fields: usize,
}

impl LineDecoder {
    /// Create a decoder expecting `expected_fields` comma-separated values.
    pub fn new(expected_fields: usize) -> Self {
        Self { expected_fields }
    }

    /// Parse one line into a numeric sample.
    ///
    /// Pure function of its input: a field count mismatch yields
    /// [`ProcessError::InvalidFormat`], an unparseable field yields
    /// [`ProcessError::InvalidValues`].
    pub fn decode(&self, line: &str) -> Result<Vec<f64>, ProcessError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != self.expected_fields {
            return Err(ProcessError::InvalidFormat {
                expected: self.expected_fields,
                actual: fields.len(),
            });
        }

        let mut sample = Vec::with_capacity(fields.len());
        for field in fields {
            let value: f64 = field
                .trim()
                .parse()
                .map_err(|_| ProcessError::InvalidValues(field.trim().to_string()))?;
            sample.push(value);
        }
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_well_formed_line() {
        let decoder = LineDecoder::new(4);
        let sample = decoder.decode("20,5.5,-3,0.25").unwrap();
        assert_eq!(sample, vec![20.0, 5.5, -3.0, 0.25]);
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let decoder = LineDecoder::new(2);
        let sample = decoder.decode(" 1.0 , 2 ").unwrap();
        assert_eq!(sample, vec![1.0, 2.0]);
    }

    #[test]
    fn test_field_count_mismatch_is_invalid_format() {
        let decoder = LineDecoder::new(24);
        match decoder.decode("1,2,3") {
            Err(ProcessError::InvalidFormat { expected, actual }) => {
                assert_eq!(expected, 24);
                assert_eq!(actual, 3);
            }
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_is_invalid_values() {
        let decoder = LineDecoder::new(2);
        match decoder.decode("a,b") {
            Err(ProcessError::InvalidValues(field)) => assert_eq!(field, "a"),
            other => panic!("expected InvalidValues, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_line_is_one_empty_field() {
        // split(',') on "" yields one empty field, so the count check fires
        // first for any expectation above 1.
        let decoder = LineDecoder::new(2);
        assert!(matches!(
            decoder.decode(""),
            Err(ProcessError::InvalidFormat {
                expected: 2,
                actual: 1
            })
        ));
    }
}
