//! Error types for trace conversion.

use thiserror::Error;

/// Errors that can stop a conversion run.
///
/// A source that is not a gzip container is not an error: it is reported as
/// [`Outcome::Skipped`](crate::Outcome::Skipped).
#[derive(Debug, Error)]
pub enum TraceError {
    /// Decompression or sink failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record carries an opcode with no MacSim category
    #[error("invalid opcode {code} in record at cycle {cycle}")]
    InvalidOpcode { code: u8, cycle: u64 },

    /// A raw record slice of the wrong size was handed to the parser
    #[error("raw record must be {expected} bytes, got {actual}")]
    RecordLength { expected: usize, actual: usize },

    /// Invalid decoder configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for trace conversion.
pub type Result<T> = std::result::Result<T, TraceError>;
