//! Error module for the Rusty Thorns library.
use std::error::Error;
use std::fmt;

/// Broad classification of the errors, see [`ThornsError::kind`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// Malformed or unsupported input shape, e.g., unknown column or mismatching lengths.
    Format,
    /// Violated precondition on an otherwise well-formed input, e.g., an empty time window.
    Value,
    /// A table failed its structural invariants.
    Invariant,
    /// Reading or writing outside of the library core.
    Io,
}

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum ThornsError {
    /// Error for malformed input, e.g., unsorted spikes or a reserved metadata name.
    InvalidFormat(String),
    /// Error for a column name not present in the table.
    UnknownColumn(String),
    /// Error for a per-row column whose length does not match the number of spike trains.
    IncompatibleLength {
        column: String,
        expected: usize,
        found: usize,
    },
    /// Error for invalid parameters, e.g., non-positive sampling frequency or period.
    InvalidParameter(String),
    /// Error for an empty or reversed time window.
    InvalidWindow { start: f64, stop: f64 },
    /// Error for a table breaking the spike train invariants.
    InvariantViolation(String),
    /// Error for I/O operations.
    IOError(String),
}

impl ThornsError {
    /// Returns the broad class of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThornsError::InvalidFormat(_)
            | ThornsError::UnknownColumn(_)
            | ThornsError::IncompatibleLength { .. } => ErrorKind::Format,
            ThornsError::InvalidParameter(_) | ThornsError::InvalidWindow { .. } => {
                ErrorKind::Value
            }
            ThornsError::InvariantViolation(_) => ErrorKind::Invariant,
            ThornsError::IOError(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for ThornsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ThornsError::InvalidFormat(e) => write!(f, "Invalid format: {}", e),
            ThornsError::UnknownColumn(name) => write!(f, "Unknown column: {}", name),
            ThornsError::IncompatibleLength {
                column,
                expected,
                found,
            } => write!(
                f,
                "Incompatible length for column {}: expected {} rows, found {}",
                column, expected, found
            ),
            ThornsError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            ThornsError::InvalidWindow { start, stop } => write!(
                f,
                "Invalid time window: start ({}) must be less than stop ({})",
                start, stop
            ),
            ThornsError::InvariantViolation(e) => write!(f, "Invariant violation: {}", e),
            ThornsError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for ThornsError {}

impl From<std::io::Error> for ThornsError {
    fn from(e: std::io::Error) -> Self {
        ThornsError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for ThornsError {
    fn from(e: serde_json::Error) -> Self {
        ThornsError::IOError(e.to_string())
    }
}
