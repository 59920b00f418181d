// Wed Oct 14 2026 - Alex

use thiserror::Error;

/// Why a signature string could not be turned into a `Pattern`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Empty signature")]
    Empty,
    #[error("Signature {0:?} has an odd number of nibbles")]
    OddNibbles(String),
    #[error("Signature {pattern:?} contains {digit:?}, expected a hex digit or '?'")]
    InvalidDigit { digit: char, pattern: String },
}
