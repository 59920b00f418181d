// Mon Oct 12 2026 - Alex

use thiserror::Error;

/// Failures of the host boundary: reads, enumeration and foreign calls.
///
/// Kept `Clone` so a failed resolution can be cached and replayed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Out of bounds: {len} bytes at 0x{addr:x} not mapped")]
    OutOfBounds { addr: u64, len: usize },
    #[error("Read failed at address 0x{0:x}")]
    ReadFailed(u64),
    #[error("Binary parse error: {0}")]
    BinaryParseError(String),
    #[error("Invalid memory range: {0}")]
    InvalidRange(String),
    #[error("Foreign call to 0x{addr:x} failed: {reason}")]
    CallFailed { addr: u64, reason: String },
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl From<std::io::Error> for MemoryError {
    fn from(err: std::io::Error) -> Self {
        MemoryError::Io(err.to_string())
    }
}
