// Wed Oct 14 2026 - Alex

use crate::analysis::{Architecture, DecodeError};
use crate::memory::{Address, MemoryError};
use crate::pattern::PatternError;
use thiserror::Error;

/// Everything that can stop resolution. None of it is retried: a wrong
/// address would poison every later register or memory read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(Architecture),
    #[error("Unable to find {name} (candidates=0)")]
    SignatureNotFound { name: String },
    #[error("Unable to find {name} uniquely (candidates={count})")]
    SignatureAmbiguous { name: String, count: usize },
    #[error("Instruction decode mismatch: {0}")]
    InstructionDecodeMismatch(#[from] DecodeError),
    #[error("Found {found} return instructions in the {window}-byte window at {start}, need {required}")]
    InsufficientDelimiters {
        start: Address,
        window: u64,
        found: usize,
        required: usize,
    },
    #[error("Module #{0} not found")]
    ModuleNotFound(usize),
    #[error("Resolved table has no accessor for {0}")]
    MissingAccessor(String),
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LocateError {
    /// The signature name for not-found/ambiguous failures.
    pub fn signature_name(&self) -> Option<&str> {
        match self {
            LocateError::SignatureNotFound { name } | LocateError::SignatureAmbiguous { name, .. } => Some(name),
            _ => None,
        }
    }
}
