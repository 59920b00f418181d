// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryRange};
use std::fmt;

/// A loaded code module of the target process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    range: MemoryRange,
    path: Option<String>,
}

impl Module {
    pub fn new(name: impl Into<String>, base: Address, size: u64) -> Self {
        Self {
            name: name.into(),
            range: MemoryRange::from_start_size(base, size),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn base(&self) -> Address {
        self.range.start()
    }

    pub fn size(&self) -> u64 {
        self.range.size()
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.range)
    }
}
