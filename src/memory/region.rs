// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryRange, Protection};
use std::fmt;

/// A mapped range together with its protection, as handed out by a host's
/// range enumeration. Immutable for the duration of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    range: MemoryRange,
    protection: Protection,
    name: String,
}

impl MemoryRegion {
    pub fn new(range: MemoryRange, protection: Protection, name: impl Into<String>) -> Self {
        Self {
            range,
            protection,
            name: name.into(),
        }
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Address {
        self.range.start()
    }

    pub fn end(&self) -> Address {
        self.range.end()
    }

    pub fn size(&self) -> u64 {
        self.range.size()
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }

    pub fn is_readable(&self) -> bool {
        self.protection.can_read()
    }

    pub fn is_executable(&self) -> bool {
        self.protection.can_execute()
    }

    pub fn is_code(&self) -> bool {
        self.protection.can_execute() && !self.protection.can_write()
    }

    /// Bytes from `addr` to the end of the region.
    pub fn remaining_from(&self, addr: Address) -> Option<u64> {
        self.contains(addr).then(|| self.end().as_u64() - addr.as_u64())
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.range, self.protection, self.name)
    }
}
