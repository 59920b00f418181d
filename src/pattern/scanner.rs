// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, MemoryRegion};
use crate::pattern::Pattern;

/// Scans memory for a `Pattern`, chunk by chunk.
///
/// Consecutive chunks overlap by `pattern.len() - 1` bytes so matches that
/// straddle a chunk boundary are found, and every match is reported exactly
/// once. Results come back in region order, then ascending address.
#[derive(Debug, Clone)]
pub struct PatternScanner {
    chunk_size: usize,
    skip_unreadable: bool,
}

impl PatternScanner {
    pub const DEFAULT_CHUNK_SIZE: usize = 0x10000;

    pub fn new() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            skip_unreadable: true,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn scan<R: MemoryReader + ?Sized>(
        &self,
        reader: &R,
        pattern: &Pattern,
        regions: &[MemoryRegion],
    ) -> Result<Vec<Address>, MemoryError> {
        let mut results = Vec::new();

        for region in regions {
            if self.skip_unreadable && !region.is_readable() {
                log::trace!("Skipping unreadable region {}", region);
                continue;
            }
            results.extend(self.scan_range(reader, region.start(), region.size(), pattern)?);
        }

        Ok(results)
    }

    pub fn scan_range<R: MemoryReader + ?Sized>(
        &self,
        reader: &R,
        start: Address,
        size: u64,
        pattern: &Pattern,
    ) -> Result<Vec<Address>, MemoryError> {
        let mut results = Vec::new();
        let size = size as usize;

        if pattern.is_empty() || size < pattern.len() {
            return Ok(results);
        }

        let chunk_size = self.chunk_size.max(pattern.len());
        let step = chunk_size - (pattern.len() - 1);

        let mut offset = 0;
        loop {
            let read_size = (size - offset).min(chunk_size);
            let addr = start + offset as u64;
            let data = reader.read_bytes(addr, read_size)?;
            let last = offset + read_size == size;

            // Matches starting in the overlap belong to the next chunk.
            results.extend(
                pattern
                    .find_all_in(&data)
                    .into_iter()
                    .filter(|&m| last || m < step)
                    .map(|m| addr + m as u64),
            );

            if last {
                break;
            }
            offset += step;
        }

        Ok(results)
    }
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self::new()
    }
}
