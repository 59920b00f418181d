// Wed Oct 14 2026 - Alex

use crate::analysis::InstructionDecoder;
use crate::finders::{locate_unique, LocateError, MemoryBank, Signature};
use crate::memory::{Address, MemoryReader, MemoryRegion};
use crate::pattern::PatternScanner;
use indexmap::IndexMap;

/// Finds the memory-bank accessors.
///
/// The dispatcher signature marks the boot ROM accessor. The remaining
/// accessors are laid out right behind it, one after each return
/// instruction, so the first `MemoryBank::DELIMITED.len()` returns in the
/// window give their entries in bank order.
pub struct MemoryBankFinder<'a> {
    decoder: &'a dyn InstructionDecoder,
    scanner: &'a PatternScanner,
    window: u64,
}

impl<'a> MemoryBankFinder<'a> {
    pub fn new(decoder: &'a dyn InstructionDecoder, scanner: &'a PatternScanner, window: u64) -> Self {
        Self {
            decoder,
            scanner,
            window,
        }
    }

    pub fn find<R: MemoryReader + ?Sized>(
        &self,
        reader: &R,
        signature: &Signature,
        regions: &[MemoryRegion],
    ) -> Result<IndexMap<MemoryBank, Address>, LocateError> {
        let entry = locate_unique(reader, self.scanner, signature, regions)?;
        log::info!("Memory dispatcher at {}", entry);

        let mut accessors = IndexMap::new();
        accessors.insert(MemoryBank::Bootrom, entry);

        let entries = self.subroutine_entries(reader, entry, regions)?;
        for (bank, addr) in MemoryBank::DELIMITED.iter().zip(entries) {
            log::debug!("{} accessor at {}", bank, addr);
            accessors.insert(*bank, addr);
        }

        Ok(accessors)
    }

    /// Entries of the routines following `start`: one instruction past each
    /// return in the window. Errors unless there is one per delimited bank.
    pub fn subroutine_entries<R: MemoryReader + ?Sized>(
        &self,
        reader: &R,
        start: Address,
        regions: &[MemoryRegion],
    ) -> Result<Vec<Address>, LocateError> {
        let window = self.window_at(start, regions);
        let returns = self
            .scanner
            .scan_range(reader, start, window, &self.decoder.return_pattern())?;
        log::debug!("{} return(s) in {} bytes at {}: {:?}", returns.len(), window, start, returns);

        let required = MemoryBank::DELIMITED.len();
        if returns.len() < required {
            return Err(LocateError::InsufficientDelimiters {
                start,
                window,
                found: returns.len(),
                required,
            });
        }

        Ok(returns
            .into_iter()
            .take(required)
            .map(|ret| ret + self.decoder.instruction_size())
            .collect())
    }

    // The window never runs past the end of the region holding `start`, and
    // is empty when no scanned region holds it.
    fn window_at(&self, start: Address, regions: &[MemoryRegion]) -> u64 {
        regions
            .iter()
            .find_map(|r| r.remaining_from(start))
            .map_or(0, |left| self.window.min(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Arm32Decoder;
    use crate::memory::Protection;
    use crate::testing::{arm, EmulatorImageBuilder, FakeHost};

    const START: Address = Address::new(0x4000);

    fn entries(host: &FakeHost, window: u64) -> Result<Vec<Address>, LocateError> {
        let decoder = Arm32Decoder::new();
        let scanner = PatternScanner::new();
        MemoryBankFinder::new(&decoder, &scanner, window).subroutine_entries(host, START, &host.code_regions())
    }

    fn routine_words(returns_at: &[usize], len: usize) -> Vec<u32> {
        let mut words = vec![arm::NOP; len];
        for &i in returns_at {
            words[i] = arm::BX_LR;
        }
        words
    }

    #[test]
    fn test_entries_follow_returns() {
        let host = FakeHost::arm().with_code(START, &routine_words(&[2, 5, 9, 10, 30], 64));
        let expected: Vec<Address> = [3u64, 6, 10, 11, 31].iter().map(|i| START + i * 4).collect();
        assert_eq!(entries(&host, 1024).unwrap(), expected);
    }

    #[test]
    fn test_extra_returns_are_ignored() {
        let host = FakeHost::arm().with_code(START, &routine_words(&[1, 2, 3, 4, 5, 6, 7], 16));
        let found = entries(&host, 1024).unwrap();
        assert_eq!(found.len(), 5);
        assert_eq!(found[4], START + 24);
    }

    #[test]
    fn test_window_bounds_the_delimiter_scan() {
        let host = FakeHost::arm().with_code(START, &routine_words(&[2, 5, 9, 10, 30], 64));
        let err = entries(&host, 100).unwrap_err();
        assert_eq!(
            err,
            LocateError::InsufficientDelimiters {
                start: START,
                window: 100,
                found: 4,
                required: 5
            }
        );
    }

    #[test]
    fn test_window_is_clipped_to_region() {
        let host = FakeHost::arm().with_code(START, &routine_words(&[0, 1, 2], 8));
        match entries(&host, 1024).unwrap_err() {
            LocateError::InsufficientDelimiters { window, found, .. } => {
                assert_eq!(window, 32);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_entry_outside_scanned_regions() {
        let routine = [
            arm::movw(3, 0x2f00),
            arm::movt(3, 0x0002),
            arm::ldr(3, 3, 0),
            arm::cmp(3, 0),
            arm::cond(arm::NE, arm::movw(2, 0x2f04)),
            arm::cond(arm::NE, arm::movt(2, 0x0002)),
            arm::BX_LR,
            arm::BX_LR,
            arm::BX_LR,
            arm::BX_LR,
            arm::BX_LR,
        ];
        // The region starts one byte into the routine, where the signature
        // match begins, so the anchored entry lies just before it.
        let bytes = arm::assemble(&routine)[1..].to_vec();
        let host = FakeHost::arm().with_segment(START + 1, Protection::READ_EXECUTE, bytes);

        let decoder = Arm32Decoder::new();
        let scanner = PatternScanner::new();
        let signature = crate::finders::SignatureSet::default().memory_dispatcher.compile().unwrap();
        let err = MemoryBankFinder::new(&decoder, &scanner, 1024)
            .find(&host, &signature, &host.code_regions())
            .unwrap_err();
        assert_eq!(
            err,
            LocateError::InsufficientDelimiters {
                start: START,
                window: 0,
                found: 0,
                required: 5
            }
        );
    }

    #[test]
    fn test_finds_all_accessors() {
        let host = EmulatorImageBuilder::new().build();
        let decoder = Arm32Decoder::new();
        let scanner = PatternScanner::new();
        let signature = crate::finders::SignatureSet::default().memory_dispatcher.compile().unwrap();
        let found = MemoryBankFinder::new(&decoder, &scanner, 1024)
            .find(&host, &signature, &host.code_regions())
            .unwrap();

        let expected = EmulatorImageBuilder::accessors();
        assert_eq!(found.len(), 6);
        for (bank, addr) in expected {
            assert_eq!(found[&bank], addr, "{}", bank);
        }
    }
}
