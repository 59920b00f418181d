// Wed Oct 14 2026 - Alex

use crate::analysis::{combine_split_immediate, InstructionDecoder};
use crate::finders::{locate_unique, LocateError, Signature};
use crate::memory::{Address, MemoryReader, MemoryRegion};
use crate::pattern::PatternScanner;

/// Finds the 68k register bank through the movw/movt pair that loads its
/// address inside `m68k_setstopped()`.
pub struct RegisterBankFinder<'a> {
    decoder: &'a dyn InstructionDecoder,
    scanner: &'a PatternScanner,
}

impl<'a> RegisterBankFinder<'a> {
    pub fn new(decoder: &'a dyn InstructionDecoder, scanner: &'a PatternScanner) -> Self {
        Self { decoder, scanner }
    }

    pub fn find<R: MemoryReader + ?Sized>(
        &self,
        reader: &R,
        signature: &Signature,
        regions: &[MemoryRegion],
    ) -> Result<Address, LocateError> {
        let pair = locate_unique(reader, self.scanner, signature, regions)?;
        let bank = decode_split_immediate(reader, self.decoder, pair)?;
        log::info!("Register bank at {} (loaded at {})", bank, pair);
        Ok(bank)
    }
}

/// Decodes the two consecutive instructions at `at` as halves of one split
/// immediate and rebuilds the constant.
pub fn decode_split_immediate<R: MemoryReader + ?Sized>(
    reader: &R,
    decoder: &dyn InstructionDecoder,
    at: Address,
) -> Result<Address, LocateError> {
    let next = at + decoder.instruction_size();
    let first_raw = reader.read_u32(at)?;
    let second_raw = reader.read_u32(next)?;
    log::trace!("{}", decoder.describe(at, first_raw));
    log::trace!("{}", decoder.describe(next, second_raw));

    let first = decoder.decode_immediate(at, first_raw)?;
    let second = decoder.decode_immediate(next, second_raw)?;
    Ok(combine_split_immediate(first, second)?)
}
