// Wed Oct 14 2026 - Alex

pub mod banks;
pub mod error;
pub mod registers;
pub mod resolver;
pub mod result;
pub mod signature;

pub use banks::MemoryBankFinder;
pub use error::LocateError;
pub use registers::RegisterBankFinder;
pub use resolver::AddressResolver;
pub use result::{MemoryBank, ResolvedApi};
pub use signature::{CompiledSignatures, Signature, SignatureSet, SignatureSpec};

use crate::memory::{Address, MemoryError, MemoryReader, MemoryRegion};
use crate::pattern::PatternScanner;

/// Scans `regions` for `signature` and returns its anchored address.
///
/// Anything other than exactly one match is an error: picking one of several
/// candidates would hand out a wrong address.
pub fn locate_unique<R: MemoryReader + ?Sized>(
    reader: &R,
    scanner: &PatternScanner,
    signature: &Signature,
    regions: &[MemoryRegion],
) -> Result<Address, LocateError> {
    let matches = scanner.scan(reader, signature.pattern(), regions)?;
    log::debug!("{}: {} candidate(s) {:?}", signature.name(), matches.len(), matches);

    match matches.as_slice() {
        [] => Err(LocateError::SignatureNotFound {
            name: signature.name().to_string(),
        }),
        [found] => signature.resolve(*found).ok_or_else(|| {
            LocateError::Memory(MemoryError::InvalidAddress(format!(
                "{} {:+} for {}",
                found,
                signature.anchor(),
                signature.name()
            )))
        }),
        _ => Err(LocateError::SignatureAmbiguous {
            name: signature.name().to_string(),
            count: matches.len(),
        }),
    }
}
