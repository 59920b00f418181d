// Wed Oct 14 2026 - Alex

use crate::analysis::Architecture;
use crate::memory::{Address, MemoryError, MemoryRegion, Module, Protection};
use std::borrow::Cow;

/// Raw reads against the target address space.
///
/// Only `read_bytes` and `pointer_size` are required; the typed reads are
/// little-endian and built on top of it.
pub trait MemoryReader: Send + Sync {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    fn pointer_size(&self) -> usize;

    fn read_u8(&self, addr: Address) -> Result<u8, MemoryError> {
        let bytes = self.read_bytes(addr, 1)?;
        bytes.first().copied().ok_or(MemoryError::ReadFailed(addr.as_u64()))
    }

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        let bytes = self.read_bytes(addr, 4)?;
        let word: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| MemoryError::ReadFailed(addr.as_u64()))?;
        Ok(u32::from_le_bytes(word))
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        let bytes = self.read_bytes(addr, 8)?;
        let word: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| MemoryError::ReadFailed(addr.as_u64()))?;
        Ok(u64::from_le_bytes(word))
    }

    fn read_ptr(&self, addr: Address) -> Result<Address, MemoryError> {
        match self.pointer_size() {
            4 => self.read_u32(addr).map(Address::from),
            8 => self.read_u64(addr).map(Address::new),
            other => Err(MemoryError::NotSupported(format!("{}-byte pointers", other))),
        }
    }

    /// Byte view over `[addr, addr + len)`. Hosts that can hand out the
    /// memory directly return `Cow::Borrowed`; the default copies.
    fn byte_view(&self, addr: Address, len: usize) -> Result<Cow<'_, [u8]>, MemoryError> {
        self.read_bytes(addr, len).map(Cow::Owned)
    }
}

/// The instrumentation runtime the probe runs on top of: module and range
/// enumeration, architecture identification and foreign calls.
pub trait Host: MemoryReader {
    fn architecture(&self) -> Architecture;

    /// Loaded code modules in enumeration order; the main executable first.
    fn enumerate_modules(&self) -> Result<Vec<Module>, MemoryError>;

    /// Ranges of `module` granting at least `protection`, in address order.
    fn enumerate_ranges(&self, module: &Module, protection: Protection) -> Result<Vec<MemoryRegion>, MemoryError>;

    /// Calls the native routine at `routine` as `uint8_t *fn(int *size)`.
    /// The routine's size output lands in `size_out`; the returned pointer is
    /// passed back untouched. Callers serialise these calls.
    fn call_accessor(&self, routine: Address, size_out: &mut i32) -> Result<Address, MemoryError>;
}
