// Thu Oct 15 2026 - Alex

use crate::finders::MemoryBank;
use crate::memory::{Address, Host, MemoryError};
use parking_lot::Mutex;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Base and size of a memory bank as its accessor reported them at one
/// point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryRegionSnapshot {
    pub base: Address,
    pub size: usize,
}

impl fmt::Display for MemoryRegionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:x} bytes)", self.base, self.size)
    }
}

/// View of one emulated memory bank.
///
/// Banks can be remapped or resized at any time, so `base`, `size` and
/// `data` each call the accessor routine again instead of caching.
pub struct MemoryRegionView<'a, H: Host + ?Sized> {
    host: &'a H,
    bank: MemoryBank,
    accessor: Address,
    size_buffer: &'a Mutex<i32>,
}

impl<'a, H: Host + ?Sized> MemoryRegionView<'a, H> {
    pub fn new(host: &'a H, bank: MemoryBank, accessor: Address, size_buffer: &'a Mutex<i32>) -> Self {
        Self {
            host,
            bank,
            accessor,
            size_buffer,
        }
    }

    pub fn bank(&self) -> MemoryBank {
        self.bank
    }

    pub fn accessor(&self) -> Address {
        self.accessor
    }

    /// Calls the accessor once.
    pub fn snapshot(&self) -> Result<MemoryRegionSnapshot, MemoryError> {
        let mut size = self.size_buffer.lock();
        *size = 0;
        let base = self.host.call_accessor(self.accessor, &mut *size)?;
        let reported = *size;
        drop(size);

        let size = usize::try_from(reported).map_err(|_| MemoryError::CallFailed {
            addr: self.accessor.as_u64(),
            reason: format!("{} accessor reported size {}", self.bank, reported),
        })?;
        log::trace!("{} -> {} (0x{:x} bytes)", self.bank, base, size);
        Ok(MemoryRegionSnapshot { base, size })
    }

    pub fn base(&self) -> Result<Address, MemoryError> {
        Ok(self.snapshot()?.base)
    }

    pub fn size(&self) -> Result<usize, MemoryError> {
        Ok(self.snapshot()?.size)
    }

    /// The bank's bytes. Borrowed straight from memory when the host allows
    /// it. An unmapped bank (null base, zero size) yields an empty view.
    pub fn data(&self) -> Result<Cow<'a, [u8]>, MemoryError> {
        let MemoryRegionSnapshot { base, size } = self.snapshot()?;
        if size == 0 {
            return Ok(Cow::Borrowed(&[]));
        }
        if base.is_null() {
            return Err(MemoryError::InvalidAddress(format!("{} is unmapped", self.bank)));
        }
        let host: &'a H = self.host;
        host.byte_view(base, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    const ROUTINE: Address = Address::new(0x4000);
    const BANK: Address = Address::new(0x8000);

    fn host() -> FakeHost {
        let host = FakeHost::arm()
            .with_data(BANK, 0x100)
            .with_accessor(ROUTINE, BANK, 0x10);
        host.write_bytes(BANK, b"AMIGA ROM").unwrap();
        host
    }

    #[test]
    fn test_every_access_calls_the_accessor() {
        let host = host();
        let buffer = Mutex::new(0);
        let view = MemoryRegionView::new(&host, MemoryBank::Bootrom, ROUTINE, &buffer);

        assert_eq!(view.base().unwrap(), BANK);
        assert_eq!(view.size().unwrap(), 0x10);
        assert_eq!(&view.data().unwrap()[..9], b"AMIGA ROM");
        assert_eq!(host.accessor_calls(), 3);
    }

    #[test]
    fn test_follows_remapping() {
        let host = host();
        let buffer = Mutex::new(0);
        let view = MemoryRegionView::new(&host, MemoryBank::Cram, ROUTINE, &buffer);
        assert_eq!(view.data().unwrap().len(), 0x10);

        host.set_accessor(ROUTINE, BANK + 0x80, 0x20);
        assert_eq!(
            view.snapshot().unwrap(),
            MemoryRegionSnapshot {
                base: BANK + 0x80,
                size: 0x20
            }
        );
        assert_eq!(view.data().unwrap().len(), 0x20);
    }

    #[test]
    fn test_unmapped_and_bad_sizes() {
        let host = host();
        let buffer = Mutex::new(0);
        let view = MemoryRegionView::new(&host, MemoryBank::A3000HRam, ROUTINE, &buffer);

        host.set_accessor(ROUTINE, Address::NULL, 0);
        assert!(view.data().unwrap().is_empty());

        host.set_accessor(ROUTINE, Address::NULL, 4);
        assert!(matches!(view.data(), Err(MemoryError::InvalidAddress(_))));

        host.set_accessor(ROUTINE, BANK, -1);
        assert!(matches!(view.size(), Err(MemoryError::CallFailed { .. })));
    }
}
