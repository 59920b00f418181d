// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRange, MemoryRegion, Module, Protection};
use once_cell::sync::Lazy;
use regex::Regex;

static MAPS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-fA-F]+)-([0-9a-fA-F]+)\s+([r-][w-][x-])[ps]\s+([0-9a-fA-F]+)\s+\S+\s+\d+\s*(.*)$")
        .expect("maps line regex is valid")
});

/// One line of `/proc/<pid>/maps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsEntry {
    pub range: MemoryRange,
    pub protection: Protection,
    pub offset: u64,
    pub path: Option<String>,
}

pub fn parse_maps(text: &str) -> Result<Vec<MapsEntry>, MemoryError> {
    let mut entries = Vec::new();

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let caps = MAPS_LINE
            .captures(line)
            .ok_or_else(|| MemoryError::InvalidRange(format!("unparsable maps line: {}", line)))?;

        let parse_hex = |s: &str| {
            u64::from_str_radix(s, 16).map_err(|e| MemoryError::InvalidRange(format!("{}: {}", line, e)))
        };
        let start = parse_hex(&caps[1])?;
        let end = parse_hex(&caps[2])?;
        if end < start {
            return Err(MemoryError::InvalidRange(line.to_string()));
        }
        let protection: Protection = caps[3].parse().map_err(MemoryError::InvalidRange)?;
        let offset = parse_hex(&caps[4])?;
        let path = caps.get(5).map(|m| m.as_str().trim()).filter(|p| !p.is_empty()).map(str::to_string);

        entries.push(MapsEntry {
            range: MemoryRange::new(Address::new(start), Address::new(end)),
            protection,
            offset,
            path,
        });
    }

    Ok(entries)
}

/// File-backed modules in order of first appearance.
pub fn modules_from_maps(entries: &[MapsEntry]) -> Vec<Module> {
    let mut modules: Vec<(String, Address, Address)> = Vec::new();

    for entry in entries {
        let Some(path) = entry.path.as_deref().filter(|p| p.starts_with('/')) else {
            continue;
        };
        match modules.iter_mut().find(|(p, _, _)| p == path) {
            Some((_, start, end)) => {
                *start = (*start).min(entry.range.start());
                *end = (*end).max(entry.range.end());
            }
            None => modules.push((path.to_string(), entry.range.start(), entry.range.end())),
        }
    }

    modules
        .into_iter()
        .map(|(path, start, end)| {
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            Module::new(name, start, end.as_u64() - start.as_u64()).with_path(path)
        })
        .collect()
}

pub fn ranges_from_maps(entries: &[MapsEntry], module: &Module, protection: Protection) -> Vec<MemoryRegion> {
    let mut regions: Vec<MemoryRegion> = entries
        .iter()
        .filter(|e| e.path.as_deref() == module.path() && e.protection.satisfies(protection))
        .map(|e| MemoryRegion::new(e.range, e.protection, module.name()))
        .collect();
    regions.sort_by_key(|r| r.start());
    regions
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use self::native::ProcessMemory;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod native {
    use super::{modules_from_maps, parse_maps, ranges_from_maps, MapsEntry};
    use crate::analysis::Architecture;
    use crate::memory::{Address, Host, MemoryError, MemoryReader, MemoryRegion, Module, Protection};
    use libc::c_int;
    use parking_lot::Mutex;
    use std::borrow::Cow;

    type AccessorFn = unsafe extern "C" fn(*mut c_int) -> *mut u8;

    /// Accessor routines share emulator state, so only one call may be in
    /// flight per process.
    static FOREIGN_CALL: Mutex<()> = parking_lot::const_mutex(());

    /// The process the library is loaded into, seen through `/proc/self/maps`
    /// and raw pointers.
    #[derive(Debug, Default)]
    pub struct ProcessMemory {
        _private: (),
    }

    impl ProcessMemory {
        pub fn current() -> Self {
            Self { _private: () }
        }

        fn maps(&self) -> Result<Vec<MapsEntry>, MemoryError> {
            let text = std::fs::read_to_string("/proc/self/maps")?;
            parse_maps(&text)
        }
    }

    impl MemoryReader for ProcessMemory {
        fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
            self.byte_view(addr, len).map(Cow::into_owned)
        }

        fn pointer_size(&self) -> usize {
            std::mem::size_of::<usize>()
        }

        fn byte_view(&self, addr: Address, len: usize) -> Result<Cow<'_, [u8]>, MemoryError> {
            if len == 0 {
                return Ok(Cow::Borrowed(&[]));
            }
            if addr.is_null() {
                return Err(MemoryError::InvalidAddress(addr.to_string()));
            }
            // SAFETY: addresses come from the process's own mappings or from
            // pointers the emulator hands out; the view is read-only.
            let view = unsafe { std::slice::from_raw_parts(addr.as_ptr(), len) };
            Ok(Cow::Borrowed(view))
        }
    }

    impl Host for ProcessMemory {
        fn architecture(&self) -> Architecture {
            Architecture::from_name(std::env::consts::ARCH)
        }

        fn enumerate_modules(&self) -> Result<Vec<Module>, MemoryError> {
            Ok(modules_from_maps(&self.maps()?))
        }

        fn enumerate_ranges(&self, module: &Module, protection: Protection) -> Result<Vec<MemoryRegion>, MemoryError> {
            Ok(ranges_from_maps(&self.maps()?, module, protection))
        }

        fn call_accessor(&self, routine: Address, size_out: &mut i32) -> Result<Address, MemoryError> {
            if routine.is_null() {
                return Err(MemoryError::CallFailed {
                    addr: 0,
                    reason: "null routine".to_string(),
                });
            }

            let _guard = FOREIGN_CALL.lock();
            // SAFETY: `routine` was resolved to the entry of a
            // `uint8_t *(int *)` accessor inside the emulator's code.
            let base = unsafe {
                let accessor = std::mem::transmute::<usize, AccessorFn>(routine.as_usize());
                accessor(size_out as *mut i32 as *mut c_int)
            };
            Ok(Address::from_ptr(base as *const u8))
        }
    }
}
