// Wed Oct 14 2026 - Alex

use crate::analysis::Architecture;
use crate::memory::{Address, Host, MemoryError, MemoryReader, MemoryRange, MemoryRegion, Module, Protection};
use goblin::elf::{header, program_header, Elf};
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

enum ImageData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for ImageData {
    fn as_ref(&self) -> &[u8] {
        match self {
            ImageData::Mapped(mmap) => mmap.as_ref(),
            ImageData::Owned(bytes) => bytes.as_slice(),
        }
    }
}

#[derive(Debug, Clone)]
struct LoadSegment {
    range: MemoryRange,
    file_offset: u64,
    file_size: u64,
    protection: Protection,
}

/// An emulator executable on disk, laid out at its link-time addresses.
///
/// Lets resolution run against a build before the probe is ever injected.
/// Foreign calls are not possible against a file and fail with
/// `MemoryError::NotSupported`.
pub struct BinaryMemory {
    name: String,
    data: ImageData,
    segments: Vec<LoadSegment>,
    architecture: Architecture,
    pointer_size: usize,
}

impl BinaryMemory {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MemoryError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives as long as `self`.
        let mmap = unsafe { Mmap::map(&file) }?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse(name, ImageData::Mapped(mmap))
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, MemoryError> {
        Self::parse(name.into(), ImageData::Owned(bytes))
    }

    fn parse(name: String, data: ImageData) -> Result<Self, MemoryError> {
        let (segments, architecture, pointer_size) = {
            let bytes = data.as_ref();
            let elf = Elf::parse(bytes)
                .map_err(|e| MemoryError::BinaryParseError(format!("Failed to parse ELF: {}", e)))?;

            if !elf.little_endian {
                return Err(MemoryError::NotSupported("big-endian images".to_string()));
            }

            let architecture = match elf.header.e_machine {
                header::EM_ARM => Architecture::Arm,
                header::EM_AARCH64 => Architecture::Arm64,
                header::EM_386 => Architecture::Ia32,
                header::EM_X86_64 => Architecture::X64,
                header::EM_MIPS => Architecture::Mips,
                other => Architecture::Other(format!("e_machine {}", other)),
            };

            let mut segments = Vec::new();
            for ph in elf.program_headers.iter().filter(|ph| ph.p_type == program_header::PT_LOAD) {
                let file_end = ph.p_offset.checked_add(ph.p_filesz);
                if file_end.map_or(true, |end| end > bytes.len() as u64) || ph.p_filesz > ph.p_memsz {
                    return Err(MemoryError::BinaryParseError(format!(
                        "PT_LOAD at 0x{:x} runs past the end of the file",
                        ph.p_vaddr
                    )));
                }
                if ph.p_vaddr.checked_add(ph.p_memsz).is_none() {
                    return Err(MemoryError::BinaryParseError(format!(
                        "PT_LOAD at 0x{:x} runs past the end of the address space",
                        ph.p_vaddr
                    )));
                }

                let mut protection = Protection::empty();
                if ph.p_flags & program_header::PF_R != 0 {
                    protection |= Protection::READ;
                }
                if ph.p_flags & program_header::PF_W != 0 {
                    protection |= Protection::WRITE;
                }
                if ph.p_flags & program_header::PF_X != 0 {
                    protection |= Protection::EXECUTE;
                }

                segments.push(LoadSegment {
                    range: MemoryRange::from_start_size(Address::new(ph.p_vaddr), ph.p_memsz),
                    file_offset: ph.p_offset,
                    file_size: ph.p_filesz,
                    protection,
                });
            }
            segments.sort_by_key(|s| s.range.start());

            (segments, architecture, if elf.is_64 { 8 } else { 4 })
        };

        log::debug!("Loaded {} ({}, {} PT_LOAD segments)", name, architecture, segments.len());

        Ok(Self {
            name,
            data,
            segments,
            architecture,
            pointer_size,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regions(&self) -> Vec<MemoryRegion> {
        self.segments
            .iter()
            .map(|s| MemoryRegion::new(s.range, s.protection, self.name.as_str()))
            .collect()
    }

    fn segment_for(&self, addr: Address, len: usize) -> Result<&LoadSegment, MemoryError> {
        self.segments
            .iter()
            .find(|s| s.range.contains_span(addr, len as u64))
            .ok_or(MemoryError::OutOfBounds { addr: addr.as_u64(), len })
    }
}

impl MemoryReader for BinaryMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        self.byte_view(addr, len).map(Cow::into_owned)
    }

    fn pointer_size(&self) -> usize {
        self.pointer_size
    }

    fn byte_view(&self, addr: Address, len: usize) -> Result<Cow<'_, [u8]>, MemoryError> {
        let segment = self.segment_for(addr, len)?;
        let rel = addr.as_u64() - segment.range.start().as_u64();
        let start = (segment.file_offset + rel) as usize;
        let bytes = self.data.as_ref();

        if rel + len as u64 <= segment.file_size {
            return Ok(Cow::Borrowed(&bytes[start..start + len]));
        }

        // Tail of the span falls into zero-filled .bss.
        let mut out = vec![0u8; len];
        let backed = segment.file_size.saturating_sub(rel).min(len as u64) as usize;
        out[..backed].copy_from_slice(&bytes[start..start + backed]);
        Ok(Cow::Owned(out))
    }
}

impl Host for BinaryMemory {
    fn architecture(&self) -> Architecture {
        self.architecture.clone()
    }

    fn enumerate_modules(&self) -> Result<Vec<Module>, MemoryError> {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.iter().map(|s| s.range.end()).max()) else {
            return Ok(Vec::new());
        };
        let base = first.range.start();
        Ok(vec![Module::new(self.name.as_str(), base, last.as_u64() - base.as_u64())])
    }

    fn enumerate_ranges(&self, module: &Module, protection: Protection) -> Result<Vec<MemoryRegion>, MemoryError> {
        Ok(self
            .regions()
            .into_iter()
            .filter(|r| r.protection().satisfies(protection) && module.range().intersect(r.range()).is_some())
            .collect())
    }

    fn call_accessor(&self, routine: Address, _size_out: &mut i32) -> Result<Address, MemoryError> {
        Err(MemoryError::NotSupported(format!(
            "calling 0x{:x} inside a file image",
            routine.as_u64()
        )))
    }
}
