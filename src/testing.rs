// Thu Oct 15 2026 - Alex

//! Fabricated hosts and code images for exercising resolution without a
//! running emulator.

use crate::analysis::Architecture;
use crate::finders::MemoryBank;
use crate::memory::{Address, Host, MemoryError, MemoryRange, MemoryReader, MemoryRegion, Module, Protection};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A32 encoders for the handful of instructions the fixtures use.
pub mod arm {
    pub use crate::analysis::arm::decoder::BX_LR;

    pub const NOP: u32 = 0xE320_F000;
    pub const AL: u32 = 0xE;
    pub const NE: u32 = 0x1;

    fn imm16(imm: u16) -> u32 {
        ((imm as u32 & 0xF000) << 4) | (imm as u32 & 0x0FFF)
    }

    pub fn movw(rd: u8, imm: u16) -> u32 {
        0xE300_0000 | ((rd as u32) << 12) | imm16(imm)
    }

    pub fn movt(rd: u8, imm: u16) -> u32 {
        0xE340_0000 | ((rd as u32) << 12) | imm16(imm)
    }

    pub fn ldr(rt: u8, rn: u8, offset: u16) -> u32 {
        0xE590_0000 | ((rn as u32) << 16) | ((rt as u32) << 12) | (offset as u32 & 0xFFF)
    }

    pub fn ldrb(rt: u8, rn: u8, offset: u16) -> u32 {
        0xE5D0_0000 | ((rn as u32) << 16) | ((rt as u32) << 12) | (offset as u32 & 0xFFF)
    }

    pub fn str(rt: u8, rn: u8, offset: u16) -> u32 {
        0xE580_0000 | ((rn as u32) << 16) | ((rt as u32) << 12) | (offset as u32 & 0xFFF)
    }

    pub fn cmp(rn: u8, imm: u8) -> u32 {
        0xE350_0000 | ((rn as u32) << 16) | imm as u32
    }

    pub fn mov(rd: u8, rm: u8) -> u32 {
        0xE1A0_0000 | ((rd as u32) << 12) | rm as u32
    }

    pub fn push(registers: u16) -> u32 {
        0xE92D_0000 | registers as u32
    }

    pub fn pop(registers: u16) -> u32 {
        0xE8BD_0000 | registers as u32
    }

    /// `b` from `from` to `to`.
    pub fn b(from: u64, to: u64) -> u32 {
        let delta = (to as i64 - from as i64 - 8) >> 2;
        0xEA00_0000 | (delta as u32 & 0x00FF_FFFF)
    }

    /// Replaces the condition field of `word`.
    pub fn cond(cond: u32, word: u32) -> u32 {
        (word & 0x0FFF_FFFF) | (cond << 28)
    }

    /// Little-endian bytes of `words`.
    pub fn assemble(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

struct Segment {
    region: MemoryRegion,
    bytes: Vec<u8>,
}

/// In-memory `Host` over a set of segments, all belonging to one module.
///
/// Counts range enumerations, reads and accessor calls so tests can observe
/// whether resolution ran again.
pub struct FakeHost {
    architecture: Architecture,
    module_name: String,
    segments: RwLock<Vec<Segment>>,
    accessors: RwLock<HashMap<Address, (Address, i32)>>,
    range_queries: AtomicUsize,
    reads: AtomicUsize,
    accessor_calls: AtomicUsize,
}

impl FakeHost {
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            module_name: "amiberry".to_string(),
            segments: RwLock::new(Vec::new()),
            accessors: RwLock::new(HashMap::new()),
            range_queries: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            accessor_calls: AtomicUsize::new(0),
        }
    }

    pub fn arm() -> Self {
        Self::new(Architecture::Arm)
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_segment(self, start: Address, protection: Protection, bytes: Vec<u8>) -> Self {
        let name = if protection.can_execute() { ".text" } else { ".data" };
        let region = MemoryRegion::new(
            MemoryRange::from_start_size(start, bytes.len() as u64),
            protection,
            name,
        );
        {
            let mut segments = self.segments.write();
            segments.push(Segment { region, bytes });
            segments.sort_by_key(|s| s.region.start());
        }
        self
    }

    /// Adds an `r-x` segment holding exactly `words`.
    pub fn with_code(self, start: Address, words: &[u32]) -> Self {
        self.with_segment(start, Protection::READ_EXECUTE, arm::assemble(words))
    }

    /// Adds a zeroed `rw-` segment.
    pub fn with_data(self, start: Address, size: usize) -> Self {
        self.with_segment(start, Protection::READ_WRITE, vec![0; size])
    }

    pub fn with_accessor(self, routine: Address, base: Address, size: i32) -> Self {
        self.set_accessor(routine, base, size);
        self
    }

    /// What the accessor at `routine` reports from now on.
    pub fn set_accessor(&self, routine: Address, base: Address, size: i32) {
        self.accessors.write().insert(routine, (base, size));
    }

    pub fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let mut segments = self.segments.write();
        let segment = segments
            .iter_mut()
            .find(|s| s.region.range().contains_span(addr, data.len() as u64))
            .ok_or(MemoryError::OutOfBounds {
                addr: addr.as_u64(),
                len: data.len(),
            })?;
        let offset = (addr.as_u64() - segment.region.start().as_u64()) as usize;
        segment.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn write_u32(&self, addr: Address, value: u32) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    pub fn regions(&self) -> Vec<MemoryRegion> {
        self.segments.read().iter().map(|s| s.region.clone()).collect()
    }

    pub fn code_regions(&self) -> Vec<MemoryRegion> {
        self.regions().into_iter().filter(MemoryRegion::is_executable).collect()
    }

    pub fn range_queries(&self) -> usize {
        self.range_queries.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn accessor_calls(&self) -> usize {
        self.accessor_calls.load(Ordering::SeqCst)
    }
}

impl MemoryReader for FakeHost {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let segments = self.segments.read();
        let segment = segments
            .iter()
            .find(|s| s.region.range().contains_span(addr, len as u64))
            .ok_or(MemoryError::OutOfBounds {
                addr: addr.as_u64(),
                len,
            })?;
        let offset = (addr.as_u64() - segment.region.start().as_u64()) as usize;
        Ok(segment.bytes[offset..offset + len].to_vec())
    }

    fn pointer_size(&self) -> usize {
        self.architecture.pointer_size().unwrap_or(4)
    }
}

impl Host for FakeHost {
    fn architecture(&self) -> Architecture {
        self.architecture.clone()
    }

    fn enumerate_modules(&self) -> Result<Vec<Module>, MemoryError> {
        let segments = self.segments.read();
        let (Some(first), Some(end)) = (segments.first(), segments.iter().map(|s| s.region.end()).max()) else {
            return Ok(Vec::new());
        };
        let base = first.region.start();
        Ok(vec![Module::new(self.module_name.as_str(), base, end.as_u64() - base.as_u64())])
    }

    fn enumerate_ranges(&self, module: &Module, protection: Protection) -> Result<Vec<MemoryRegion>, MemoryError> {
        self.range_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .regions()
            .into_iter()
            .filter(|r| r.protection().satisfies(protection) && module.range().intersect(r.range()).is_some())
            .collect())
    }

    fn call_accessor(&self, routine: Address, size_out: &mut i32) -> Result<Address, MemoryError> {
        self.accessor_calls.fetch_add(1, Ordering::SeqCst);
        let (base, size) = self.accessors.read().get(&routine).copied().ok_or_else(|| MemoryError::CallFailed {
            addr: routine.as_u64(),
            reason: "no accessor routine here".to_string(),
        })?;
        *size_out = size;
        Ok(base)
    }
}

/// Lays out instruction words over a NOP-filled code buffer.
pub struct CodeImageBuilder {
    base: Address,
    words: Vec<u32>,
}

impl CodeImageBuilder {
    pub fn new(base: Address, size: usize) -> Self {
        Self {
            base,
            words: vec![arm::NOP; size / 4],
        }
    }

    /// Places `words` starting at `addr`. Panics outside the image.
    pub fn put(&mut self, addr: Address, words: &[u32]) -> &mut Self {
        let index = ((addr.as_u64() - self.base.as_u64()) / 4) as usize;
        self.words[index..index + words.len()].copy_from_slice(words);
        self
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        arm::assemble(&self.words)
    }
}

/// A code image shaped like the emulator's: `m68k_setstopped()` loading the
/// register bank, and the memory-bank dispatcher followed by five
/// accessor routines, each reached past the previous `bx lr`.
///
/// Accessors are wired to banks inside the data segment, so the image also
/// supports live region reads.
pub struct EmulatorImageBuilder {
    register_signatures: usize,
    dispatcher_signatures: usize,
    delimiters: [bool; 5],
}

impl EmulatorImageBuilder {
    pub const CODE_BASE: Address = Address::new(0x10000);
    pub const CODE_SIZE: usize = 0x2000;
    pub const DATA_BASE: Address = Address::new(0x20000);
    pub const DATA_SIZE: usize = 0x10000;
    pub const REGISTER_BANK: Address = Address::new(0x20100);
    pub const SET_STOPPED: Address = Address::new(0x10040);
    pub const DISPATCHER: Address = Address::new(0x10100);
    pub const BANK_SIZE: i32 = 0x400;

    const SECOND_SET_STOPPED: Address = Address::new(0x10800);
    const SECOND_DISPATCHER: Address = Address::new(0x10a00);

    pub fn new() -> Self {
        Self {
            register_signatures: 1,
            dispatcher_signatures: 1,
            delimiters: [true; 5],
        }
    }

    /// How many copies of the register-bank signature to emit (0 to 2).
    pub fn register_signatures(mut self, count: usize) -> Self {
        self.register_signatures = count.min(2);
        self
    }

    /// How many copies of the dispatcher signature to emit (0 to 2).
    pub fn dispatcher_signatures(mut self, count: usize) -> Self {
        self.dispatcher_signatures = count.min(2);
        self
    }

    /// Ends accessor routine `index` (0 = boot ROM) with a tail branch
    /// instead of `bx lr`.
    pub fn without_delimiter(mut self, index: usize) -> Self {
        if let Some(slot) = self.delimiters.get_mut(index) {
            *slot = false;
        }
        self
    }

    /// The accessor each bank resolves to.
    pub fn accessors() -> IndexMap<MemoryBank, Address> {
        let mut accessors = IndexMap::new();
        accessors.insert(MemoryBank::Bootrom, Self::DISPATCHER);
        for (i, bank) in MemoryBank::DELIMITED.iter().enumerate() {
            accessors.insert(*bank, Self::DISPATCHER + 0x28 + i as u64 * 0x20);
        }
        accessors
    }

    /// Where the data of `bank` lives.
    pub fn bank_base(bank: MemoryBank) -> Address {
        Self::DATA_BASE + 0x1000 * (bank.index() as u64 + 1)
    }

    /// The code segment alone, for hosts other than `FakeHost`.
    pub fn code(&self) -> CodeImageBuilder {
        let mut image = CodeImageBuilder::new(Self::CODE_BASE, Self::CODE_SIZE);

        if self.register_signatures >= 1 {
            image.put(Self::SET_STOPPED, &set_stopped(Self::REGISTER_BANK));
        }
        if self.register_signatures >= 2 {
            image.put(Self::SECOND_SET_STOPPED, &set_stopped(Self::REGISTER_BANK + 0x800));
        }

        let mut bootrom = dispatcher(0x2f00, 0x2f04);
        if self.dispatcher_signatures >= 1 {
            if !self.delimiters[0] {
                let last = bootrom.len() - 1;
                bootrom[last] = arm::b(Self::DISPATCHER.as_u64() + last as u64 * 4, Self::CODE_BASE.as_u64());
            }
            image.put(Self::DISPATCHER, &bootrom);
        }
        if self.dispatcher_signatures >= 2 {
            image.put(Self::SECOND_DISPATCHER, &dispatcher(0x2f08, 0x2f0c));
        }

        for (i, (bank, entry)) in Self::accessors().into_iter().skip(1).enumerate() {
            let data = 0x2e00 + bank.index() as u16 * 8;
            let mut words = accessor_routine(data, data + 4);
            let last = words.len() - 1;
            // The routine behind the last delimiter never returns through
            // `bx lr`, which keeps the delimiter count at five.
            if i + 1 == MemoryBank::DELIMITED.len() || !self.delimiters[i + 1] {
                words[last] = arm::b(entry.as_u64() + last as u64 * 4, Self::CODE_BASE.as_u64());
            }
            image.put(entry, &words);
        }

        image
    }

    pub fn build(&self) -> FakeHost {
        let image = self.code();
        let mut host = FakeHost::arm()
            .with_code(Self::CODE_BASE, image.words())
            .with_data(Self::DATA_BASE, Self::DATA_SIZE);

        for (bank, routine) in Self::accessors() {
            let base = Self::bank_base(bank);
            let fill = vec![bank.index() as u8 + 1; Self::BANK_SIZE as usize];
            // Data segment was just created large enough for every bank.
            if host.write_bytes(base, &fill).is_ok() {
                host = host.with_accessor(routine, base, Self::BANK_SIZE);
            }
        }

        host
    }
}

impl Default for EmulatorImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn split(addr: Address) -> (u16, u16) {
    ((addr.as_u64() & 0xFFFF) as u16, (addr.as_u64() >> 16) as u16)
}

fn set_stopped(bank: Address) -> Vec<u32> {
    let (lo, hi) = split(bank);
    vec![
        arm::push(0x4070),
        arm::movw(4, lo),
        arm::movt(4, hi),
        arm::ldr(3, 4, 100),
        arm::ldrb(2, 4, 0x7f),
        arm::str(3, 4, 0x48),
        arm::pop(0x8070),
    ]
}

// `uint8_t *save_bootrom(int *size)` with base and size behind two globals
// in the low data page.
fn dispatcher(base_var: u16, size_var: u16) -> Vec<u32> {
    vec![
        arm::movw(3, base_var),
        arm::movt(3, 0x0002),
        arm::ldr(3, 3, 0),
        arm::cmp(3, 0),
        arm::cond(arm::NE, arm::movw(2, size_var)),
        arm::cond(arm::NE, arm::movt(2, 0x0002)),
        arm::cond(arm::NE, arm::ldr(2, 2, 0)),
        arm::cond(arm::NE, arm::str(2, 0, 0)),
        arm::mov(0, 3),
        arm::BX_LR,
    ]
}

fn accessor_routine(base_var: u16, size_var: u16) -> Vec<u32> {
    vec![
        arm::movw(2, size_var),
        arm::movt(2, 0x0002),
        arm::ldr(2, 2, 0),
        arm::str(2, 0, 0),
        arm::movw(0, base_var),
        arm::movt(0, 0x0002),
        arm::ldr(0, 0, 0),
        arm::BX_LR,
    ]
}
