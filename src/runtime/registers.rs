// Thu Oct 15 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader};
use serde::Serialize;
use std::fmt;

/// Offset of the program counter behind the sixteen general registers.
pub const PC_OFFSET: u64 = 72;
/// Offset of the host pointer to the instruction being executed.
pub const PC_PTR_OFFSET: u64 = 76;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum M68kRegister {
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
}

impl M68kRegister {
    pub const ALL: [M68kRegister; 16] = [
        Self::D0,
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D4,
        Self::D5,
        Self::D6,
        Self::D7,
        Self::A0,
        Self::A1,
        Self::A2,
        Self::A3,
        Self::A4,
        Self::A5,
        Self::A6,
        Self::A7,
    ];

    pub fn data(n: usize) -> Option<Self> {
        Self::ALL[..8].get(n).copied()
    }

    pub fn address(n: usize) -> Option<Self> {
        Self::ALL[8..].get(n).copied()
    }

    /// Slot in the register bank: data registers first, then address
    /// registers.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn offset(&self) -> u64 {
        self.index() as u64 * 4
    }
}

impl fmt::Display for M68kRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = self.index();
        if i < 8 {
            write!(f, "d{}", i)
        } else {
            write!(f, "a{}", i - 8)
        }
    }
}

/// Read-only view of the emulated CPU's registers. Every read goes to
/// memory; nothing is cached.
pub struct RegisterView<'a, R: MemoryReader + ?Sized> {
    reader: &'a R,
    base: Address,
}

impl<'a, R: MemoryReader + ?Sized> RegisterView<'a, R> {
    pub fn new(reader: &'a R, base: Address) -> Self {
        Self { reader, base }
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn read(&self, register: M68kRegister) -> Result<u32, MemoryError> {
        self.reader.read_u32(self.base + register.offset())
    }

    pub fn data(&self, n: usize) -> Result<u32, MemoryError> {
        let register = M68kRegister::data(n).ok_or_else(|| MemoryError::InvalidAddress(format!("d{}", n)))?;
        self.read(register)
    }

    pub fn address(&self, n: usize) -> Result<u32, MemoryError> {
        let register = M68kRegister::address(n).ok_or_else(|| MemoryError::InvalidAddress(format!("a{}", n)))?;
        self.read(register)
    }

    pub fn d0(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D0)
    }

    pub fn d1(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D1)
    }

    pub fn d2(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D2)
    }

    pub fn d3(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D3)
    }

    pub fn d4(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D4)
    }

    pub fn d5(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D5)
    }

    pub fn d6(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D6)
    }

    pub fn d7(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::D7)
    }

    pub fn a0(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A0)
    }

    pub fn a1(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A1)
    }

    pub fn a2(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A2)
    }

    pub fn a3(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A3)
    }

    pub fn a4(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A4)
    }

    pub fn a5(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A5)
    }

    pub fn a6(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A6)
    }

    /// Also the stack pointer.
    pub fn a7(&self) -> Result<u32, MemoryError> {
        self.read(M68kRegister::A7)
    }

    pub fn pc(&self) -> Result<u32, MemoryError> {
        self.reader.read_u32(self.base + PC_OFFSET)
    }

    pub fn pc_ptr(&self) -> Result<Address, MemoryError> {
        self.reader.read_ptr(self.base + PC_PTR_OFFSET)
    }

    /// All sixteen registers and the program counter, read one after another.
    pub fn snapshot(&self) -> Result<RegisterSnapshot, MemoryError> {
        let mut registers = [0u32; 16];
        for (slot, register) in registers.iter_mut().zip(M68kRegister::ALL) {
            *slot = self.read(register)?;
        }
        Ok(RegisterSnapshot {
            registers,
            pc: self.pc()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterSnapshot {
    pub registers: [u32; 16],
    pub pc: u32,
}

impl RegisterSnapshot {
    pub fn get(&self, register: M68kRegister) -> u32 {
        self.registers[register.index()]
    }
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in M68kRegister::ALL.chunks(4) {
            let line: Vec<String> = row.iter().map(|r| format!("{}={:08x}", r, self.get(*r))).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        write!(f, "pc={:08x}", self.pc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    const BANK: Address = Address::new(0x8000);

    fn host() -> FakeHost {
        let host = FakeHost::arm().with_data(BANK, 0x100);
        for (i, register) in M68kRegister::ALL.iter().enumerate() {
            host.write_u32(BANK + register.offset(), 0x1000 + i as u32).unwrap();
        }
        host.write_u32(BANK + PC_OFFSET, 0x00fc_0002).unwrap();
        host.write_u32(BANK + PC_PTR_OFFSET, 0xb6e0_1234).unwrap();
        host
    }

    #[test]
    fn test_named_reads() {
        let host = host();
        let regs = RegisterView::new(&host, BANK);
        assert_eq!(regs.d0().unwrap(), 0x1000);
        assert_eq!(regs.d7().unwrap(), 0x1007);
        assert_eq!(regs.a0().unwrap(), 0x1008);
        assert_eq!(regs.a7().unwrap(), 0x100f);
        assert_eq!(regs.address(3).unwrap(), regs.a3().unwrap());
        assert_eq!(regs.pc().unwrap(), 0x00fc_0002);
        assert_eq!(regs.pc_ptr().unwrap(), Address::new(0xb6e0_1234));
    }

    #[test]
    fn test_out_of_range_index() {
        let host = host();
        let regs = RegisterView::new(&host, BANK);
        assert!(regs.data(8).is_err());
        assert!(regs.address(8).is_err());
    }

    #[test]
    fn test_reads_are_live() {
        let host = host();
        let regs = RegisterView::new(&host, BANK);
        assert_eq!(regs.d2().unwrap(), 0x1002);
        host.write_u32(BANK + 8, 0xdead_beef).unwrap();
        assert_eq!(regs.d2().unwrap(), 0xdead_beef);
    }

    #[test]
    fn test_snapshot() {
        let host = host();
        let snapshot = RegisterView::new(&host, BANK).snapshot().unwrap();
        assert_eq!(snapshot.get(M68kRegister::A5), 0x100d);
        assert_eq!(snapshot.pc, 0x00fc_0002);
        assert!(snapshot.to_string().starts_with("d0=00001000 d1=00001001"));
        assert_eq!(M68kRegister::A7.to_string(), "a7");
    }
}
