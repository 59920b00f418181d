// Wed Oct 14 2026 - Alex

use crate::analysis::arm::Register;
use crate::memory::Address;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Immediate(u32),
    Memory {
        base: Register,
        offset: i32,
        pre_indexed: bool,
        writeback: bool,
    },
    RegisterList(u16),
    Target(Address),
}

impl Operand {
    pub fn as_register(&self) -> Option<Register> {
        match *self {
            Operand::Register(reg) => Some(reg),
            _ => None,
        }
    }

    pub fn as_immediate(&self) -> Option<u32> {
        match *self {
            Operand::Immediate(imm) => Some(imm),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operand::Register(reg) => write!(f, "{}", reg),
            Operand::Immediate(imm) => write!(f, "#0x{:x}", imm),
            Operand::Memory { base, offset, pre_indexed, writeback } => {
                if !pre_indexed {
                    write!(f, "[{}], #{}", base, offset)
                } else if offset == 0 {
                    write!(f, "[{}]{}", base, if writeback { "!" } else { "" })
                } else {
                    write!(f, "[{}, #{}]{}", base, offset, if writeback { "!" } else { "" })
                }
            }
            Operand::RegisterList(list) => {
                let regs: Vec<String> = (0..16u8)
                    .filter(|i| list & (1 << i) != 0)
                    .map(|i| Register::new(i).to_string())
                    .collect();
                write!(f, "{{{}}}", regs.join(", "))
            }
            Operand::Target(addr) => write!(f, "{}", addr),
        }
    }
}
