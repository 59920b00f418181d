// Wed Oct 14 2026 - Alex

pub mod condition;
pub mod decoder;
pub mod opcode;
pub mod operand;
pub mod register;

pub use condition::Condition;
pub use decoder::Arm32Decoder;
pub use opcode::Opcode;
pub use operand::Operand;
pub use register::Register;

use crate::memory::Address;
use std::fmt;

/// A decoded A32 instruction word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmInstruction {
    pub address: Address,
    pub raw: u32,
    pub opcode: Opcode,
    pub condition: Condition,
    pub operands: Vec<Operand>,
}

impl ArmInstruction {
    pub fn new(address: Address, raw: u32) -> Self {
        Self {
            address,
            raw,
            opcode: Opcode::Unknown,
            condition: Condition::from_code((raw >> 28) as u8),
            operands: Vec::new(),
        }
    }

    pub fn with_opcode(mut self, opcode: Opcode) -> Self {
        self.opcode = opcode;
        self
    }

    pub fn with_operands(mut self, operands: Vec<Operand>) -> Self {
        self.operands = operands;
        self
    }

    pub fn is_known(&self) -> bool {
        self.opcode != Opcode::Unknown
    }

    pub fn is_return(&self) -> bool {
        match self.opcode {
            Opcode::BX => self.operands.first().and_then(Operand::as_register) == Some(Register::LR),
            Opcode::POP => matches!(
                self.operands.first(),
                Some(Operand::RegisterList(list)) if list & (1 << Register::PC.index()) != 0
            ),
            _ => false,
        }
    }

    pub fn destination(&self) -> Option<Register> {
        match self.opcode {
            Opcode::MOVW | Opcode::MOVT | Opcode::MOV | Opcode::LDR | Opcode::LDRB => {
                self.operands.first().and_then(Operand::as_register)
            }
            _ => None,
        }
    }

    /// Immediate value of operand `index`, if it is one.
    pub fn immediate(&self, index: usize) -> Option<u32> {
        self.operands.get(index).and_then(Operand::as_immediate)
    }

    pub fn mnemonic(&self) -> String {
        format!("{}{}", self.opcode.mnemonic(), self.condition.suffix())
    }
}

impl fmt::Display for ArmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:08x}  {}", self.address, self.raw, self.mnemonic())?;
        for (i, op) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}", op)?;
        }
        Ok(())
    }
}
