// Wed Oct 14 2026 - Alex

use crate::analysis::arm::{ArmInstruction, Opcode, Operand, Register};
use crate::analysis::decoder::{DecodeError, DecodedImmediate, ImmediateHalf, InstructionDecoder};
use crate::analysis::Architecture;
use crate::memory::Address;
use crate::pattern::Pattern;

/// `bx lr`, condition AL.
pub const BX_LR: u32 = 0xE12F_FF1E;

/// Decoder for the subset of A32 (ARM state, little-endian) that shows up in
/// the emulator's accessor code. Everything else decodes as `Opcode::Unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arm32Decoder;

impl Arm32Decoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, address: Address, raw: u32) -> ArmInstruction {
        let insn = ArmInstruction::new(address, raw);

        // cond == 0b1111 is the unconditional space; none of it is needed.
        if raw >> 28 == 0xF {
            return insn;
        }

        if raw & 0x0FFF_FFF0 == 0x012F_FF10 {
            return self.decode_branch_exchange(insn, raw, Opcode::BX);
        }
        if raw & 0x0FFF_FFF0 == 0x012F_FF30 {
            return self.decode_branch_exchange(insn, raw, Opcode::BLX);
        }
        if raw & 0x0FF0_0000 == 0x0300_0000 {
            return self.decode_move_wide(insn, raw, Opcode::MOVW);
        }
        if raw & 0x0FF0_0000 == 0x0340_0000 {
            return self.decode_move_wide(insn, raw, Opcode::MOVT);
        }
        if raw & 0x0FFF_0000 == 0x092D_0000 {
            return insn
                .with_opcode(Opcode::PUSH)
                .with_operands(vec![Operand::RegisterList((raw & 0xFFFF) as u16)]);
        }
        if raw & 0x0FFF_0000 == 0x08BD_0000 {
            return insn
                .with_opcode(Opcode::POP)
                .with_operands(vec![Operand::RegisterList((raw & 0xFFFF) as u16)]);
        }
        if raw & 0x0FEF_0FF0 == 0x01A0_0000 {
            return insn.with_opcode(Opcode::MOV).with_operands(vec![
                Operand::Register(Register::new(((raw >> 12) & 0xF) as u8)),
                Operand::Register(Register::new((raw & 0xF) as u8)),
            ]);
        }

        match (raw >> 25) & 0x7 {
            0b001 => self.decode_data_processing_imm(insn, raw),
            0b010 => self.decode_load_store_imm(insn, raw),
            0b101 => self.decode_branch(insn, raw),
            _ => insn,
        }
    }

    fn decode_branch_exchange(&self, insn: ArmInstruction, raw: u32, opcode: Opcode) -> ArmInstruction {
        insn.with_opcode(opcode)
            .with_operands(vec![Operand::Register(Register::new((raw & 0xF) as u8))])
    }

    fn decode_move_wide(&self, insn: ArmInstruction, raw: u32, opcode: Opcode) -> ArmInstruction {
        let rd = ((raw >> 12) & 0xF) as u8;
        let imm16 = ((raw >> 4) & 0xF000) | (raw & 0x0FFF);
        insn.with_opcode(opcode)
            .with_operands(vec![Operand::Register(Register::new(rd)), Operand::Immediate(imm16)])
    }

    fn decode_data_processing_imm(&self, insn: ArmInstruction, raw: u32) -> ArmInstruction {
        let op = (raw >> 21) & 0xF;
        let set_flags = (raw >> 20) & 1 == 1;
        let rn = Register::new(((raw >> 16) & 0xF) as u8);
        let rd = Register::new(((raw >> 12) & 0xF) as u8);
        let rotate = ((raw >> 8) & 0xF) * 2;
        let imm = (raw & 0xFF).rotate_right(rotate);

        match (op, set_flags) {
            (0b1010, true) => insn
                .with_opcode(Opcode::CMP)
                .with_operands(vec![Operand::Register(rn), Operand::Immediate(imm)]),
            (0b1101, _) => insn
                .with_opcode(Opcode::MOV)
                .with_operands(vec![Operand::Register(rd), Operand::Immediate(imm)]),
            _ => insn,
        }
    }

    fn decode_load_store_imm(&self, insn: ArmInstruction, raw: u32) -> ArmInstruction {
        let pre_indexed = (raw >> 24) & 1 == 1;
        let add = (raw >> 23) & 1 == 1;
        let byte = (raw >> 22) & 1 == 1;
        let writeback = (raw >> 21) & 1 == 1 || !pre_indexed;
        let load = (raw >> 20) & 1 == 1;
        let rn = Register::new(((raw >> 16) & 0xF) as u8);
        let rt = Register::new(((raw >> 12) & 0xF) as u8);
        let imm12 = (raw & 0xFFF) as i32;

        let opcode = match (load, byte) {
            (true, false) => Opcode::LDR,
            (true, true) => Opcode::LDRB,
            (false, false) => Opcode::STR,
            (false, true) => Opcode::STRB,
        };

        insn.with_opcode(opcode).with_operands(vec![
            Operand::Register(rt),
            Operand::Memory {
                base: rn,
                offset: if add { imm12 } else { -imm12 },
                pre_indexed,
                writeback,
            },
        ])
    }

    fn decode_branch(&self, insn: ArmInstruction, raw: u32) -> ArmInstruction {
        let link = (raw >> 24) & 1 == 1;
        let offset = (((raw & 0x00FF_FFFF) << 8) as i32 >> 6) as i64;

        match insn.address.checked_offset(offset + 8) {
            Some(target) => insn
                .with_opcode(if link { Opcode::BL } else { Opcode::B })
                .with_operands(vec![Operand::Target(target)]),
            None => insn,
        }
    }
}

impl InstructionDecoder for Arm32Decoder {
    fn architecture(&self) -> Architecture {
        Architecture::Arm
    }

    fn instruction_size(&self) -> u64 {
        4
    }

    fn return_pattern(&self) -> Pattern {
        Pattern::from_bytes(&BX_LR.to_le_bytes()).with_name("bx lr")
    }

    fn decode_immediate(&self, address: Address, raw: u32) -> Result<DecodedImmediate, DecodeError> {
        let insn = self.decode(address, raw);

        let half = match insn.opcode {
            Opcode::MOVW => ImmediateHalf::Low,
            Opcode::MOVT => ImmediateHalf::High,
            _ => {
                return Err(DecodeError {
                    address,
                    expected: "movw/movt".to_string(),
                    found: insn.to_string(),
                })
            }
        };

        let (Some(register), Some(value)) = (insn.destination(), insn.immediate(1)) else {
            return Err(DecodeError {
                address,
                expected: "register and 16-bit immediate operands".to_string(),
                found: insn.to_string(),
            });
        };

        Ok(DecodedImmediate {
            address,
            register: register.index(),
            value: value as u16,
            half,
        })
    }

    fn describe(&self, address: Address, raw: u32) -> String {
        self.decode(address, raw).to_string()
    }
}
