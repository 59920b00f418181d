// Wed Oct 14 2026 - Alex

pub mod arch;
pub mod arm;
pub mod decoder;

pub use arch::Architecture;
pub use arm::{Arm32Decoder, ArmInstruction, Condition, Opcode, Operand, Register};
pub use decoder::{combine_split_immediate, DecodeError, DecodedImmediate, ImmediateHalf, InstructionDecoder};

/// The decoder for `arch`, or `None` when the probe has no support for it.
pub fn decoder_for(arch: &Architecture) -> Option<Box<dyn InstructionDecoder>> {
    match arch {
        Architecture::Arm => Some(Box::new(Arm32Decoder::new())),
        _ => None,
    }
}
