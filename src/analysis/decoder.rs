// Wed Oct 14 2026 - Alex

use crate::analysis::Architecture;
use crate::memory::Address;
use crate::pattern::Pattern;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImmediateHalf {
    High,
    Low,
}

impl fmt::Display for ImmediateHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Low => f.write_str("low"),
        }
    }
}

/// One half of a split-immediate load, pulled out of a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedImmediate {
    pub address: Address,
    pub register: u8,
    pub value: u16,
    pub half: ImmediateHalf,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} at {address}, found `{found}`")]
pub struct DecodeError {
    pub address: Address,
    pub expected: String,
    pub found: String,
}

/// Instruction-set knowledge the resolver needs, kept behind one seam so the
/// signature → decode → combine pipeline does not depend on a single ISA.
pub trait InstructionDecoder: Send + Sync {
    fn architecture(&self) -> Architecture;

    /// Width of one instruction word in bytes.
    fn instruction_size(&self) -> u64;

    /// Encoding of the function-return instruction used as a delimiter.
    fn return_pattern(&self) -> Pattern;

    /// Extracts the immediate of a high- or low-half load. Anything else is a
    /// `DecodeError`.
    fn decode_immediate(&self, address: Address, raw: u32) -> Result<DecodedImmediate, DecodeError>;

    /// Disassembly for logs.
    fn describe(&self, address: Address, raw: u32) -> String;
}

/// Rebuilds `(high << 16) | low` from the two halves of a split-immediate
/// load. The halves may arrive in either order but must be one of each and
/// target the same register.
pub fn combine_split_immediate(first: DecodedImmediate, second: DecodedImmediate) -> Result<Address, DecodeError> {
    let (high, low) = match (first.half, second.half) {
        (ImmediateHalf::High, ImmediateHalf::Low) => (first, second),
        (ImmediateHalf::Low, ImmediateHalf::High) => (second, first),
        (half, _) => {
            return Err(DecodeError {
                address: second.address,
                expected: format!("the other half of a split immediate (first was {})", half),
                found: format!("{} half into r{}", second.half, second.register),
            })
        }
    };

    if high.register != low.register {
        return Err(DecodeError {
            address: second.address,
            expected: format!("a load into r{}", first.register),
            found: format!("a load into r{}", second.register),
        });
    }

    Ok(Address::new(((high.value as u64) << 16) | low.value as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half(address: u64, register: u8, value: u16, half: ImmediateHalf) -> DecodedImmediate {
        DecodedImmediate {
            address: Address::new(address),
            register,
            value,
            half,
        }
    }

    #[test]
    fn test_combine_either_order() {
        let low = half(0x100, 4, 0x1234, ImmediateHalf::Low);
        let high = half(0x104, 4, 0x5678, ImmediateHalf::High);
        assert_eq!(combine_split_immediate(low, high).unwrap(), Address::new(0x5678_1234));
        assert_eq!(combine_split_immediate(high, low).unwrap(), Address::new(0x5678_1234));
    }

    #[test]
    fn test_combine_rejects_two_lows() {
        let a = half(0x100, 4, 0x1234, ImmediateHalf::Low);
        let b = half(0x104, 4, 0x5678, ImmediateHalf::Low);
        let err = combine_split_immediate(a, b).unwrap_err();
        assert_eq!(err.address, Address::new(0x104));
    }

    #[test]
    fn test_combine_rejects_register_mismatch() {
        let low = half(0x100, 4, 0x1234, ImmediateHalf::Low);
        let high = half(0x104, 5, 0x5678, ImmediateHalf::High);
        assert!(combine_split_immediate(low, high).is_err());
    }
}
