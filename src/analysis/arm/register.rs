// Wed Oct 14 2026 - Alex

use std::fmt;

/// A32 core register `r0`..`r15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u8);

impl Register {
    pub const SP: Register = Register(13);
    pub const LR: Register = Register(14);
    pub const PC: Register = Register(15);

    pub fn new(index: u8) -> Self {
        Self(index & 0xF)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            13 => f.write_str("sp"),
            14 => f.write_str("lr"),
            15 => f.write_str("pc"),
            n => write!(f, "r{}", n),
        }
    }
}
