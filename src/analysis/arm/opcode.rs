// Wed Oct 14 2026 - Alex

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    MOVW,
    MOVT,
    MOV,
    CMP,
    LDR,
    LDRB,
    STR,
    STRB,
    PUSH,
    POP,
    B,
    BL,
    BX,
    BLX,
    Unknown,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::MOVW => "movw",
            Opcode::MOVT => "movt",
            Opcode::MOV => "mov",
            Opcode::CMP => "cmp",
            Opcode::LDR => "ldr",
            Opcode::LDRB => "ldrb",
            Opcode::STR => "str",
            Opcode::STRB => "strb",
            Opcode::PUSH => "push",
            Opcode::POP => "pop",
            Opcode::B => "b",
            Opcode::BL => "bl",
            Opcode::BX => "bx",
            Opcode::BLX => "blx",
            Opcode::Unknown => "<unknown>",
        }
    }
}
