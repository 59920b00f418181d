// Wed Oct 14 2026 - Alex

use crate::memory::Address;
use crate::pattern::{Pattern, PatternError};
use serde::{Deserialize, Serialize};

/// A named byte signature and where its point of interest sits relative to
/// the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    pattern: Pattern,
    anchor: i64,
}

impl Signature {
    pub fn new(name: &str, pattern: Pattern, anchor: i64) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.with_name(name),
            anchor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn anchor(&self) -> i64 {
        self.anchor
    }

    /// Applies the anchor to a match address.
    pub fn resolve(&self, matched: Address) -> Option<Address> {
        matched.checked_offset(self.anchor)
    }
}

/// Serializable form of a `Signature`: one string per instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSpec {
    pub name: String,
    pub pattern: Vec<String>,
    #[serde(default)]
    pub anchor: i64,
}

impl SignatureSpec {
    pub fn new(name: &str, pattern: &[&str], anchor: i64) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.iter().map(|s| s.to_string()).collect(),
            anchor,
        }
    }

    pub fn compile(&self) -> Result<Signature, PatternError> {
        Ok(Signature::new(&self.name, Pattern::from_parts(&self.pattern)?, self.anchor))
    }
}

/// The two signatures resolution runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSet {
    /// Precedes the movw/movt pair that loads the 68k register bank address.
    /// Anchored on the first instruction of that pair.
    pub register_bank: SignatureSpec,
    /// Entry of the memory-bank dispatcher, whose first sub-routine returns
    /// the boot ROM. Anchored on the routine entry.
    pub memory_dispatcher: SignatureSpec,
}

impl Default for SignatureSet {
    fn default() -> Self {
        Self {
            register_bank: SignatureSpec::new(
                "m68k_setstopped()",
                &[
                    "70 40 2d e9", // push {r4, r5, r6, lr}
                    "?? 4? 0? e3", // movw r4, #lo
                    "?? 4? 4? e3", // movt r4, #hi
                    "64 30 94 e5", // ldr  r3, [r4, #100]
                    "7f 20 d4 e5", // ldrb r2, [r4, #0x7f]
                ],
                4,
            ),
            // Starts one byte into the first movw, whose low byte is all
            // immediate bits.
            memory_dispatcher: SignatureSpec::new(
                "save_bootrom()",
                &[
                    "3? 0? e3",    // movw   r3, #lo
                    "?? 3? 4? e3", // movt   r3, #hi
                    "00 30 93 e5", // ldr    r3, [r3]
                    "00 00 53 e3", // cmp    r3, #0
                    "?? 2? 0? 13", // movwne r2, #lo
                    "?? 2? 4? 13", // movtne r2, #hi
                ],
                -1,
            ),
        }
    }
}

pub struct CompiledSignatures {
    pub register_bank: Signature,
    pub memory_dispatcher: Signature,
}

impl SignatureSet {
    pub fn compile(&self) -> Result<CompiledSignatures, PatternError> {
        Ok(CompiledSignatures {
            register_bank: self.register_bank.compile()?,
            memory_dispatcher: self.memory_dispatcher.compile()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_signatures_compile() {
        let compiled = SignatureSet::default().compile().unwrap();
        assert_eq!(compiled.register_bank.pattern().len(), 20);
        assert_eq!(compiled.memory_dispatcher.pattern().len(), 23);
        assert_eq!(compiled.memory_dispatcher.anchor(), -1);
        assert_eq!(compiled.register_bank.pattern().name(), Some("m68k_setstopped()"));
    }

    #[test]
    fn test_anchor_applies_signed_offset() {
        let sig = Signature::new("x", Pattern::from_bytes(&[0]), -1);
        assert_eq!(sig.resolve(Address::new(0x1001)), Some(Address::new(0x1000)));
        assert_eq!(sig.resolve(Address::NULL), None);
    }
}
