// Wed Oct 14 2026 - Alex

use crate::finders::LocateError;
use crate::memory::Address;
use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The emulated memory banks, in dispatcher order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryBank {
    Bootrom,
    Cram,
    Bram,
    #[serde(rename = "mem25bitram")]
    Mem25BitRam,
    #[serde(rename = "a3000lram")]
    A3000LRam,
    #[serde(rename = "a3000hram")]
    A3000HRam,
}

impl MemoryBank {
    pub const ALL: [MemoryBank; 6] = [
        MemoryBank::Bootrom,
        MemoryBank::Cram,
        MemoryBank::Bram,
        MemoryBank::Mem25BitRam,
        MemoryBank::A3000LRam,
        MemoryBank::A3000HRam,
    ];

    /// Banks whose accessors follow the dispatcher's return instructions,
    /// one per delimiter.
    pub const DELIMITED: [MemoryBank; 5] = [
        MemoryBank::Cram,
        MemoryBank::Bram,
        MemoryBank::Mem25BitRam,
        MemoryBank::A3000LRam,
        MemoryBank::A3000HRam,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MemoryBank::Bootrom => "bootrom",
            MemoryBank::Cram => "cram",
            MemoryBank::Bram => "bram",
            MemoryBank::Mem25BitRam => "mem25bitram",
            MemoryBank::A3000LRam => "a3000lram",
            MemoryBank::A3000HRam => "a3000hram",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for MemoryBank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryBank::ALL
            .iter()
            .copied()
            .find(|bank| bank.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown memory bank: {}", s))
    }
}

impl fmt::Display for MemoryBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The outcome of a successful resolution: the 68k register bank and one
/// accessor routine per memory bank. Always complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApi {
    register_bank: Address,
    accessors: [Address; 6],
}

impl ResolvedApi {
    /// Fails with `MissingAccessor` unless every bank has an entry.
    pub fn new(register_bank: Address, accessors: &IndexMap<MemoryBank, Address>) -> Result<Self, LocateError> {
        let mut table = [Address::NULL; 6];
        for bank in MemoryBank::ALL {
            table[bank.index()] = *accessors
                .get(&bank)
                .ok_or_else(|| LocateError::MissingAccessor(bank.name().to_string()))?;
        }

        Ok(Self {
            register_bank,
            accessors: table,
        })
    }

    pub fn register_bank(&self) -> Address {
        self.register_bank
    }

    pub fn accessor(&self, bank: MemoryBank) -> Address {
        self.accessors[bank.index()]
    }

    pub fn accessors(&self) -> IndexMap<MemoryBank, Address> {
        MemoryBank::ALL.iter().map(|&bank| (bank, self.accessor(bank))).collect()
    }
}

impl Serialize for ResolvedApi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResolvedApi", 2)?;
        state.serialize_field("register_bank", &self.register_bank)?;
        state.serialize_field("accessors", &self.accessors())?;
        state.end()
    }
}

impl fmt::Display for ResolvedApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<14} {}", "regs", self.register_bank)?;
        for (bank, addr) in self.accessors() {
            writeln!(f, "{:<14} {}", bank.name(), addr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> IndexMap<MemoryBank, Address> {
        MemoryBank::ALL
            .iter()
            .enumerate()
            .map(|(i, &bank)| (bank, Address::new(0x1000 + i as u64 * 0x20)))
            .collect()
    }

    #[test]
    fn test_bank_names_round_trip() {
        for bank in MemoryBank::ALL {
            assert_eq!(bank.name().parse::<MemoryBank>().unwrap(), bank);
        }
        assert!("chipram".parse::<MemoryBank>().is_err());
        assert_eq!(MemoryBank::DELIMITED[0], MemoryBank::Cram);
    }

    #[test]
    fn test_incomplete_table_is_rejected() {
        let mut table = full_table();
        table.shift_remove(&MemoryBank::Bram);
        let err = ResolvedApi::new(Address::new(0x2000), &table).unwrap_err();
        assert_eq!(err, LocateError::MissingAccessor("bram".to_string()));
    }

    #[test]
    fn test_accessors_keep_bank_order() {
        let mut table = full_table();
        // Insertion order must not leak into the resolved table.
        table.reverse();
        let api = ResolvedApi::new(Address::new(0x2000), &table).unwrap();
        let banks: Vec<_> = api.accessors().keys().copied().collect();
        assert_eq!(banks, MemoryBank::ALL.to_vec());
        assert_eq!(api.accessor(MemoryBank::Cram), Address::new(0x1020));
    }

    #[test]
    fn test_serializes_bank_names() {
        let api = ResolvedApi::new(Address::new(0x2000), &full_table()).unwrap();
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["register_bank"], 0x2000);
        assert_eq!(json["accessors"]["mem25bitram"], 0x1060);
        assert!(api.to_string().contains("a3000hram"));
    }
}
