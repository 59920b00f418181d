// Mon Oct 12 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const NULL: Address = Address { value: 0 };

    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self { value: ptr as usize as u64 }
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn as_usize(&self) -> usize {
        self.value as usize
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.value as usize as *const u8
    }

    pub fn as_mut_ptr(&self) -> *mut u8 {
        self.value as usize as *mut u8
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    /// Signed displacement; `None` when the result leaves the address space.
    pub fn checked_offset(&self, delta: i64) -> Option<Self> {
        self.value.checked_add_signed(delta).map(Self::new)
    }

    pub fn checked_add(&self, len: u64) -> Option<Self> {
        self.value.checked_add(len).map(Self::new)
    }

    pub fn distance(&self, other: Self) -> i64 {
        self.value.wrapping_sub(other.value) as i64
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value <= u32::MAX as u64 {
            write!(f, "0x{:08x}", self.value)
        } else {
            write!(f, "0x{:016x}", self.value)
        }
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        Self { value: self.value + rhs }
    }
}

impl Sub<u64> for Address {
    type Output = Self;
    fn sub(self, rhs: u64) -> Self::Output {
        Self { value: self.value - rhs }
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Self::new(value as u64)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
