// Mon Oct 12 2026 - Alex

use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Page protection of a mapped range, written `rwx` style (`"r-x"`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: u32 {
        const READ = 0b001;
        const WRITE = 0b010;
        const EXECUTE = 0b100;

        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        const READ_EXECUTE = Self::READ.bits() | Self::EXECUTE.bits();
    }
}

impl Protection {
    pub fn can_read(self) -> bool {
        self.contains(Self::READ)
    }

    pub fn can_write(self) -> bool {
        self.contains(Self::WRITE)
    }

    pub fn can_execute(self) -> bool {
        self.contains(Self::EXECUTE)
    }

    /// True when every permission in `required` is granted.
    pub fn satisfies(self, required: Protection) -> bool {
        self.contains(required)
    }
}

impl FromStr for Protection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(format!("protection must look like \"r-x\", got {:?}", s));
        }

        let mut protection = Protection::empty();
        for (c, (expected, flag)) in chars
            .iter()
            .zip([('r', Self::READ), ('w', Self::WRITE), ('x', Self::EXECUTE)])
        {
            match *c {
                '-' => {}
                c if c == expected => protection |= flag,
                other => return Err(format!("unexpected protection character {:?} in {:?}", other, s)),
            }
        }

        Ok(protection)
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.can_read() { 'r' } else { '-' },
            if self.can_write() { 'w' } else { '-' },
            if self.can_execute() { 'x' } else { '-' },
        )
    }
}
