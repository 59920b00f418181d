// Wed Oct 14 2026 - Alex

use crate::pattern::PatternError;
use std::fmt;

/// Matches one byte against a value under a mask. Wildcards work per nibble:
/// `4?` compares only the high nibble, `??` compares nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteMatcher {
    value: u8,
    mask: u8,
}

impl ByteMatcher {
    pub fn exact(value: u8) -> Self {
        Self { value, mask: 0xFF }
    }

    pub fn any() -> Self {
        Self { value: 0, mask: 0 }
    }

    /// `None` leaves that nibble unconstrained.
    pub fn nibbles(high: Option<u8>, low: Option<u8>) -> Self {
        let mut value = 0;
        let mut mask = 0;
        if let Some(h) = high {
            value |= (h & 0xF) << 4;
            mask |= 0xF0;
        }
        if let Some(l) = low {
            value |= l & 0xF;
            mask |= 0x0F;
        }
        Self { value, mask }
    }

    pub fn matches(&self, byte: u8) -> bool {
        byte & self.mask == self.value
    }

    pub fn is_any(&self) -> bool {
        self.mask == 0
    }

    pub fn is_exact(&self) -> bool {
        self.mask == 0xFF
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }
}

impl fmt::Display for ByteMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nibble = |shift: u8| {
            if (self.mask >> shift) & 0xF == 0 {
                '?'
            } else {
                char::from_digit(((self.value >> shift) & 0xF) as u32, 16).unwrap_or('?')
            }
        };
        write!(f, "{}{}", nibble(4), nibble(0))
    }
}

/// A wildcarded byte signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    matchers: Vec<ByteMatcher>,
    name: Option<String>,
}

impl Pattern {
    pub fn new(matchers: Vec<ByteMatcher>) -> Self {
        Self { matchers, name: None }
    }

    /// Parses `"70 40 2d e9 ?? 4? 0? e3"`. Whitespace is ignored, so the
    /// byte pairs may also run together; hex digits are case-insensitive and
    /// `?` wildcards a single nibble.
    pub fn parse(signature: &str) -> Result<Self, PatternError> {
        let digits: Vec<char> = signature.chars().filter(|c| !c.is_whitespace()).collect();

        if digits.is_empty() {
            return Err(PatternError::Empty);
        }
        if digits.len() % 2 != 0 {
            return Err(PatternError::OddNibbles(signature.to_string()));
        }

        let nibble = |c: char| -> Result<Option<u8>, PatternError> {
            match c {
                '?' => Ok(None),
                c => c
                    .to_digit(16)
                    .map(|d| Some(d as u8))
                    .ok_or_else(|| PatternError::InvalidDigit {
                        digit: c,
                        pattern: signature.to_string(),
                    }),
            }
        };

        let matchers = digits
            .chunks(2)
            .map(|pair| Ok(ByteMatcher::nibbles(nibble(pair[0])?, nibble(pair[1])?)))
            .collect::<Result<Vec<_>, PatternError>>()?;

        Ok(Self::new(matchers))
    }

    /// Parses a signature given one instruction per entry.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self, PatternError> {
        let joined: String = parts.iter().map(|p| p.as_ref()).collect::<Vec<_>>().join(" ");
        Self::parse(&joined)
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().copied().map(ByteMatcher::exact).collect())
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn matchers(&self) -> &[ByteMatcher] {
        &self.matchers
    }

    /// True when `data` starts with bytes matching every matcher.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() >= self.matchers.len()
            && self.matchers.iter().zip(data).all(|(m, &b)| m.matches(b))
    }

    /// Every offset in `data` where the pattern matches, ascending. No
    /// alignment is assumed.
    pub fn find_all_in(&self, data: &[u8]) -> Vec<usize> {
        if self.matchers.is_empty() || data.len() < self.matchers.len() {
            return Vec::new();
        }

        // Cheap first check on the first fully specified byte.
        let anchor = self.matchers.iter().position(ByteMatcher::is_exact);

        (0..=data.len() - self.matchers.len())
            .filter(|&i| match anchor {
                Some(a) => data[i + a] == self.matchers[a].value,
                None => true,
            })
            .filter(|&i| self.matches(&data[i..]))
            .collect()
    }

    pub fn to_hex_string(&self) -> String {
        self.matchers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.name {
            write!(f, "{}: ", name)?;
        }
        write!(f, "{}", self.to_hex_string())
    }
}
