// Wed Oct 14 2026 - Alex

use std::fmt;

/// Host CPU architecture as reported by the instrumentation runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Architecture {
    Arm,
    Arm64,
    Ia32,
    X64,
    Mips,
    Other(String),
}

impl Architecture {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "arm" => Self::Arm,
            "arm64" | "aarch64" => Self::Arm64,
            "ia32" | "x86" => Self::Ia32,
            "x64" | "x86_64" => Self::X64,
            "mips" => Self::Mips,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Ia32 => "ia32",
            Self::X64 => "x64",
            Self::Mips => "mips",
            Self::Other(name) => name,
        }
    }

    pub fn pointer_size(&self) -> Option<usize> {
        match self {
            Self::Arm | Self::Ia32 | Self::Mips => Some(4),
            Self::Arm64 | Self::X64 => Some(8),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
