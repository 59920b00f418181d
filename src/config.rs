// Thu Oct 15 2026 - Alex

use crate::finders::SignatureSet;
use crate::memory::Protection;
use crate::pattern::PatternScanner;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Which enumerated module holds the emulator code. The main executable
    /// comes first.
    pub module_index: usize,
    pub code_protection: String,
    /// Bytes scanned behind the dispatcher entry for return instructions.
    pub delimiter_window: u64,
    pub scan_chunk_size: usize,
    pub signatures: SignatureSet,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            module_index: 0,
            code_protection: "r-x".to_string(),
            delimiter_window: 1024,
            scan_chunk_size: PatternScanner::DEFAULT_CHUNK_SIZE,
            signatures: SignatureSet::default(),
        }
    }
}

impl ProbeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module_index(mut self, index: usize) -> Self {
        self.module_index = index;
        self
    }

    pub fn with_code_protection(mut self, protection: &str) -> Self {
        self.code_protection = protection.to_string();
        self
    }

    pub fn with_delimiter_window(mut self, window: u64) -> Self {
        self.delimiter_window = window;
        self
    }

    pub fn with_scan_chunk_size(mut self, size: usize) -> Self {
        self.scan_chunk_size = size;
        self
    }

    pub fn with_signatures(mut self, signatures: SignatureSet) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn protection(&self) -> Result<Protection, String> {
        self.code_protection.parse()
    }

    pub fn scanner(&self) -> PatternScanner {
        PatternScanner::new().with_chunk_size(self.scan_chunk_size)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.delimiter_window == 0 {
            return Err("delimiter_window must be greater than 0".to_string());
        }
        if self.scan_chunk_size == 0 {
            return Err("scan_chunk_size must be greater than 0".to_string());
        }
        let protection = self.protection()?;
        if !protection.can_read() {
            return Err(format!("code_protection {} does not grant read access", protection));
        }
        self.signatures.compile().map_err(|e| format!("invalid signature: {}", e))?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }
}
