// Thu Oct 15 2026 - Alex

pub mod cache;
pub mod region;
pub mod registers;

pub use crate::finders::MemoryBank;
pub use cache::ResolverState;
pub use region::{MemoryRegionSnapshot, MemoryRegionView};
pub use registers::{M68kRegister, RegisterSnapshot, RegisterView, PC_OFFSET, PC_PTR_OFFSET};

use crate::config::ProbeConfig;
use crate::finders::{AddressResolver, LocateError, ResolvedApi};
use crate::memory::Host;
use parking_lot::Mutex;
use std::sync::Arc;

/// Entry point for reading emulator state through a host.
///
/// Nothing is scanned until the first view is requested. That request
/// resolves the API once; its outcome is kept for the life of the runtime.
pub struct Runtime<H: Host> {
    host: H,
    config: ProbeConfig,
    state: ResolverState,
    // Out-parameter for accessor calls, shared by every region view.
    size_buffer: Mutex<i32>,
}

impl<H: Host> Runtime<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, ProbeConfig::default())
    }

    pub fn with_config(host: H, config: ProbeConfig) -> Self {
        Self::with_state(host, config, ResolverState::new())
    }

    pub fn with_state(host: H, config: ProbeConfig, state: ResolverState) -> Self {
        Self {
            host,
            config,
            state,
            size_buffer: Mutex::new(0),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// The resolved addresses, resolving on first use.
    pub fn api(&self) -> Result<Arc<ResolvedApi>, LocateError> {
        self.state
            .get_or_resolve(|| AddressResolver::new(&self.host, &self.config).resolve())
    }

    pub fn registers(&self) -> Result<RegisterView<'_, H>, LocateError> {
        let api = self.api()?;
        Ok(RegisterView::new(&self.host, api.register_bank()))
    }

    pub fn memory(&self, bank: MemoryBank) -> Result<MemoryRegionView<'_, H>, LocateError> {
        let api = self.api()?;
        Ok(MemoryRegionView::new(&self.host, bank, api.accessor(bank), &self.size_buffer))
    }

    pub fn bootrom(&self) -> Result<MemoryRegionView<'_, H>, LocateError> {
        self.memory(MemoryBank::Bootrom)
    }

    pub fn cram(&self) -> Result<MemoryRegionView<'_, H>, LocateError> {
        self.memory(MemoryBank::Cram)
    }

    pub fn bram(&self) -> Result<MemoryRegionView<'_, H>, LocateError> {
        self.memory(MemoryBank::Bram)
    }

    pub fn mem25bitram(&self) -> Result<MemoryRegionView<'_, H>, LocateError> {
        self.memory(MemoryBank::Mem25BitRam)
    }

    pub fn a3000lram(&self) -> Result<MemoryRegionView<'_, H>, LocateError> {
        self.memory(MemoryBank::A3000LRam)
    }

    pub fn a3000hram(&self) -> Result<MemoryRegionView<'_, H>, LocateError> {
        self.memory(MemoryBank::A3000HRam)
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod process {
    use super::Runtime;
    use crate::memory::ProcessMemory;
    use once_cell::sync::Lazy;

    static PROCESS_RUNTIME: Lazy<Runtime<ProcessMemory>> = Lazy::new(|| Runtime::new(ProcessMemory::current()));

    /// The runtime for the process this library is loaded into, shared by
    /// all callers.
    pub fn process_runtime() -> &'static Runtime<ProcessMemory> {
        &PROCESS_RUNTIME
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use process::process_runtime;
