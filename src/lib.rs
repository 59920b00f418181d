// Thu Oct 15 2026 - Alex

//! Finds a running Amiberry's 68k register bank and memory-bank accessors by
//! signature scanning its stripped ARM code, and exposes them as live views.

pub mod analysis;
pub mod config;
pub mod finders;
pub mod memory;
pub mod pattern;
pub mod runtime;
pub mod testing;

pub use analysis::{decoder_for, Architecture, Arm32Decoder, InstructionDecoder};
pub use config::ProbeConfig;
pub use finders::{AddressResolver, LocateError, MemoryBank, ResolvedApi, SignatureSet};
pub use memory::{Address, BinaryMemory, Host, MemoryError, MemoryReader, Protection};
pub use pattern::{Pattern, PatternScanner};
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use runtime::process_runtime;
pub use runtime::{MemoryRegionSnapshot, MemoryRegionView, RegisterView, ResolverState, Runtime};
