// Mon Oct 12 2026 - Alex

pub mod address;
pub mod binary;
pub mod error;
pub mod module;
pub mod process;
pub mod protection;
pub mod range;
pub mod region;
pub mod traits;

pub use address::Address;
pub use binary::BinaryMemory;
pub use error::MemoryError;
pub use module::Module;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use process::ProcessMemory;
pub use process::{parse_maps, MapsEntry};
pub use protection::Protection;
pub use range::MemoryRange;
pub use region::MemoryRegion;
pub use traits::{Host, MemoryReader};
