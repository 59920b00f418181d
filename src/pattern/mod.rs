// Wed Oct 14 2026 - Alex

pub mod error;
pub mod pattern;
pub mod scanner;

pub use error::PatternError;
pub use pattern::{ByteMatcher, Pattern};
pub use scanner::PatternScanner;
