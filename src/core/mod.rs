//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;
pub mod session;

// Re-export main types for cleaner imports
pub use conversion::{ConversionError, ConversionRecord};
pub use currency::{RateProvider, RateSnapshot, RateTable};
pub use session::ConversionSession;
