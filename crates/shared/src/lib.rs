//! # Kwoon Shared
//!
//! Configuration and error types used by the adapter and application crates.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
