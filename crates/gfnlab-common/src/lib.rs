//! gfnlab-common — Shared types and errors used across all GFN Lab crates.

pub mod error;
pub mod factors;
pub mod catalog;

// Re-export commonly used types
pub use catalog::{Catalog, Experiment};
pub use error::{GfnError, Result};
pub use factors::{SieveFactors, SIEVE_COUNT};
