//! Shared utilities.
//!
//! Content hashing for cache validation and atomic file writes for
//! generated artifacts.

pub mod fs;
pub mod hash;

#[cfg(test)]
pub mod testutil;
