//! # Basedef Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Grid and session fixtures
//! - Transporter-chain builders
//! - Determinism verification harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
