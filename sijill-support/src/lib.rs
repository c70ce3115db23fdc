//! # Sijill Support
//!
//! Shared utilities for the Sijill container crates:
//! - Text rendering for diagnostics (chains, type names, suggestions)
//! - Tracing subscriber setup for binaries and tests

pub mod logging;
pub mod rendering;
