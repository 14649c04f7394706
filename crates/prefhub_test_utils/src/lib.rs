//! # PrefHub Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Scenario and token-storage fixtures
//! - An in-process mock game server
//! - Recording client doubles
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod mock_server;
pub mod recording;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
