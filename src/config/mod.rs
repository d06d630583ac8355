//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, routes, limits)
//! - The library `Config` struct and the clap-derived `Opt` CLI options

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt};
