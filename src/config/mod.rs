//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (window size, timeouts, default paths)
//! - The library `Config` struct
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{CollectArgs, Command, Opt};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
