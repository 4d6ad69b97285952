//! Utilities module for common functionality.
//!
//! This module provides:
//! - Configuration handling
//! - Logging setup
//! - A fan-out worker pool for independent units of work

mod config;
mod logging;
pub mod parallel;

pub use config::{
    ConfigError, MiningConfig, SignificanceConfig, SpadeConfig, StabilityConfig, SurrogateConfig,
};
pub use logging::setup_logging;
pub use parallel::fan_out;
