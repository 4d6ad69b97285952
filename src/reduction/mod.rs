//! Pattern set reduction.
//!
//! This module provides:
//! - The pattern spectrum filter, dropping concepts with non-significant
//!   signatures
//! - Pairwise reduction of patterns explained by a shifted super- or subset

mod filter;
mod psr;

pub use filter::pattern_spectrum_filter;
pub use psr::{PatternSetReducer, ReductionParams};
