//! Concept stability.
//!
//! This module provides:
//! - Intensional and extensional stability estimation, exact or sampled
//! - Filtering of concepts by stability thresholds

mod estimator;

pub use estimator::{stability_filter, StabilityEstimator};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stability scores of a concept, both in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stability {
    /// Fraction of intent subsets whose extent equals the concept's extent
    pub intensional: f64,
    /// Fraction of extent subsets whose intent equals the concept's intent
    pub extensional: f64,
}

/// Errors during stability estimation
#[derive(Error, Debug)]
pub enum StabilityError {
    #[error("n_subsets has to be >= 1 or delta + epsilon > 0")]
    InvalidSubsetCount,
    #[error("delta must be in (0, 1) and epsilon positive, got delta={delta}, epsilon={epsilon}")]
    InvalidBounds { delta: f64, epsilon: f64 },
    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
