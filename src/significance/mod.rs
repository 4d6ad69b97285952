//! Surrogate-based significance assessment of pattern signatures.
//!
//! This module provides:
//! - The null-model sampler producing per-draw maximum supports
//! - The p-value spectrum derived from those maxima
//! - Multiple testing corrections over the p-value spectrum

mod correction;
mod pvalue;
mod surrogate;

pub use correction::{test_signature_significance, Correction, SignificanceTest};
pub use pvalue::{PValueEntry, PValueSpectrum};
pub use surrogate::{MaxSupportDistribution, NullModelSampler};

use crate::data::DataError;
use crate::mining::MiningError;
use thiserror::Error;

/// Errors during significance assessment
#[derive(Error, Debug)]
pub enum SignificanceError {
    #[error("Number of surrogates must be at least 1")]
    NoSurrogates,
    #[error("Correction must be one of '' ('no'), 'b' ('bonf'), 'f' ('fdr') or 'hb' ('holm_bonf'), got '{0}'")]
    InvalidCorrection(String),
    #[error("Significance level must be in (0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Mining(#[from] MiningError),
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
