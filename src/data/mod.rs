//! Spike train data handling.
//!
//! This module provides:
//! - Spike train containers with common-bounds validation
//! - Binning of spike trains into a boolean stream x bin matrix
//! - Surrogate generation by spike time dithering
//! - Homogeneous Poisson generation for test data

mod binning;
mod generation;
mod spike_train;
mod surrogates;

pub use binning::BinnedSpikeTrains;
pub use generation::PoissonGenerator;
pub use spike_train::{check_common_bounds, SpikeTrain};
pub use surrogates::{Surrogate, UniformDither};

use thiserror::Error;

/// Errors raised while preparing spike train data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("All spike trains must share t_start and t_stop (train {index}: [{t_start}, {t_stop}) vs [{expected_start}, {expected_stop}))")]
    MismatchedBounds {
        index: usize,
        t_start: f64,
        t_stop: f64,
        expected_start: f64,
        expected_stop: f64,
    },
    #[error("No spike trains given")]
    EmptyInput,
    #[error("Invalid time interval: t_start {t_start} must be below t_stop {t_stop}")]
    InvalidInterval { t_start: f64, t_stop: f64 },
    #[error("Spike time {time} lies outside [{t_start}, {t_stop}]")]
    SpikeOutOfBounds { time: f64, t_start: f64, t_stop: f64 },
    #[error("Invalid bin size: {0}")]
    InvalidBinSize(f64),
    #[error("Invalid dither: {0}")]
    InvalidDither(f64),
    #[error("Invalid rate: {0}")]
    InvalidRate(f64),
    #[error("Refractory period {refractory} too long for rate {rate} Hz")]
    InvalidRefractoryPeriod { rate: f64, refractory: f64 },
}
