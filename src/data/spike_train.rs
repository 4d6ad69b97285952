//! Spike train container.

use super::DataError;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing time bounds of different trains
const BOUNDS_TOLERANCE: f64 = 1e-9;

/// A single spike train: sorted spike times within `[t_start, t_stop]`.
///
/// Times are expressed in milliseconds throughout the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeTrain {
    /// Spike times (ms), ascending
    pub times: Vec<f64>,
    /// Start of the observation interval (ms)
    pub t_start: f64,
    /// End of the observation interval (ms)
    pub t_stop: f64,
}

impl SpikeTrain {
    /// Create a spike train, sorting the spike times.
    pub fn new(mut times: Vec<f64>, t_start: f64, t_stop: f64) -> Result<Self, DataError> {
        if !(t_start < t_stop) {
            return Err(DataError::InvalidInterval { t_start, t_stop });
        }
        if let Some(&time) = times.iter().find(|&&t| !(t >= t_start && t <= t_stop)) {
            return Err(DataError::SpikeOutOfBounds {
                time,
                t_start,
                t_stop,
            });
        }
        times.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            times,
            t_start,
            t_stop,
        })
    }

    /// Number of spikes
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the train has no spikes
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Length of the observation interval
    pub fn duration(&self) -> f64 {
        self.t_stop - self.t_start
    }

    /// Mean firing rate in Hz
    pub fn rate(&self) -> f64 {
        if self.duration() <= 0.0 {
            return 0.0;
        }
        self.len() as f64 / self.duration() * 1000.0
    }

    /// Check whether both trains share the same observation interval
    pub fn same_bounds(&self, other: &SpikeTrain) -> bool {
        (self.t_start - other.t_start).abs() <= BOUNDS_TOLERANCE
            && (self.t_stop - other.t_stop).abs() <= BOUNDS_TOLERANCE
    }
}

/// Verify that all trains share `t_start` and `t_stop`, returning them.
pub fn check_common_bounds(trains: &[SpikeTrain]) -> Result<(f64, f64), DataError> {
    let first = trains.first().ok_or(DataError::EmptyInput)?;

    for (index, train) in trains.iter().enumerate().skip(1) {
        if !train.same_bounds(first) {
            return Err(DataError::MismatchedBounds {
                index,
                t_start: train.t_start,
                t_stop: train.t_stop,
                expected_start: first.t_start,
                expected_stop: first.t_stop,
            });
        }
    }

    Ok((first.t_start, first.t_stop))
}
