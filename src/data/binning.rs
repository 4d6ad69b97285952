//! Discretization of spike trains into a boolean stream x bin matrix.

use super::{check_common_bounds, DataError, SpikeTrain};
use ndarray::Array2;

/// Rounding tolerance applied before flooring bin positions
const BIN_TOLERANCE: f64 = 1e-8;

/// Spike trains clipped into bins of equal width.
///
/// Entry `[stream, bin]` is true iff the stream fired at least once in that
/// bin. Spikes falling at or after the last full bin are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedSpikeTrains {
    matrix: Array2<bool>,
    bin_size: f64,
    t_start: f64,
}

impl BinnedSpikeTrains {
    /// Bin the given trains, which must share their time bounds.
    pub fn new(trains: &[SpikeTrain], bin_size: f64) -> Result<Self, DataError> {
        if !(bin_size > 0.0) || !bin_size.is_finite() {
            return Err(DataError::InvalidBinSize(bin_size));
        }
        let (t_start, t_stop) = check_common_bounds(trains)?;
        let num_bins = ((t_stop - t_start) / bin_size + BIN_TOLERANCE).floor() as usize;

        let mut matrix = Array2::from_elem((trains.len(), num_bins), false);
        for (stream, train) in trains.iter().enumerate() {
            for &time in &train.times {
                let position = (time - t_start) / bin_size + BIN_TOLERANCE;
                if position < 0.0 {
                    continue;
                }
                let bin = position.floor() as usize;
                if bin < num_bins {
                    matrix[[stream, bin]] = true;
                }
            }
        }

        Ok(Self {
            matrix,
            bin_size,
            t_start,
        })
    }

    /// The boolean stream x bin matrix
    pub fn matrix(&self) -> &Array2<bool> {
        &self.matrix
    }

    /// Consume and return the matrix
    pub fn into_matrix(self) -> Array2<bool> {
        self.matrix
    }

    /// Number of streams (rows)
    pub fn num_streams(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of bins (columns)
    pub fn num_bins(&self) -> usize {
        self.matrix.ncols()
    }

    /// Width of a bin (ms)
    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// Start time of the first bin (ms)
    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    /// Number of occupied (stream, bin) entries
    pub fn num_events(&self) -> usize {
        self.matrix.iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binning_clips_and_drops_edge() {
        let a = SpikeTrain::new(vec![0.0, 1.0, 4.5, 10.0], 0.0, 10.0).unwrap();
        let b = SpikeTrain::new(vec![2.0, 9.9], 0.0, 10.0).unwrap();
        let binned = BinnedSpikeTrains::new(&[a, b], 2.0).unwrap();

        assert_eq!(binned.num_streams(), 2);
        assert_eq!(binned.num_bins(), 5);
        // 0.0 and 1.0 share bin 0, 10.0 falls past the last bin
        assert!(binned.matrix()[[0, 0]]);
        assert!(binned.matrix()[[0, 2]]);
        assert!(binned.matrix()[[1, 1]]);
        assert!(binned.matrix()[[1, 4]]);
        assert_eq!(binned.num_events(), 4);
    }

    #[test]
    fn test_binning_rejects_bad_input() {
        let a = SpikeTrain::new(vec![1.0], 0.0, 10.0).unwrap();
        let b = SpikeTrain::new(vec![1.0], 0.0, 12.0).unwrap();

        assert!(matches!(
            BinnedSpikeTrains::new(&[a.clone()], 0.0),
            Err(DataError::InvalidBinSize(_))
        ));
        assert!(matches!(
            BinnedSpikeTrains::new(&[a, b], 1.0),
            Err(DataError::MismatchedBounds { .. })
        ));
    }
}
