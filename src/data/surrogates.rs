//! Surrogate spike trains for the null model.

use super::{DataError, SpikeTrain};
use rand::{Rng, RngCore};

/// Produces a randomized copy of a spike train with the same spike count.
///
/// Implementations must be deterministic given the RNG state so that
/// surrogate draws can be reproduced from a seed.
pub trait Surrogate: Send + Sync {
    /// Generate one surrogate of `train`
    fn generate(&self, train: &SpikeTrain, rng: &mut dyn RngCore) -> SpikeTrain;
}

/// Uniform spike time dithering.
///
/// Each spike at time `t` is displaced uniformly within `[t - dither,
/// t + dither)`. Displacements leaving the observation interval are
/// reflected back at the boundary, so the spike count is preserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformDither {
    dither: f64,
}

impl UniformDither {
    /// Create a dithering surrogate with the given half-width (ms)
    pub fn new(dither: f64) -> Result<Self, DataError> {
        if !(dither > 0.0) || !dither.is_finite() {
            return Err(DataError::InvalidDither(dither));
        }
        Ok(Self { dither })
    }

    /// Half-width of the dithering interval
    pub fn dither(&self) -> f64 {
        self.dither
    }
}

impl Surrogate for UniformDither {
    fn generate(&self, train: &SpikeTrain, rng: &mut dyn RngCore) -> SpikeTrain {
        let mut times: Vec<f64> = train
            .times
            .iter()
            .map(|&t| {
                let shifted = t + rng.gen_range(-self.dither..self.dither);
                reflect_into(shifted, train.t_start, train.t_stop)
            })
            .collect();
        times.sort_by(|a, b| a.total_cmp(b));

        SpikeTrain {
            times,
            t_start: train.t_start,
            t_stop: train.t_stop,
        }
    }
}

/// Fold `x` back into `[lo, hi]` by mirroring at the boundaries
fn reflect_into(x: f64, lo: f64, hi: f64) -> f64 {
    if x >= lo && x <= hi {
        return x;
    }
    let width = hi - lo;
    let period = 2.0 * width;
    let mut y = (x - lo).rem_euclid(period);
    if y > width {
        y = period - y;
    }
    lo + y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_dither_preserves_count_and_bounds() {
        let train = SpikeTrain::new(vec![0.5, 10.0, 50.0, 99.5], 0.0, 100.0).unwrap();
        let dither = UniformDither::new(15.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let surrogate = dither.generate(&train, &mut rng);
            assert_eq!(surrogate.len(), train.len());
            assert!(surrogate.times.iter().all(|&t| (0.0..=100.0).contains(&t)));
            assert!(surrogate.times.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_dither_is_seed_deterministic() {
        let train = SpikeTrain::new(vec![20.0, 40.0, 60.0], 0.0, 100.0).unwrap();
        let dither = UniformDither::new(5.0).unwrap();

        let a = dither.generate(&train, &mut StdRng::seed_from_u64(3));
        let b = dither.generate(&train, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_reflect_into() {
        assert_relative_eq!(reflect_into(-2.0, 0.0, 10.0), 2.0);
        assert_relative_eq!(reflect_into(13.0, 0.0, 10.0), 7.0);
        assert_relative_eq!(reflect_into(5.0, 0.0, 10.0), 5.0);
        assert!(UniformDither::new(0.0).is_err());
    }
}
