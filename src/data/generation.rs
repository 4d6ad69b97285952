//! Homogeneous Poisson spike train generation.
//!
//! Used to build independent test data and demo inputs; the mining engine
//! never depends on it.

use super::{DataError, SpikeTrain};
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// Homogeneous Poisson process with an optional absolute refractory period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonGenerator {
    /// Firing rate (Hz)
    rate: f64,
    /// Refractory period (ms)
    refractory: f64,
    /// Start of the interval (ms)
    t_start: f64,
    /// End of the interval (ms)
    t_stop: f64,
}

impl PoissonGenerator {
    /// Create a generator firing at `rate` Hz within `[t_start, t_stop)` ms
    pub fn new(rate: f64, t_start: f64, t_stop: f64) -> Result<Self, DataError> {
        if !(rate > 0.0) || !rate.is_finite() {
            return Err(DataError::InvalidRate(rate));
        }
        if !(t_start < t_stop) {
            return Err(DataError::InvalidInterval { t_start, t_stop });
        }
        Ok(Self {
            rate,
            refractory: 0.0,
            t_start,
            t_stop,
        })
    }

    /// Set the refractory period (ms).
    ///
    /// The exponential part of each inter-spike interval is rescaled so the
    /// mean rate stays at `rate`.
    pub fn with_refractory(mut self, refractory: f64) -> Result<Self, DataError> {
        if refractory < 0.0 || self.rate * refractory / 1000.0 >= 1.0 {
            return Err(DataError::InvalidRefractoryPeriod {
                rate: self.rate,
                refractory,
            });
        }
        self.refractory = refractory;
        Ok(self)
    }

    /// Generate a single spike train
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SpikeTrain {
        let mean_isi = 1000.0 / self.rate;
        let exp_rate = 1.0 / (mean_isi - self.refractory);
        let mut times = Vec::new();

        // exp_rate is positive by construction
        if let Ok(isi) = Exp::new(exp_rate) {
            let mut t = self.t_start + isi.sample(rng);
            while t < self.t_stop {
                times.push(t);
                t += self.refractory + isi.sample(rng);
            }
        }

        SpikeTrain {
            times,
            t_start: self.t_start,
            t_stop: self.t_stop,
        }
    }

    /// Generate `n` independent spike trains sharing the same bounds
    pub fn generate_many<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<SpikeTrain> {
        (0..n).map(|_| self.generate(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_poisson_rate() {
        let mut rng = StdRng::seed_from_u64(1);
        let generator = PoissonGenerator::new(20.0, 0.0, 10_000.0).unwrap();
        let train = generator.generate(&mut rng);

        // 200 spikes expected, allow a generous margin
        assert!(train.len() > 140 && train.len() < 260, "got {}", train.len());
        assert!(train.times.iter().all(|&t| t >= 0.0 && t < 10_000.0));
    }

    #[test]
    fn test_refractory_period_respected() {
        let mut rng = StdRng::seed_from_u64(2);
        let generator = PoissonGenerator::new(40.0, 0.0, 5_000.0)
            .unwrap()
            .with_refractory(4.0)
            .unwrap();
        let train = generator.generate(&mut rng);

        assert!(train.times.windows(2).all(|w| w[1] - w[0] >= 4.0));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(PoissonGenerator::new(0.0, 0.0, 1.0).is_err());
        assert!(PoissonGenerator::new(10.0, 5.0, 1.0).is_err());
        assert!(PoissonGenerator::new(500.0, 0.0, 100.0)
            .unwrap()
            .with_refractory(2.0)
            .is_err());
    }
}
