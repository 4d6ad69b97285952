//! Null-model sampling over surrogate data.

use super::{PValueEntry, PValueSpectrum, SignificanceError};
use crate::data::{BinnedSpikeTrains, SpikeTrain, Surrogate};
use crate::mining::{ConceptMiner, MiningStats, PatternSpectrum, ReportMode, Signature, SpectrumKind};
use crate::utils::fan_out;
use ndarray::{s, stack, Array2, Array3, ArrayView2, Axis};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

/// Maximum support observed per draw, pattern size and duration.
///
/// Shape `[draws, sizes, durations]`; sizes run from `min_spikes`, the
/// duration axis has a single entry under the 2-D scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxSupportDistribution {
    kind: SpectrumKind,
    min_spikes: usize,
    min_occ: usize,
    table: Array3<u32>,
}

impl MaxSupportDistribution {
    pub fn new(kind: SpectrumKind, min_spikes: usize, min_occ: usize, table: Array3<u32>) -> Self {
        Self {
            kind,
            min_spikes,
            min_occ,
            table,
        }
    }

    pub fn table(&self) -> &Array3<u32> {
        &self.table
    }

    pub fn kind(&self) -> SpectrumKind {
        self.kind
    }

    pub fn num_draws(&self) -> usize {
        self.table.len_of(Axis(0))
    }

    /// Turn the maxima into p-values.
    ///
    /// For every (size, duration) cell the maxima are counted into a
    /// histogram; its reverse cumulative sum over `N` draws gives, for each
    /// support `c` from `min_occ` up to the largest maximum, the fraction
    /// of draws whose maximum reached `c`.
    pub fn pvalue_spectrum(&self) -> PValueSpectrum {
        let (draws, sizes, durations) = self.table.dim();
        let mut entries = Vec::new();
        if draws == 0 {
            return PValueSpectrum::new(self.kind, entries);
        }

        for z in 0..sizes {
            for d in 0..durations {
                let column = self.table.slice(s![.., z, d]);
                let max = column.iter().copied().max().unwrap_or(0) as usize;
                if max < self.min_occ {
                    continue;
                }
                let mut histogram = vec![0usize; max + 1];
                for &m in column.iter() {
                    histogram[m as usize] += 1;
                }

                let size = z + self.min_spikes;
                let mut reached = 0usize;
                let mut cell = Vec::with_capacity(max + 1 - self.min_occ);
                for support in (self.min_occ..=max).rev() {
                    reached += histogram[support];
                    let signature = match self.kind {
                        SpectrumKind::TwoD => Signature::two_d(size, support),
                        SpectrumKind::ThreeD => Signature::three_d(size, support, d),
                    };
                    cell.push(PValueEntry {
                        signature,
                        pvalue: reached as f64 / draws as f64,
                    });
                }
                entries.extend(cell.into_iter().rev());
            }
        }
        PValueSpectrum::new(self.kind, entries)
    }
}

/// Per-size (and per-duration) maximum support of one pattern spectrum,
/// made non-increasing in the pattern size
fn max_support_table(
    spectrum: &PatternSpectrum,
    min_spikes: usize,
    max_spikes: usize,
    durations: usize,
) -> Array2<u32> {
    let sizes = (max_spikes + 1).saturating_sub(min_spikes);
    let mut table = Array2::<u32>::zeros((sizes, durations));
    for (signature, _) in spectrum.iter() {
        if signature.size < min_spikes || signature.size > max_spikes {
            continue;
        }
        let z = signature.size - min_spikes;
        let d = signature.duration.unwrap_or(0).min(durations.saturating_sub(1));
        let support = u32::try_from(signature.support).unwrap_or(u32::MAX);
        if support > table[[z, d]] {
            table[[z, d]] = support;
        }
    }

    // A support reached by a larger pattern is reached by its sub-patterns
    for z in (0..sizes.saturating_sub(1)).rev() {
        for d in 0..durations {
            let above = table[[z + 1, d]];
            if above > table[[z, d]] {
                table[[z, d]] = above;
            }
        }
    }
    table
}

/// Samples the null distribution of maximum supports from surrogate data.
///
/// # Example
///
/// ```rust,no_run
/// use spade_mining::data::{PoissonGenerator, UniformDither};
/// use spade_mining::mining::ConceptMiner;
/// use spade_mining::significance::NullModelSampler;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let trains = PoissonGenerator::new(10.0, 0.0, 1000.0)
///     .unwrap()
///     .generate_many(10, &mut rng);
///
/// let sampler = NullModelSampler::new(ConceptMiner::new(2), UniformDither::new(15.0).unwrap(), 5.0)
///     .n_surr(50)
///     .seed(3);
/// let (distribution, _stats) = sampler.sample(&trains).unwrap();
/// let pvalues = distribution.pvalue_spectrum();
/// println!("{} signatures tested", pvalues.len());
/// ```
#[derive(Debug, Clone)]
pub struct NullModelSampler<S: Surrogate> {
    miner: ConceptMiner,
    surrogate: S,
    bin_size: f64,
    n_surr: usize,
    kind: SpectrumKind,
    seed: u64,
    workers: Option<usize>,
}

impl<S: Surrogate> NullModelSampler<S> {
    /// Create a sampler mining surrogates with `miner` after binning at
    /// `bin_size` ms
    pub fn new(miner: ConceptMiner, surrogate: S, bin_size: f64) -> Self {
        Self {
            miner,
            surrogate,
            bin_size,
            n_surr: 100,
            kind: SpectrumKind::TwoD,
            seed: 0,
            workers: None,
        }
    }

    /// Number of surrogate draws
    pub fn n_surr(mut self, n_surr: usize) -> Self {
        self.n_surr = n_surr;
        self
    }

    /// Signature scheme
    pub fn spectrum(mut self, kind: SpectrumKind) -> Self {
        self.kind = kind;
        self
    }

    /// Base seed; draw `i` uses `seed + i`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Worker threads, all CPUs when `None`
    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// One surrogate draw: dither, bin, mine the spectrum and reduce it to
    /// the maximum support table
    fn draw(
        &self,
        index: usize,
        data: &[SpikeTrain],
        max_spikes: usize,
    ) -> Result<(Array2<u32>, MiningStats), SignificanceError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(index as u64));
        let surrogates: Vec<SpikeTrain> = data
            .iter()
            .map(|train| self.surrogate.generate(train, &mut rng))
            .collect();
        let binned = BinnedSpikeTrains::new(&surrogates, self.bin_size)?;
        let run = self.miner.mine(binned.matrix(), ReportMode::Spectrum(self.kind))?;

        let durations = match self.kind {
            SpectrumKind::TwoD => 1,
            SpectrumKind::ThreeD => self.miner.win_len(),
        };
        let spectrum = run.output.spectrum().cloned().unwrap_or_default();
        let table = max_support_table(
            &spectrum,
            self.miner.min_spikes_value(),
            max_spikes,
            durations,
        );
        debug!(draw = index, signatures = spectrum.len(), "surrogate draw mined");
        Ok((table, run.stats))
    }

    /// Run all draws and collect the maximum supports
    pub fn sample(
        &self,
        data: &[SpikeTrain],
    ) -> Result<(MaxSupportDistribution, MiningStats), SignificanceError> {
        if self.n_surr == 0 {
            return Err(SignificanceError::NoSurrogates);
        }
        self.miner.validate()?;
        let max_spikes = self.miner.max_spikes_for(data.len());

        let draws = fan_out((0..self.n_surr).collect(), self.workers, |_, index| {
            self.draw(index, data, max_spikes)
        })?;
        let draws: Vec<(Array2<u32>, MiningStats)> = draws.into_iter().collect::<Result<_, _>>()?;

        let stats: MiningStats = draws.iter().map(|(_, s)| *s).sum();
        let views: Vec<ArrayView2<u32>> = draws.iter().map(|(t, _)| t.view()).collect();
        let table = stack(Axis(0), &views)?;

        info!(
            draws = self.n_surr,
            mean_run_ms = stats.mean_per_run().as_secs_f64() * 1e3,
            "surrogate sampling finished"
        );

        Ok((
            MaxSupportDistribution::new(
                self.kind,
                self.miner.min_spikes_value(),
                self.miner.min_occ_value(),
                table,
            ),
            stats,
        ))
    }

    /// Sample and convert straight to the p-value spectrum
    pub fn pvalue_spectrum(
        &self,
        data: &[SpikeTrain],
    ) -> Result<(PValueSpectrum, MiningStats), SignificanceError> {
        let (distribution, stats) = self.sample(data)?;
        Ok((distribution.pvalue_spectrum(), stats))
    }
}
