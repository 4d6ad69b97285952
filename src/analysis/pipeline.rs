//! The SPADE analysis pipeline.

use super::{concepts_to_patterns, AnalysisError, OutputFormat, PatternsOutput, SpadeOutput};
use crate::data::{check_common_bounds, BinnedSpikeTrains, SpikeTrain, Surrogate, UniformDither};
use crate::mining::{AnnotatedConcept, ConceptMiner, MiningStats, ReportMode, Signature};
use crate::reduction::{pattern_spectrum_filter, PatternSetReducer};
use crate::significance::{test_signature_significance, NullModelSampler, PValueSpectrum};
use crate::stability::{stability_filter, StabilityEstimator};
use crate::utils::SpadeConfig;
use std::collections::HashSet;
use tracing::{info, warn};

/// Full SPADE analysis: mining, significance, stability and reduction.
///
/// # Example
///
/// ```rust,no_run
/// use spade_mining::prelude::*;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let trains = PoissonGenerator::new(15.0, 0.0, 2000.0)
///     .unwrap()
///     .generate_many(30, &mut rng);
///
/// let mut config = SpadeConfig::default();
/// config.mining.bin_size = 5.0;
/// config.mining.win_len = 3;
/// config.surrogates.n_surr = 200;
/// config.significance.alpha = 0.05;
/// config.output_format = OutputFormat::Patterns;
///
/// let output = Spade::new(config).run(&trains).unwrap();
/// println!("{} significant patterns", output.patterns.len());
/// ```
#[derive(Debug, Clone)]
pub struct Spade {
    config: SpadeConfig,
}

impl Spade {
    pub fn new(config: SpadeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpadeConfig {
        &self.config
    }

    /// Concept miner configured from the mining section
    pub fn miner(&self) -> ConceptMiner {
        let m = &self.config.mining;
        ConceptMiner::new(m.win_len)
            .min_spikes(m.min_spikes)
            .min_occ(m.min_occ)
            .max_spikes(m.max_spikes)
            .max_occ(m.max_occ)
            .min_neu(m.min_neu)
            .engine(m.engine)
            .all_windows(m.all_windows)
    }

    /// Run the analysis with uniformly dithered surrogates
    pub fn run(&self, data: &[SpikeTrain]) -> Result<SpadeOutput, AnalysisError> {
        if self.config.surrogates.n_surr > 0 {
            let dither = UniformDither::new(self.config.surrogates.dither)?;
            self.execute(data, Some(dither))
        } else {
            self.execute::<UniformDither>(data, None)
        }
    }

    /// Run the analysis with a caller-provided surrogate method
    pub fn run_with_surrogate<S: Surrogate>(
        &self,
        data: &[SpikeTrain],
        surrogate: S,
    ) -> Result<SpadeOutput, AnalysisError> {
        self.execute(data, Some(surrogate))
    }

    fn execute<S: Surrogate>(
        &self,
        data: &[SpikeTrain],
        surrogate: Option<S>,
    ) -> Result<SpadeOutput, AnalysisError> {
        let config = &self.config;
        config.validate()?;
        let (t_start, _) = check_common_bounds(data)?;

        let win_len = config.mining.win_len;
        let bin_size = config.mining.bin_size;
        let kind = config.significance.spectrum;
        let alpha = config.significance.alpha;
        let miner = self.miner();
        let mut stats = MiningStats::default();

        // Null distribution
        let pvalue_spectrum: Option<PValueSpectrum> = match surrogate {
            Some(surrogate) if config.surrogates.n_surr > 0 => {
                let sampler = NullModelSampler::new(miner.clone(), surrogate, bin_size)
                    .n_surr(config.surrogates.n_surr)
                    .spectrum(kind)
                    .seed(config.seed)
                    .workers(config.workers);
                let (spectrum, surrogate_stats) = sampler.pvalue_spectrum(data)?;
                stats += surrogate_stats;
                Some(spectrum)
            }
            _ => {
                if alpha > 0.0 && alpha < 1.0 {
                    warn!(alpha, "no surrogates requested, significance level is ignored");
                }
                None
            }
        };

        // Candidates
        let binned = BinnedSpikeTrains::new(data, bin_size)?;
        let run = miner.mine(binned.matrix(), ReportMode::All)?;
        stats += run.stats;
        let mined = run.output.concepts().len();

        let mut concepts: Vec<AnnotatedConcept> = if config.stability.enabled() {
            let estimator = StabilityEstimator::new(config.stability.n_subsets)
                .accuracy(config.stability.delta, config.stability.epsilon)
                .seed(config.seed)
                .workers(config.workers);
            let annotated = estimator.estimate(run.output.concepts(), run.context.relation())?;
            match config.stability.threshold {
                Some(thresholds) => stability_filter(&annotated, thresholds),
                None => annotated,
            }
        } else {
            if config.stability.threshold.is_some() {
                warn!("stability threshold set but stability is not computed, ignoring it");
            }
            run.output
                .into_concepts()
                .into_iter()
                .map(AnnotatedConcept::from)
                .collect()
        };

        // Significance and reduction
        let non_significant: Option<Vec<Signature>> = match &pvalue_spectrum {
            Some(spectrum) => {
                let test = test_signature_significance(spectrum, alpha, config.significance.correction)?;
                let non_significant = test.non_significant();
                let excluded: HashSet<Signature> = non_significant.iter().copied().collect();

                concepts = pattern_spectrum_filter(&concepts, &excluded, kind, win_len);
                if let Some(params) = config.reduction {
                    concepts = PatternSetReducer::new(win_len)
                        .params(params)
                        .min_spikes(config.mining.min_spikes)
                        .min_occ(config.mining.min_occ)
                        .spectrum(kind)
                        .reduce(&concepts, &excluded);
                }
                Some(non_significant)
            }
            None => {
                if config.reduction.is_some() {
                    warn!("pattern set reduction needs surrogates, skipping it");
                }
                None
            }
        };

        info!(
            mined,
            retained = concepts.len(),
            runs = stats.runs,
            "SPADE analysis finished"
        );

        let patterns = match config.output_format {
            OutputFormat::Concepts => PatternsOutput::Concepts(concepts),
            OutputFormat::Patterns => PatternsOutput::Patterns(concepts_to_patterns(
                &concepts,
                win_len,
                bin_size,
                pvalue_spectrum.as_ref(),
                kind,
                t_start,
            )),
        };

        Ok(SpadeOutput {
            patterns,
            pvalue_spectrum,
            non_significant,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::Concept;

    /// Three streams repeating stream0 -> stream1 -> stream2 with 1 bin lags
    fn motif_trains() -> Vec<SpikeTrain> {
        let starts = [30.0, 130.0, 230.0, 330.0];
        (0..3)
            .map(|s| {
                let times = starts.iter().map(|t| t + 10.0 * s as f64 + 1.0).collect();
                SpikeTrain::new(times, 0.0, 500.0).unwrap()
            })
            .collect()
    }

    fn config() -> SpadeConfig {
        let mut config = SpadeConfig::default();
        config.mining.bin_size = 10.0;
        config.mining.win_len = 3;
        config.mining.min_spikes = 3;
        config
    }

    #[test]
    fn test_mining_only() {
        let output = Spade::new(config()).run(&motif_trains()).unwrap();
        match &output.patterns {
            PatternsOutput::Concepts(c) => {
                assert_eq!(c.len(), 1);
                assert_eq!(c[0].concept, Concept::new(vec![0, 4, 8], vec![3, 13, 23, 33]));
                assert!(c[0].stability.is_none());
            }
            other => panic!("unexpected output {:?}", other),
        }
        assert!(output.pvalue_spectrum.is_none());
        assert!(output.non_significant.is_none());
        assert_eq!(output.stats.runs, 1);
    }

    #[test]
    fn test_patterns_format_and_stability() {
        let mut config = config();
        config.output_format = OutputFormat::Patterns;
        config.stability.n_subsets = 1000;
        let output = Spade::new(config).run(&motif_trains()).unwrap();
        match &output.patterns {
            PatternsOutput::Patterns(p) => {
                assert_eq!(p[0].neurons, vec![0, 1, 2]);
                assert_eq!(p[0].lags, vec![0, 1, 2]);
                assert_eq!(p[0].times, vec![30.0, 130.0, 230.0, 330.0]);
                assert_eq!(p[0].pvalue, -1.0);
                assert!(p[0].stability.is_some());
            }
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_with_surrogates() {
        let mut config = config();
        config.surrogates.n_surr = 20;
        config.surrogates.dither = 20.0;
        config.significance.alpha = 0.05;
        let output = Spade::new(config).run(&motif_trains()).unwrap();
        assert!(output.pvalue_spectrum.is_some());
        assert!(output.non_significant.is_some());
        assert_eq!(output.stats.runs, 21);
    }

    #[test]
    fn test_rejects_mismatched_bounds() {
        let mut trains = motif_trains();
        trains.push(SpikeTrain::new(vec![1.0], 0.0, 400.0).unwrap());
        assert!(matches!(
            Spade::new(config()).run(&trains),
            Err(AnalysisError::Data(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = config();
        config.mining.min_neu = 0;
        assert!(matches!(
            Spade::new(config).run(&motif_trains()),
            Err(AnalysisError::Config(_))
        ));
    }
}
