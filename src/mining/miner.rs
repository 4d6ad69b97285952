//! Concept miner: context building, closed pattern mining and moving-window
//! filtering in one call.

use super::{
    filter_moving_window_subsets, Bounds, Concept, EngineKind, MiningError, PatternSpectrum,
    SpectrumKind,
};
use crate::context::{Context, ContextBuilder};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::debug;

/// What a mining run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Every concept with its extent
    #[default]
    All,
    /// Only the number of patterns per signature
    Spectrum(SpectrumKind),
}

impl FromStr for ReportMode {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(ReportMode::All),
            "#" => Ok(ReportMode::Spectrum(SpectrumKind::TwoD)),
            "3d#" => Ok(ReportMode::Spectrum(SpectrumKind::ThreeD)),
            other => Err(MiningError::InvalidReportMode(other.to_string())),
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::All => f.write_str("a"),
            ReportMode::Spectrum(kind) => write!(f, "{}", kind),
        }
    }
}

/// Timing of mining invocations.
///
/// Stats of several invocations are merged with `+=` or by summing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MiningStats {
    /// Number of mining invocations
    pub runs: usize,
    /// Context building
    pub preprocessing: Duration,
    /// Closed pattern enumeration
    pub mining: Duration,
    /// Moving-window filtering and reporting
    pub postprocessing: Duration,
}

impl MiningStats {
    /// Total time over all stages
    pub fn total(&self) -> Duration {
        self.preprocessing + self.mining + self.postprocessing
    }

    /// Mean time per invocation, zero when nothing ran
    pub fn mean_per_run(&self) -> Duration {
        match u32::try_from(self.runs) {
            Ok(runs) if runs > 0 => self.total() / runs,
            _ => Duration::ZERO,
        }
    }
}

impl AddAssign for MiningStats {
    fn add_assign(&mut self, other: Self) {
        self.runs += other.runs;
        self.preprocessing += other.preprocessing;
        self.mining += other.mining;
        self.postprocessing += other.postprocessing;
    }
}

impl Sum for MiningStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}

/// Result of a mining run in the requested report mode
#[derive(Debug, Clone, PartialEq)]
pub enum MiningOutput {
    Concepts(Vec<Concept>),
    Spectrum(PatternSpectrum),
}

impl MiningOutput {
    /// Mined concepts, empty in spectrum mode
    pub fn concepts(&self) -> &[Concept] {
        match self {
            MiningOutput::Concepts(c) => c,
            MiningOutput::Spectrum(_) => &[],
        }
    }

    pub fn into_concepts(self) -> Vec<Concept> {
        match self {
            MiningOutput::Concepts(c) => c,
            MiningOutput::Spectrum(_) => Vec::new(),
        }
    }

    pub fn spectrum(&self) -> Option<&PatternSpectrum> {
        match self {
            MiningOutput::Spectrum(s) => Some(s),
            MiningOutput::Concepts(_) => None,
        }
    }
}

/// Everything a mining run produces
#[derive(Debug, Clone)]
pub struct MiningRun {
    pub output: MiningOutput,
    /// Context the patterns were mined from
    pub context: Context,
    pub stats: MiningStats,
}

/// Closed spike pattern miner.
///
/// # Example
///
/// ```rust
/// use spade_mining::mining::{ConceptMiner, ReportMode};
/// use ndarray::Array2;
///
/// let mut binned = Array2::from_elem((2, 20), false);
/// for &b in &[1, 8, 15] {
///     binned[[0, b]] = true;
///     binned[[1, b + 1]] = true;
/// }
///
/// let run = ConceptMiner::new(2)
///     .min_spikes(2)
///     .min_occ(3)
///     .mine(&binned, ReportMode::All)
///     .unwrap();
///
/// assert_eq!(run.output.concepts().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ConceptMiner {
    win_len: usize,
    min_spikes: usize,
    min_occ: usize,
    max_spikes: Option<usize>,
    max_occ: Option<usize>,
    min_neu: usize,
    engine: EngineKind,
    all_windows: bool,
}

impl ConceptMiner {
    /// Create a miner for windows of `win_len` bins
    pub fn new(win_len: usize) -> Self {
        Self {
            win_len,
            min_spikes: 2,
            min_occ: 2,
            max_spikes: None,
            max_occ: None,
            min_neu: 1,
            engine: EngineKind::default(),
            all_windows: false,
        }
    }

    /// Minimum number of spikes per pattern
    pub fn min_spikes(mut self, min_spikes: usize) -> Self {
        self.min_spikes = min_spikes;
        self
    }

    /// Minimum number of occurrences
    pub fn min_occ(mut self, min_occ: usize) -> Self {
        self.min_occ = min_occ;
        self
    }

    /// Maximum number of spikes per pattern
    pub fn max_spikes(mut self, max_spikes: Option<usize>) -> Self {
        self.max_spikes = max_spikes;
        self
    }

    /// Maximum number of occurrences
    pub fn max_occ(mut self, max_occ: Option<usize>) -> Self {
        self.max_occ = max_occ;
        self
    }

    /// Minimum number of distinct streams per pattern
    pub fn min_neu(mut self, min_neu: usize) -> Self {
        self.min_neu = min_neu;
        self
    }

    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Retain every window position in the context
    pub fn all_windows(mut self, all: bool) -> Self {
        self.all_windows = all;
        self
    }

    pub fn win_len(&self) -> usize {
        self.win_len
    }

    pub fn min_occ_value(&self) -> usize {
        self.min_occ
    }

    pub fn min_spikes_value(&self) -> usize {
        self.min_spikes
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.engine
    }

    /// Largest admitted pattern size for data with `num_streams` streams
    pub fn max_spikes_for(&self, num_streams: usize) -> usize {
        self.max_spikes.unwrap_or(num_streams * self.win_len)
    }

    /// Check parameters
    pub fn validate(&self) -> Result<(), MiningError> {
        if self.min_neu < 1 {
            return Err(MiningError::InvalidMinStreams(self.min_neu));
        }
        if self.min_spikes < 1 {
            return Err(MiningError::InvalidBounds(format!(
                "min_spikes must be >= 1, got {}",
                self.min_spikes
            )));
        }
        if self.min_occ < 1 {
            return Err(MiningError::InvalidBounds(format!(
                "min_occ must be >= 1, got {}",
                self.min_occ
            )));
        }
        Ok(())
    }

    /// Resolve the bounds for a context, filling in the defaults
    pub fn bounds(&self, context: &Context) -> Bounds {
        Bounds {
            min_spikes: self.min_spikes,
            max_spikes: self.max_spikes.unwrap_or(context.num_attributes()),
            min_occ: self.min_occ,
            max_occ: self.max_occ.unwrap_or(context.num_nonempty_windows()),
            min_neu: self.min_neu,
        }
    }

    /// Mine a boolean stream x bin matrix.
    ///
    /// Concepts are returned sorted by (intent, extent).
    pub fn mine(&self, binned: &Array2<bool>, report: ReportMode) -> Result<MiningRun, MiningError> {
        self.validate()?;
        let mut stats = MiningStats {
            runs: 1,
            ..MiningStats::default()
        };

        let start = Instant::now();
        let context = ContextBuilder::new(self.win_len)
            .all_windows(self.all_windows)
            .build(binned)?;
        let bounds = self.bounds(&context);
        stats.preprocessing = start.elapsed();

        let engine = self.engine.engine();
        let output = match report {
            ReportMode::All => {
                let start = Instant::now();
                let concepts = engine.mine(&context, &bounds);
                stats.mining = start.elapsed();

                let start = Instant::now();
                let mut concepts = filter_moving_window_subsets(&concepts, self.win_len);
                concepts.sort();
                stats.postprocessing = start.elapsed();
                MiningOutput::Concepts(concepts)
            }
            ReportMode::Spectrum(kind) => {
                let start = Instant::now();
                let sets = engine.mine_closed_sets(&context, &bounds);
                stats.mining = start.elapsed();

                let start = Instant::now();
                let sets = filter_moving_window_subsets(&sets, self.win_len);
                let spectrum = PatternSpectrum::from_itemsets(&sets, kind, self.win_len);
                stats.postprocessing = start.elapsed();
                MiningOutput::Spectrum(spectrum)
            }
        };

        debug!(
            engine = engine.name(),
            report = %report,
            windows = context.num_windows(),
            "mining run finished"
        );

        Ok(MiningRun {
            output,
            context,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::Signature;

    fn motif_matrix() -> Array2<bool> {
        // stream0@b, stream1@b+1, stream2@b+2 at b = 10, 20, 30
        let mut m = Array2::from_elem((3, 40), false);
        for &b in &[10, 20, 30] {
            m[[0, b]] = true;
            m[[1, b + 1]] = true;
            m[[2, b + 2]] = true;
        }
        m
    }

    #[test]
    fn test_mines_single_motif() {
        let run = ConceptMiner::new(3)
            .min_spikes(3)
            .min_occ(3)
            .mine(&motif_matrix(), ReportMode::All)
            .unwrap();
        assert_eq!(
            run.output.concepts(),
            &[Concept::new(vec![0, 4, 8], vec![10, 20, 30])]
        );
        assert_eq!(run.stats.runs, 1);
    }

    #[test]
    fn test_truncated_copies_removed() {
        let run = ConceptMiner::new(3)
            .mine(&motif_matrix(), ReportMode::All)
            .unwrap();
        // the tail windows (stream1, stream2) and (stream2) repeat with the
        // same support and must not be reported
        assert_eq!(run.output.concepts().len(), 1);
    }

    #[test]
    fn test_spectrum_mode() {
        let run = ConceptMiner::new(3)
            .mine(&motif_matrix(), ReportMode::Spectrum(SpectrumKind::ThreeD))
            .unwrap();
        let spectrum = run.output.spectrum().unwrap();
        assert_eq!(spectrum.count(&Signature::three_d(3, 3, 2)), 1);
        assert_eq!(spectrum.total(), 1);
    }

    #[test]
    fn test_engines_agree() {
        let m = motif_matrix();
        let a = ConceptMiner::new(3)
            .min_spikes(1)
            .min_occ(1)
            .mine(&m, ReportMode::All)
            .unwrap();
        let b = ConceptMiner::new(3)
            .min_spikes(1)
            .min_occ(1)
            .engine(EngineKind::FormalConcepts)
            .mine(&m, ReportMode::All)
            .unwrap();
        assert_eq!(a.output, b.output);
    }

    #[test]
    fn test_invalid_parameters() {
        let m = motif_matrix();
        assert_eq!(
            ConceptMiner::new(3).min_neu(0).mine(&m, ReportMode::All).unwrap_err(),
            MiningError::InvalidMinStreams(0)
        );
        assert!(matches!(
            ConceptMiner::new(3).min_occ(0).validate(),
            Err(MiningError::InvalidBounds(_))
        ));
        assert!(matches!("b".parse::<ReportMode>(), Err(MiningError::InvalidReportMode(_))));
        assert!(matches!(
            ConceptMiner::new(0).mine(&m, ReportMode::All),
            Err(MiningError::Context(_))
        ));
    }

    #[test]
    fn test_stats_merge() {
        let a = MiningStats {
            runs: 1,
            mining: Duration::from_millis(4),
            ..Default::default()
        };
        let total: MiningStats = vec![a, a].into_iter().sum();
        assert_eq!(total.runs, 2);
        assert_eq!(total.mining, Duration::from_millis(8));
        assert_eq!(total.mean_per_run(), Duration::from_millis(4));
    }
}
