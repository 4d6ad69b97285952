//! Configuration handling.

use crate::analysis::OutputFormat;
use crate::mining::{EngineKind, SpectrumKind};
use crate::reduction::ReductionParams;
use crate::significance::Correction;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Full analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpadeConfig {
    /// Binning and mining configuration
    pub mining: MiningConfig,
    /// Surrogate generation configuration
    pub surrogates: SurrogateConfig,
    /// Significance testing configuration
    pub significance: SignificanceConfig,
    /// Stability estimation configuration
    pub stability: StabilityConfig,
    /// Pattern set reduction, skipped when absent
    pub reduction: Option<ReductionParams>,
    /// Shape of the reported patterns
    pub output_format: OutputFormat,
    /// Base seed of every random draw
    pub seed: u64,
    /// Worker threads for surrogates and stability, all CPUs when absent
    pub workers: Option<usize>,
}

/// Binning and mining configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Bin width in ms
    pub bin_size: f64,
    /// Window length in bins
    pub win_len: usize,
    /// Minimum number of spikes per pattern
    pub min_spikes: usize,
    /// Minimum number of occurrences
    pub min_occ: usize,
    /// Maximum number of spikes per pattern
    pub max_spikes: Option<usize>,
    /// Maximum number of occurrences
    pub max_occ: Option<usize>,
    /// Minimum number of distinct streams per pattern
    pub min_neu: usize,
    /// Closed pattern engine
    pub engine: EngineKind,
    /// Keep windows whose first bin is empty
    pub all_windows: bool,
}

/// Surrogate generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrogateConfig {
    /// Number of surrogate draws, 0 disables significance testing
    pub n_surr: usize,
    /// Maximum dither displacement in ms
    pub dither: f64,
}

/// Significance testing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceConfig {
    /// Significance level, 1.0 disables testing
    pub alpha: f64,
    /// Multiple testing correction
    pub correction: Correction,
    /// Signature scheme
    pub spectrum: SpectrumKind,
}

/// Stability estimation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Subsets sampled per concept
    pub n_subsets: usize,
    /// Probability bound used to derive `n_subsets`
    pub delta: f64,
    /// Error bound used to derive `n_subsets`
    pub epsilon: f64,
    /// Keep concepts with intensional > thr[0] or extensional > thr[1]
    pub threshold: Option<[f64; 2]>,
}

impl StabilityConfig {
    /// Whether stability is computed at all
    pub fn enabled(&self) -> bool {
        self.n_subsets > 0 || self.delta + self.epsilon > 0.0
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            bin_size: 3.0,
            win_len: 10,
            min_spikes: 2,
            min_occ: 2,
            max_spikes: None,
            max_occ: None,
            min_neu: 1,
            engine: EngineKind::default(),
            all_windows: false,
        }
    }
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self {
            n_surr: 0,
            dither: 15.0,
        }
    }
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            correction: Correction::Fdr,
            spectrum: SpectrumKind::TwoD,
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            n_subsets: 0,
            delta: 0.0,
            epsilon: 0.0,
            threshold: None,
        }
    }
}

impl Default for SpadeConfig {
    fn default() -> Self {
        Self {
            mining: MiningConfig::default(),
            surrogates: SurrogateConfig::default(),
            significance: SignificanceConfig::default(),
            stability: StabilityConfig::default(),
            reduction: None,
            output_format: OutputFormat::default(),
            seed: 42,
            workers: None,
        }
    }
}

/// Read `{prefix}_{name}` and parse it, ignoring unset or malformed values
fn env_value<T: FromStr>(prefix: &str, name: &str) -> Option<T> {
    std::env::var(format!("{}_{}", prefix, name))
        .ok()
        .and_then(|v| v.trim().parse().ok())
}

impl SpadeConfig {
    /// Create new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SpadeConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from environment variables (with prefix), e.g. `SPADE_WIN_LEN`
    pub fn from_env(prefix: &str) -> Self {
        let mut config = Self::default();

        if let Some(v) = env_value(prefix, "BIN_SIZE") {
            config.mining.bin_size = v;
        }
        if let Some(v) = env_value(prefix, "WIN_LEN") {
            config.mining.win_len = v;
        }
        if let Some(v) = env_value(prefix, "MIN_SPIKES") {
            config.mining.min_spikes = v;
        }
        if let Some(v) = env_value(prefix, "MIN_OCC") {
            config.mining.min_occ = v;
        }
        if let Some(v) = env_value(prefix, "MIN_NEU") {
            config.mining.min_neu = v;
        }
        if let Some(v) = env_value(prefix, "ENGINE") {
            config.mining.engine = v;
        }
        if let Some(v) = env_value(prefix, "N_SURR") {
            config.surrogates.n_surr = v;
        }
        if let Some(v) = env_value(prefix, "DITHER") {
            config.surrogates.dither = v;
        }
        if let Some(v) = env_value(prefix, "ALPHA") {
            config.significance.alpha = v;
        }
        if let Some(v) = env_value(prefix, "CORRECTION") {
            config.significance.correction = v;
        }
        if let Some(v) = env_value(prefix, "SPECTRUM") {
            config.significance.spectrum = v;
        }
        if let Some(v) = env_value(prefix, "SEED") {
            config.seed = v;
        }
        if let Some(v) = env_value(prefix, "WORKERS") {
            config.workers = Some(v);
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.mining;
        if !(m.bin_size > 0.0) || !m.bin_size.is_finite() {
            return Err(ConfigError::Validation(format!(
                "bin_size must be a positive number of ms, got {}",
                m.bin_size
            )));
        }
        if m.win_len < 1 {
            return Err(ConfigError::Validation(
                "win_len must be at least 1 bin".to_string(),
            ));
        }
        if m.min_neu < 1 {
            return Err(ConfigError::Validation(
                "min_neu must be an integer >= 1".to_string(),
            ));
        }
        if m.min_spikes < 1 || m.min_occ < 1 {
            return Err(ConfigError::Validation(
                "min_spikes and min_occ must be at least 1".to_string(),
            ));
        }

        let alpha = self.significance.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        if self.surrogates.n_surr > 0 && !(self.surrogates.dither > 0.0) {
            return Err(ConfigError::Validation(format!(
                "dither must be positive, got {}",
                self.surrogates.dither
            )));
        }

        let s = &self.stability;
        if s.n_subsets == 0 && (s.delta > 0.0 || s.epsilon > 0.0) {
            if !(s.delta > 0.0 && s.delta < 1.0) || !(s.epsilon > 0.0) {
                return Err(ConfigError::Validation(
                    "stability needs 0 < delta < 1 and epsilon > 0 when n_subsets is 0"
                        .to_string(),
                ));
            }
        }
        if s.delta < 0.0 || s.epsilon < 0.0 {
            return Err(ConfigError::Validation(
                "stability delta and epsilon must not be negative".to_string(),
            ));
        }

        if self.workers == Some(0) {
            return Err(ConfigError::Validation(
                "workers must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}
