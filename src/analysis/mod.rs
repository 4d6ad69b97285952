//! End-to-end SPADE analysis.
//!
//! This module provides:
//! - The analysis pipeline wiring mining, significance, stability and
//!   reduction
//! - Conversion of concepts into pattern records

mod patterns;
mod pipeline;

pub use patterns::{concepts_to_patterns, PatternRecord};
pub use pipeline::Spade;

use crate::data::DataError;
use crate::mining::{AnnotatedConcept, MiningError, MiningStats, Signature};
use crate::significance::{PValueSpectrum, SignificanceError};
use crate::stability::StabilityError;
use crate::utils::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors of a full analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input data: {0}")]
    Data(#[from] DataError),
    #[error("Mining failed: {0}")]
    Mining(#[from] MiningError),
    #[error("Significance testing failed: {0}")]
    Significance(#[from] SignificanceError),
    #[error("Stability estimation failed: {0}")]
    Stability(#[from] StabilityError),
    #[error("Output format must be either 'concepts' or 'patterns', got '{0}'")]
    InvalidOutputFormat(String),
}

/// Shape of the reported patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Annotated concepts as mined
    #[default]
    Concepts,
    /// Pattern records with neurons, lags, times and p-values
    Patterns,
}

impl FromStr for OutputFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concepts" => Ok(OutputFormat::Concepts),
            "patterns" => Ok(OutputFormat::Patterns),
            other => Err(AnalysisError::InvalidOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Concepts => f.write_str("concepts"),
            OutputFormat::Patterns => f.write_str("patterns"),
        }
    }
}

/// Retained patterns in the requested format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternsOutput {
    Concepts(Vec<AnnotatedConcept>),
    Patterns(Vec<PatternRecord>),
}

impl PatternsOutput {
    pub fn len(&self) -> usize {
        match self {
            PatternsOutput::Concepts(c) => c.len(),
            PatternsOutput::Patterns(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a full analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpadeOutput {
    pub patterns: PatternsOutput,
    /// Present when surrogates were drawn
    pub pvalue_spectrum: Option<PValueSpectrum>,
    /// Present when surrogates were drawn
    pub non_significant: Option<Vec<Signature>>,
    pub stats: MiningStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("patterns".parse::<OutputFormat>().unwrap(), OutputFormat::Patterns);
        assert!(matches!(
            "dict".parse::<OutputFormat>(),
            Err(AnalysisError::InvalidOutputFormat(_))
        ));
    }
}
