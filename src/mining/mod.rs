//! Closed spike pattern mining.
//!
//! This module provides:
//! - Concept and signature representation
//! - Two interchangeable closed-pattern engines behind one strategy trait
//! - Moving-window duplicate filtering
//! - The concept miner tying context building, mining and filtering together

mod closed_itemsets;
mod concept;
mod dedup;
mod engine;
mod fca;
mod miner;
mod spectrum;

pub use closed_itemsets::ClosedItemsetEngine;
pub use concept::{AnnotatedConcept, ClosedSet, Concept, Itemset};
pub use dedup::{filter_moving_window_subsets, rereference_to_last_spike};
pub use engine::{Bounds, ClosedPatternEngine, EngineKind};
pub use fca::FormalConceptEngine;
pub use miner::{ConceptMiner, MiningOutput, MiningRun, MiningStats, ReportMode};
pub use spectrum::{PatternSpectrum, Signature, SpectrumKind};

use crate::context::ContextError;
use thiserror::Error;

/// Errors during mining
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiningError {
    #[error("min_neu must be an integer >= 1, got {0}")]
    InvalidMinStreams(usize),
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),
    #[error("Report mode must be one of 'a', '#' or '3d#', got '{0}'")]
    InvalidReportMode(String),
    #[error("Spectrum must be either '#' or '3d#', got '{0}'")]
    InvalidSpectrumKind(String),
    #[error("Unknown mining engine '{0}'")]
    InvalidEngine(String),
    #[error(transparent)]
    Context(#[from] ContextError),
}
