//! # SPADE: Spatio-temporal Pattern Detection
//!
//! A Rust library for mining repeated spatio-temporal spike patterns
//! across massively parallel spike trains and assessing their statistical
//! significance against surrogate data.
//!
//! ## Overview
//!
//! This library provides:
//! - Context construction from binned spike trains (sliding windows)
//! - Closed frequent pattern mining with two interchangeable engines
//! - Moving-window duplicate removal
//! - Surrogate-based p-value spectra and multiple-testing correction
//! - Pattern spectrum filtering and pattern set reduction
//! - Concept stability estimation
//!
//! ## Example
//!
//! ```rust,no_run
//! use spade_mining::{
//!     analysis::Spade,
//!     data::{PoissonGenerator, SpikeTrain},
//!     utils::SpadeConfig,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Generate independent spike trains
//!     let mut rng = StdRng::seed_from_u64(7);
//!     let generator = PoissonGenerator::new(10.0, 0.0, 1000.0)?;
//!     let trains: Vec<SpikeTrain> = generator.generate_many(20, &mut rng);
//!
//!     // Mine patterns and test them against 100 dithered surrogates
//!     let mut config = SpadeConfig::default();
//!     config.mining.bin_size = 5.0;
//!     config.mining.win_len = 4;
//!     config.surrogates.n_surr = 100;
//!     config.significance.alpha = 0.05;
//!
//!     let output = Spade::new(config).run(&trains)?;
//!     println!("{} patterns retained", output.patterns.len());
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod context;
pub mod data;
pub mod mining;
pub mod reduction;
pub mod significance;
pub mod stability;
pub mod utils;

// Re-export main types for convenience
pub use analysis::{PatternRecord, Spade, SpadeOutput};
pub use context::{Context, ContextBuilder};
pub use data::{BinnedSpikeTrains, SpikeTrain, Surrogate, UniformDither};
pub use mining::{Concept, ConceptMiner, EngineKind, Signature, SpectrumKind};
pub use reduction::PatternSetReducer;
pub use significance::{Correction, NullModelSampler, PValueSpectrum};
pub use stability::{Stability, StabilityEstimator};
pub use utils::SpadeConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{OutputFormat, PatternRecord, PatternsOutput, Spade, SpadeOutput};
    pub use crate::context::{Context, ContextBuilder};
    pub use crate::data::{BinnedSpikeTrains, PoissonGenerator, SpikeTrain, Surrogate, UniformDither};
    pub use crate::mining::{
        AnnotatedConcept, Concept, ConceptMiner, EngineKind, MiningStats, ReportMode, Signature,
        SpectrumKind,
    };
    pub use crate::reduction::{PatternSetReducer, ReductionParams};
    pub use crate::significance::{Correction, NullModelSampler, PValueSpectrum};
    pub use crate::stability::{Stability, StabilityEstimator};
    pub use crate::utils::SpadeConfig;
}
