//! Stability estimation by subset sampling.

use super::{Stability, StabilityError};
use crate::context::RelationMatrix;
use crate::mining::{AnnotatedConcept, Concept};
use crate::utils::fan_out;
use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use std::collections::HashSet;
use tracing::info;

/// Consecutive duplicate draws tolerated before the remaining subsets are
/// enumerated instead
const MAX_RETRIES: usize = 64;

/// Estimates concept stability.
///
/// When the requested number of subsets exceeds the power set of a side,
/// that side is enumerated exactly; otherwise distinct non-empty subsets
/// are drawn at random.
#[derive(Debug, Clone)]
pub struct StabilityEstimator {
    n_subsets: usize,
    delta: f64,
    epsilon: f64,
    seed: u64,
    workers: Option<usize>,
}

impl StabilityEstimator {
    /// Estimator drawing `n_subsets` subsets per concept side
    pub fn new(n_subsets: usize) -> Self {
        Self {
            n_subsets,
            delta: 0.0,
            epsilon: 0.0,
            seed: 0,
            workers: None,
        }
    }

    /// Derive the subset count from an (epsilon, delta) accuracy bound,
    /// used when `n_subsets` is 0
    pub fn accuracy(mut self, delta: f64, epsilon: f64) -> Self {
        self.delta = delta;
        self.epsilon = epsilon;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Number of subsets drawn per side: `n_subsets`, or
    /// `ln(2 / delta) / (2 epsilon^2) + 1` when it is 0
    pub fn num_samples(&self) -> Result<usize, StabilityError> {
        if self.n_subsets > 0 {
            return Ok(self.n_subsets);
        }
        if self.delta + self.epsilon <= 0.0 {
            return Err(StabilityError::InvalidSubsetCount);
        }
        if !(self.delta > 0.0 && self.delta < 1.0) || !(self.epsilon > 0.0) {
            return Err(StabilityError::InvalidBounds {
                delta: self.delta,
                epsilon: self.epsilon,
            });
        }
        let n = (2.0 / self.delta).ln() / (2.0 * self.epsilon * self.epsilon) + 1.0;
        Ok(n.ceil() as usize)
    }

    /// Annotate every concept with its stability, in input order
    pub fn estimate(
        &self,
        concepts: &[Concept],
        relation: &RelationMatrix,
    ) -> Result<Vec<AnnotatedConcept>, StabilityError> {
        let samples = self.num_samples()?;
        if concepts.is_empty() {
            return Ok(Vec::new());
        }

        let units: Vec<&Concept> = concepts.iter().collect();
        let annotated = fan_out(units, self.workers, |idx, concept| {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(idx as u64));
            let stability = concept_stability(concept, relation, samples, &mut rng);
            AnnotatedConcept::new(concept.clone(), Some(stability))
        })?;

        info!(
            concepts = annotated.len(),
            samples,
            "stability estimated"
        );
        Ok(annotated)
    }
}

/// Stability of a single concept
pub(crate) fn concept_stability<R: Rng + ?Sized>(
    concept: &Concept,
    relation: &RelationMatrix,
    samples: usize,
    rng: &mut R,
) -> Stability {
    let intensional = side_stability(&concept.intent, samples, rng, |subset| {
        relation.extent_of(subset) == concept.extent
    });
    let extensional = side_stability(&concept.extent, samples, rng, |subset| {
        relation.intent_of(subset) == concept.intent
    });
    Stability {
        intensional,
        extensional,
    }
}

/// Fraction of subsets of `elements` whose closure reproduces the concept.
///
/// A subset contained in a subset that already failed fails as well: its
/// closure can only grow.
fn side_stability<R, F>(elements: &[usize], samples: usize, rng: &mut R, closes: F) -> f64
where
    R: Rng + ?Sized,
    F: Fn(&[usize]) -> bool,
{
    let n = elements.len();
    let exact = matches!(
        u32::try_from(n).ok().and_then(|n| 1usize.checked_shl(n)),
        Some(power) if samples > power
    );

    let (subsets, denominator) = if exact {
        let all: Vec<Vec<usize>> = (0..1u64 << n).map(|mask| mask_to_indices(mask, n)).collect();
        let denominator = all.len();
        (all, denominator)
    } else {
        let drawn = random_subsets(n, samples, rng);
        let denominator = drawn.len();
        (drawn, denominator)
    };
    if denominator == 0 {
        return 0.0;
    }

    let mut failed: Vec<Vec<usize>> = Vec::new();
    let mut hits = 0usize;
    for indices in subsets {
        if failed.iter().any(|f| is_sorted_subset(&indices, f)) {
            continue;
        }
        let subset: Vec<usize> = indices.iter().map(|&i| elements[i]).collect();
        if closes(&subset) {
            hits += 1;
        } else {
            failed.push(indices);
        }
    }
    hits as f64 / denominator as f64
}

fn mask_to_indices(mask: u64, n: usize) -> Vec<usize> {
    (0..n).filter(|&i| mask & (1u64 << i) != 0).collect()
}

fn is_sorted_subset(sub: &[usize], sup: &[usize]) -> bool {
    let mut it = sup.iter();
    sub.iter().all(|x| it.any(|y| y == x))
}

/// Up to `samples` distinct non-empty index subsets of `0..n`
fn random_subsets<R: Rng + ?Sized>(n: usize, samples: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let mut out = Vec::with_capacity(samples);
    if n == 0 {
        return out;
    }
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut retries = 0;
    while out.len() < samples {
        let size = rng.gen_range(1..=n);
        let mut subset = index::sample(rng, n, size).into_vec();
        subset.sort_unstable();
        if seen.insert(subset.clone()) {
            out.push(subset);
            retries = 0;
            continue;
        }
        retries += 1;
        if retries < MAX_RETRIES {
            continue;
        }
        // Collisions keep coming: take the remaining subsets in order
        if n < 64 {
            for mask in 1..(1u64 << n) {
                if out.len() >= samples {
                    break;
                }
                let subset = mask_to_indices(mask, n);
                if seen.insert(subset.clone()) {
                    out.push(subset);
                }
            }
        }
        break;
    }
    out
}

/// Keep concepts with `intensional > thresholds[0]` or
/// `extensional > thresholds[1]`; concepts without stability are kept
pub fn stability_filter(concepts: &[AnnotatedConcept], thresholds: [f64; 2]) -> Vec<AnnotatedConcept> {
    concepts
        .iter()
        .filter(|c| match c.stability {
            Some(s) => s.intensional > thresholds[0] || s.extensional > thresholds[1],
            None => true,
        })
        .cloned()
        .collect()
}
