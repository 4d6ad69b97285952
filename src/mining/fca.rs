//! Formal concept engine.
//!
//! Builds the closure system of the context directly: the set of concept
//! intents is the closure of the object intents under intersection.

use super::{Bounds, ClosedPatternEngine, Concept};
use crate::context::Context;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Formal concept miner working on the (window, attribute) pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct FormalConceptEngine;

/// Intersection of two sorted attribute lists
fn intersect(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Whether sorted `sub` is contained in sorted `sup`
fn is_subset(sub: &[usize], sup: &[usize]) -> bool {
    let mut it = sup.iter();
    sub.iter().all(|x| it.any(|y| y == x))
}

impl FormalConceptEngine {
    /// Group the incidence pairs into one attribute list per window
    fn objects(context: &Context) -> BTreeMap<usize, Vec<usize>> {
        let mut objects: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &(window, attribute) in context.pairs() {
            objects.entry(window).or_default().push(attribute);
        }
        for items in objects.values_mut() {
            items.sort_unstable();
        }
        objects
    }

    /// All intersections of object intents with at least `min_size`
    /// attributes
    fn intents(objects: &BTreeMap<usize, Vec<usize>>, min_size: usize) -> BTreeSet<Vec<usize>> {
        let distinct: BTreeSet<&Vec<usize>> = objects.values().collect();
        let mut intents: BTreeSet<Vec<usize>> = BTreeSet::new();
        for object in distinct {
            let mut added: Vec<Vec<usize>> = intents
                .iter()
                .map(|intent| intersect(intent, object))
                .filter(|x| !x.is_empty() && x.len() >= min_size)
                .collect();
            if !object.is_empty() && object.len() >= min_size {
                added.push(object.clone());
            }
            intents.extend(added);
        }
        intents
    }
}

impl ClosedPatternEngine for FormalConceptEngine {
    fn name(&self) -> &'static str {
        "formal_concepts"
    }

    fn mine(&self, context: &Context, bounds: &Bounds) -> Vec<Concept> {
        let objects = Self::objects(context);
        let intents = Self::intents(&objects, bounds.min_spikes);
        trace!(intents = intents.len(), "intersection closure done");

        intents
            .into_iter()
            .filter(|intent| bounds.admits_intent(intent, context.win_len()))
            .map(|intent| {
                let extent = objects
                    .iter()
                    .filter(|(_, items)| is_subset(&intent, items))
                    .map(|(&window, _)| window)
                    .collect();
                Concept::new(intent, extent)
            })
            .filter(|c| bounds.admits(c, context.win_len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use ndarray::Array2;

    #[test]
    fn test_set_helpers() {
        assert_eq!(intersect(&[1, 3, 5, 7], &[3, 4, 7]), vec![3, 7]);
        assert!(is_subset(&[3, 7], &[1, 3, 5, 7]));
        assert!(!is_subset(&[3, 8], &[1, 3, 5, 7]));
        assert!(is_subset(&[], &[1]));
    }

    #[test]
    fn test_concepts_are_closed() {
        let mut m = Array2::from_elem((2, 15), false);
        for &b in &[0, 5, 10] {
            m[[0, b]] = true;
            m[[1, b + 1]] = true;
        }
        m[[0, 3]] = true;
        let ctx = ContextBuilder::new(2).build(&m).unwrap();
        let bounds = Bounds {
            min_spikes: 1,
            max_spikes: ctx.num_attributes(),
            min_occ: 1,
            max_occ: usize::MAX,
            min_neu: 1,
        };
        let concepts = FormalConceptEngine.mine(&ctx, &bounds);
        assert!(!concepts.is_empty());
        for c in &concepts {
            assert!(ctx.relation().is_closed(&c.intent, &c.extent));
        }
        assert!(concepts.contains(&Concept::new(vec![0, 3], vec![0, 5, 10])));
    }
}
