//! Closed frequent itemset engine.
//!
//! Enumerates closed attribute sets by prefix-preserving closure extension:
//! every closed set is reached exactly once from its unique parent, so no
//! duplicate check against already found sets is needed.

use super::{Bounds, ClosedPatternEngine, ClosedSet, Concept};
use crate::context::Context;
use bit_set::BitSet;
use tracing::trace;

/// Closed itemset miner over the window transactions
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedItemsetEngine;

/// Vertical layout of the transactions: for every attribute, the set of
/// transaction indices holding it
struct Occurrences {
    tidsets: Vec<BitSet>,
}

impl Occurrences {
    fn new(context: &Context) -> Self {
        let mut tidsets = vec![BitSet::with_capacity(context.num_windows()); context.num_attributes()];
        for (tid, items) in context.transactions().iter().enumerate() {
            for &a in items {
                tidsets[a].insert(tid);
            }
        }
        Self { tidsets }
    }

    fn num_items(&self) -> usize {
        self.tidsets.len()
    }

    /// Attributes shared by every transaction of `tids`
    fn closure(&self, tids: &BitSet) -> Vec<usize> {
        (0..self.num_items())
            .filter(|&a| self.tidsets[a].is_superset(tids))
            .collect()
    }
}

impl ClosedItemsetEngine {
    /// Enumerate all closed sets with support >= `min_occ` and at most
    /// `max_spikes` attributes, as (intent, transaction ids) pairs
    fn enumerate(&self, context: &Context, bounds: &Bounds) -> Vec<(Vec<usize>, BitSet)> {
        let mut found = Vec::new();
        let num_tx = context.num_windows();
        if num_tx == 0 || num_tx < bounds.min_occ.max(1) {
            return found;
        }

        let occurrences = Occurrences::new(context);
        let all: BitSet = (0..num_tx).collect();
        let root = occurrences.closure(&all);
        if root.len() > bounds.max_spikes {
            return found;
        }
        self.extend(&occurrences, root, all, None, bounds, &mut found);
        trace!(closed_sets = found.len(), "closed itemset enumeration done");
        found
    }

    fn extend(
        &self,
        occurrences: &Occurrences,
        itemset: Vec<usize>,
        tids: BitSet,
        core: Option<usize>,
        bounds: &Bounds,
        found: &mut Vec<(Vec<usize>, BitSet)>,
    ) {
        let start = core.map_or(0, |c| c + 1);
        for e in start..occurrences.num_items() {
            if itemset.binary_search(&e).is_ok() {
                continue;
            }
            let mut next_tids = tids.clone();
            next_tids.intersect_with(&occurrences.tidsets[e]);
            if next_tids.len() < bounds.min_occ {
                continue;
            }
            let closed = occurrences.closure(&next_tids);
            // Prefix preservation: the closure must not add items below e
            let prefix_new = closed.iter().take_while(|&&a| a < e);
            let prefix_old = itemset.iter().take_while(|&&a| a < e);
            if !prefix_new.eq(prefix_old) {
                continue;
            }
            if closed.len() > bounds.max_spikes {
                continue;
            }
            self.extend(occurrences, closed, next_tids, Some(e), bounds, found);
        }
        if !itemset.is_empty() {
            found.push((itemset, tids));
        }
    }
}

impl ClosedPatternEngine for ClosedItemsetEngine {
    fn name(&self) -> &'static str {
        "closed_itemsets"
    }

    fn mine(&self, context: &Context, bounds: &Bounds) -> Vec<Concept> {
        let windows = context.windows();
        self.enumerate(context, bounds)
            .into_iter()
            .map(|(intent, tids)| {
                let extent = tids.iter().map(|tid| windows[tid]).collect();
                Concept::new(intent, extent)
            })
            .filter(|c| bounds.admits(c, context.win_len()))
            .collect()
    }

    fn mine_closed_sets(&self, context: &Context, bounds: &Bounds) -> Vec<ClosedSet> {
        self.enumerate(context, bounds)
            .into_iter()
            .map(|(intent, tids)| ClosedSet {
                intent,
                support: tids.len(),
            })
            .filter(|set| bounds.admits_itemset(set, context.win_len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use ndarray::Array2;

    fn bounds(num_attributes: usize) -> Bounds {
        Bounds {
            min_spikes: 2,
            max_spikes: num_attributes,
            min_occ: 2,
            max_occ: usize::MAX,
            min_neu: 1,
        }
    }

    #[test]
    fn test_finds_synchronous_pair() {
        // streams 0 and 1 fire together at bins 2, 6, 9
        let mut m = Array2::from_elem((3, 12), false);
        for &b in &[2, 6, 9] {
            m[[0, b]] = true;
            m[[1, b]] = true;
        }
        m[[2, 4]] = true;
        let ctx = ContextBuilder::new(1).build(&m).unwrap();
        let concepts = ClosedItemsetEngine.mine(&ctx, &bounds(ctx.num_attributes()));

        assert_eq!(concepts, vec![Concept::new(vec![0, 1], vec![2, 6, 9])]);
    }

    #[test]
    fn test_closed_sets_match_concepts() {
        let mut m = Array2::from_elem((3, 20), false);
        for &b in &[1, 7, 13] {
            m[[0, b]] = true;
            m[[1, b + 1]] = true;
            m[[2, b + 2]] = true;
        }
        m[[1, 4]] = true;
        let ctx = ContextBuilder::new(3).build(&m).unwrap();
        let b = bounds(ctx.num_attributes());

        let concepts = ClosedItemsetEngine.mine(&ctx, &b);
        let sets = ClosedItemsetEngine.mine_closed_sets(&ctx, &b);
        assert_eq!(concepts.len(), sets.len());
        for c in &concepts {
            assert!(ctx.relation().is_closed(&c.intent, &c.extent));
        }
        assert!(concepts.contains(&Concept::new(vec![0, 4, 8], vec![1, 7, 13])));
    }

    #[test]
    fn test_empty_context() {
        let m = Array2::from_elem((2, 5), false);
        let ctx = ContextBuilder::new(2).build(&m).unwrap();
        assert!(ClosedItemsetEngine
            .mine(&ctx, &bounds(ctx.num_attributes()))
            .is_empty());
    }
}
