//! Pairwise pattern set reduction.

use crate::context::{offset_of, stream_of};
use crate::mining::{Concept, Signature, SpectrumKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Correction terms of the reduction tests.
///
/// `h` corrects the excess-support test of subsets, `k` the excess-size
/// test of supersets and `l` the covered-spikes tie break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReductionParams {
    pub h: i64,
    pub k: i64,
    pub l: i64,
}

/// Which member of a pair to drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    DropFirst,
    DropSecond,
    KeepBoth,
}

/// Per-concept data used by the pairwise tests
struct Candidate {
    /// (stream, offset) pairs
    items: Vec<(usize, i64)>,
    windows: Vec<usize>,
    size: i64,
    support: i64,
    duration: usize,
}

impl Candidate {
    fn new(concept: &Concept, win_len: usize) -> Self {
        Self {
            items: concept
                .intent
                .iter()
                .map(|&a| (stream_of(a, win_len), offset_of(a, win_len) as i64))
                .collect(),
            windows: concept.extent.clone(),
            size: concept.size() as i64,
            support: concept.support() as i64,
            duration: concept.duration(win_len),
        }
    }
}

/// Removes patterns explained by a shifted super- or subset.
///
/// # Example
///
/// ```rust
/// use spade_mining::mining::{Concept, Signature};
/// use spade_mining::reduction::PatternSetReducer;
/// use std::collections::HashSet;
///
/// let sup = Concept::new(vec![0, 4, 8], vec![10, 20, 30]);
/// let sub = Concept::new(vec![0, 4], vec![10, 20, 30, 40]);
/// let excluded: HashSet<Signature> = [Signature::two_d(2, 1)].into_iter().collect();
///
/// let kept = PatternSetReducer::new(3).min_occ(1).reduce(&[sup.clone(), sub], &excluded);
/// assert_eq!(kept, vec![sup]);
/// ```
#[derive(Debug, Clone)]
pub struct PatternSetReducer {
    win_len: usize,
    params: ReductionParams,
    min_spikes: usize,
    min_occ: usize,
    kind: SpectrumKind,
}

impl PatternSetReducer {
    pub fn new(win_len: usize) -> Self {
        Self {
            win_len,
            params: ReductionParams::default(),
            min_spikes: 2,
            min_occ: 2,
            kind: SpectrumKind::TwoD,
        }
    }

    pub fn params(mut self, params: ReductionParams) -> Self {
        self.params = params;
        self
    }

    pub fn min_spikes(mut self, min_spikes: usize) -> Self {
        self.min_spikes = min_spikes;
        self
    }

    pub fn min_occ(mut self, min_occ: usize) -> Self {
        self.min_occ = min_occ;
        self
    }

    /// Signature scheme of the excluded set
    pub fn spectrum(mut self, kind: SpectrumKind) -> Self {
        self.kind = kind;
        self
    }

    fn excluded(
        &self,
        excluded: &HashSet<Signature>,
        size: i64,
        support: i64,
        duration: usize,
    ) -> bool {
        let (Ok(size), Ok(support)) = (usize::try_from(size), usize::try_from(support)) else {
            return false;
        };
        let signature = match self.kind {
            SpectrumKind::TwoD => Signature::two_d(size, support),
            SpectrumKind::ThreeD => Signature::three_d(size, support, duration),
        };
        excluded.contains(&signature)
    }

    /// Resolve a pair where one side may be rejected given the other.
    ///
    /// When both are rejected the concept covering more spikes survives.
    /// On a tie `first`, the concept processed first, survives.
    fn decide(
        &self,
        reject_first: bool,
        reject_second: bool,
        first: &Candidate,
        second: &Candidate,
    ) -> Verdict {
        let l = self.params.l;
        match (reject_first, reject_second) {
            (false, true) => Verdict::DropSecond,
            (true, false) => Verdict::DropFirst,
            (true, true) => {
                if (first.size - l) * first.support >= (second.size - l) * second.support {
                    Verdict::DropSecond
                } else {
                    Verdict::DropFirst
                }
            }
            (false, false) => Verdict::KeepBoth,
        }
    }

    /// Test a superset `sup` against its subset `sub` (in a common frame),
    /// returning `(reject_sup, reject_sub)`
    fn superset_rejections(
        &self,
        sup: &Candidate,
        sub: &Candidate,
        excluded: &HashSet<Signature>,
    ) -> (bool, bool) {
        let ReductionParams { h, k, .. } = self.params;
        let min_occ = self.min_occ as i64;
        let min_spikes = self.min_spikes as i64;

        let support_diff = sub.support - sup.support + h;
        let reject_sub = self.excluded(excluded, sub.size, support_diff, sub.duration)
            || support_diff < min_occ;
        let size_diff = sup.size - sub.size + k;
        let reject_sup = self.excluded(excluded, size_diff, sup.support, sup.duration)
            || size_diff < min_spikes;

        (reject_sup, reject_sub)
    }

    /// Compare concept `a` against concept `b` over all candidate shifts
    fn compare(&self, a: &Candidate, b: &Candidate, excluded: &HashSet<Signature>) -> Verdict {
        let win_len = self.win_len as i64;
        let min_occ = self.min_occ as i64;
        let min_spikes = self.min_spikes as i64;
        let k = self.params.k;
        let b_items: BTreeSet<(usize, i64)> = b.items.iter().copied().collect();

        for shift in shifts(&a.windows, &b.windows, win_len) {
            let a_items: BTreeSet<(usize, i64)> =
                a.items.iter().map(|&(s, o)| (s, o - shift)).collect();

            if a_items == b_items {
                return Verdict::DropSecond;
            }
            let overlap = a_items.intersection(&b_items).count() as i64;
            if overlap == 0 {
                continue;
            }
            let a_sup = a_items.is_superset(&b_items);
            let b_sup = b_items.is_superset(&a_items);
            if a_sup && b.support - a.support + self.params.h < min_occ {
                return Verdict::DropSecond;
            }
            if b_sup && a.support - b.support + self.params.h < min_occ {
                return Verdict::DropFirst;
            }

            let (reject_a, reject_b) = if a_sup {
                self.superset_rejections(a, b, excluded)
            } else if b_sup {
                let (reject_sup, reject_sub) = self.superset_rejections(b, a, excluded);
                (reject_sub, reject_sup)
            } else {
                let a_rest = a.size - overlap + k;
                let b_rest = b.size - overlap + k;
                (
                    self.excluded(excluded, a_rest, a.support, a.duration) || a_rest < min_spikes,
                    self.excluded(excluded, b_rest, b.support, b.duration) || b_rest < min_spikes,
                )
            };
            let verdict = self.decide(reject_a, reject_b, a, b);
            if verdict != Verdict::KeepBoth {
                return verdict;
            }
        }
        Verdict::KeepBoth
    }

    /// Reduce the concept list, keeping input order of the survivors.
    ///
    /// An empty `excluded` set keeps every concept.
    pub fn reduce<C>(&self, concepts: &[C], excluded: &HashSet<Signature>) -> Vec<C>
    where
        C: AsRef<Concept> + Clone,
    {
        if excluded.is_empty() || concepts.is_empty() {
            return concepts.to_vec();
        }
        let candidates: Vec<Candidate> = concepts
            .iter()
            .map(|c| Candidate::new(c.as_ref(), self.win_len))
            .collect();

        let n = candidates.len();
        let mut selected = vec![true; n];
        for i in 0..n {
            for j in 0..n {
                if !selected[i] {
                    break;
                }
                if i == j || !selected[j] {
                    continue;
                }
                match self.compare(&candidates[i], &candidates[j], excluded) {
                    Verdict::DropFirst => selected[i] = false,
                    Verdict::DropSecond => selected[j] = false,
                    Verdict::KeepBoth => {}
                }
            }
        }

        let kept: Vec<C> = concepts
            .iter()
            .zip(&selected)
            .filter_map(|(c, &s)| s.then(|| c.clone()))
            .collect();
        debug!(input = n, kept = kept.len(), "pattern set reduction");
        kept
    }
}

/// Window differences `b - a` with `|d| < win_len`, ordered by absolute
/// value, negative first on ties
fn shifts(a_windows: &[usize], b_windows: &[usize], win_len: i64) -> Vec<i64> {
    let mut diffs: Vec<i64> = b_windows
        .iter()
        .flat_map(|&wb| a_windows.iter().map(move |&wa| wb as i64 - wa as i64))
        .filter(|d| d.abs() < win_len)
        .collect();
    diffs.sort_unstable_by_key(|&d| (d.abs(), d));
    diffs.dedup();
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excluded(sigs: &[(usize, usize)]) -> HashSet<Signature> {
        sigs.iter().map(|&(z, c)| Signature::two_d(z, c)).collect()
    }

    #[test]
    fn test_shift_order() {
        assert_eq!(shifts(&[10, 20], &[11, 19, 40], 3), vec![-1, 1]);
        assert_eq!(shifts(&[5], &[3, 5, 7], 3), vec![0, -2, 2]);
    }

    #[test]
    fn test_empty_excluded_keeps_all() {
        let a = Concept::new(vec![0, 4, 8], vec![10, 20, 30]);
        let b = Concept::new(vec![0, 4], vec![10, 20, 30, 40]);
        let kept = PatternSetReducer::new(3).reduce(&[a.clone(), b.clone()], &HashSet::new());
        assert_eq!(kept, vec![a, b]);
    }

    #[test]
    fn test_subset_with_few_extra_occurrences_dropped() {
        // the subset occurs only once outside the superset's windows
        let sup = Concept::new(vec![0, 4, 8], vec![10, 20, 30]);
        let sub = Concept::new(vec![0, 4], vec![10, 20, 30, 40]);
        let kept = PatternSetReducer::new(3).reduce(&[sup.clone(), sub.clone()], &excluded(&[(9, 9)]));
        assert_eq!(kept, vec![sup.clone()]);

        // order does not matter
        let kept = PatternSetReducer::new(3).reduce(&[sub, sup.clone()], &excluded(&[(9, 9)]));
        assert_eq!(kept, vec![sup]);
    }

    #[test]
    fn test_superset_explained_by_subset() {
        // the superset adds one spike; size difference 1 < min_spikes
        let sup = Concept::new(vec![0, 4, 8], vec![10, 20, 30]);
        let sub = Concept::new(vec![0, 4], vec![10, 20, 30, 40, 50, 60, 70]);
        let reducer = PatternSetReducer::new(3).min_occ(2);
        let kept = reducer.reduce(&[sup.clone(), sub.clone()], &excluded(&[(9, 9)]));
        assert_eq!(kept, vec![sub]);
    }

    #[test]
    fn test_shifted_subset() {
        // sub is the tail (stream1, stream2) of sup, seen from window + 1
        let sup = Concept::new(vec![0, 4, 8], vec![10, 20, 30]);
        let sub = Concept::new(vec![3, 7], vec![11, 21, 31, 45]);
        let kept = PatternSetReducer::new(3).reduce(&[sup.clone(), sub], &excluded(&[(9, 9)]));
        assert_eq!(kept, vec![sup]);
    }

    #[test]
    fn test_unrelated_patterns_kept() {
        let a = Concept::new(vec![0, 4], vec![10, 20]);
        let b = Concept::new(vec![6, 10], vec![100, 200]);
        let kept = PatternSetReducer::new(3).reduce(&[a.clone(), b.clone()], &excluded(&[(2, 2)]));
        assert_eq!(kept, vec![a, b]);
    }

    #[test]
    fn test_partial_overlap_uses_remaining_spikes() {
        // share stream0@0 only: [0, 4] = s0@0 s1@1, [0, 7] = s0@0 s2@1
        let a = Concept::new(vec![0, 4], vec![10, 20, 30]);
        let b = Concept::new(vec![0, 7], vec![10, 20]);

        // one spike left on each side (< min_spikes): more covered spikes wins
        let reducer = PatternSetReducer::new(3);
        let ex = excluded(&[(9, 9)]);
        assert_eq!(reducer.reduce(&[a.clone(), b.clone()], &ex), vec![a.clone()]);
        assert_eq!(reducer.reduce(&[b.clone(), a.clone()], &ex), vec![a.clone()]);

        // with k = 1 the remainders have size 2; only (2, 3) is excluded
        let reducer = PatternSetReducer::new(3).params(ReductionParams { h: 0, k: 1, l: 0 });
        let kept = reducer.reduce(&[a.clone(), b.clone()], &excluded(&[(2, 3)]));
        assert_eq!(kept, vec![b.clone()]);

        // nothing excluded that matches: both survive
        let kept = reducer.reduce(&[a.clone(), b.clone()], &excluded(&[(9, 9)]));
        assert_eq!(kept, vec![a, b]);
    }

    #[test]
    fn test_subset_listed_before_superset() {
        // the subset has 3 extra occurrences, above min_occ
        let sub = Concept::new(vec![0, 4], vec![10, 20, 30, 40, 50]);
        let sup = Concept::new(vec![0, 4, 8], vec![10, 20]);
        let reducer = PatternSetReducer::new(3).params(ReductionParams { h: 0, k: 1, l: 0 });

        let kept = reducer.reduce(&[sub.clone(), sup.clone()], &excluded(&[(9, 9)]));
        assert_eq!(kept, vec![sub.clone(), sup.clone()]);

        // (2, 3): the extra occurrences of the subset are not significant
        let kept = reducer.reduce(&[sub.clone(), sup.clone()], &excluded(&[(2, 3)]));
        assert_eq!(kept, vec![sup.clone()]);

        // (2, 2): the extra spike of the superset is not significant
        let kept = reducer.reduce(&[sub.clone(), sup], &excluded(&[(2, 2)]));
        assert_eq!(kept, vec![sub]);
    }

    #[test]
    fn test_three_d_lookup_uses_duration() {
        let sub = Concept::new(vec![0, 4], vec![10, 20, 30, 40, 50]);
        let sup = Concept::new(vec![0, 4, 8], vec![10, 20]);
        let reducer = PatternSetReducer::new(3)
            .params(ReductionParams { h: 0, k: 1, l: 0 })
            .spectrum(SpectrumKind::ThreeD);

        // the subset spans one bin
        let hit: HashSet<Signature> = [Signature::three_d(2, 3, 1)].into_iter().collect();
        let kept = reducer.reduce(&[sub.clone(), sup.clone()], &hit);
        assert_eq!(kept, vec![sup.clone()]);

        let miss: HashSet<Signature> = [Signature::three_d(2, 3, 2)].into_iter().collect();
        let kept = reducer.reduce(&[sub.clone(), sup.clone()], &miss);
        assert_eq!(kept, vec![sub.clone(), sup.clone()]);

        // a 2-D signature never matches a 3-D lookup
        let kept = reducer.reduce(&[sub.clone(), sup.clone()], &excluded(&[(2, 3)]));
        assert_eq!(kept, vec![sub, sup]);
    }

    #[test]
    fn test_tie_keeps_first_processed() {
        // both rejected, 2 * 3 == 3 * 2 covered spikes
        let a = Concept::new(vec![0, 3], vec![10, 20, 30]);
        let b = Concept::new(vec![0, 3, 6], vec![10, 20]);
        let reducer = PatternSetReducer::new(3).min_occ(1);
        let ex = excluded(&[(2, 1), (3, 1)]);

        assert_eq!(reducer.reduce(&[a.clone(), b.clone()], &ex), vec![a.clone()]);
        assert_eq!(reducer.reduce(&[b.clone(), a], &ex), vec![b]);
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let concepts = vec![
            Concept::new(vec![0, 4, 8], vec![10, 20, 30]),
            Concept::new(vec![0, 4], vec![10, 20, 30, 40, 50]),
            Concept::new(vec![3, 7], vec![11, 21, 31, 60]),
            Concept::new(vec![0, 7], vec![3, 70, 90]),
        ];
        let reducer = PatternSetReducer::new(3);
        let ex = excluded(&[(2, 2), (2, 1), (1, 3)]);
        let once = reducer.reduce(&concepts, &ex);
        let twice = reducer.reduce(&once, &ex);
        assert_eq!(once, twice);
    }
}
