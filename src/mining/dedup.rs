//! Moving-window duplicate filtering.
//!
//! A pattern found in the window opened by its first spike is found again,
//! truncated, in the windows opened by its later spikes. Those truncated
//! copies are dropped unless they also occur on their own.

use super::Itemset;
use crate::context::{attribute, offset_of, stream_of};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Re-express attributes relative to the last spike of the set:
/// `offset' = max_offset - offset`
pub fn rereference_to_last_spike(items: &[usize], win_len: usize) -> Vec<usize> {
    let last = items
        .iter()
        .map(|&a| offset_of(a, win_len))
        .max()
        .unwrap_or(0);
    items
        .iter()
        .map(|&a| attribute(stream_of(a, win_len), last - offset_of(a, win_len), win_len))
        .collect()
}

/// Drop item sets that are, relative to their last spike, a subset of
/// another item set with the same support.
///
/// Order of the survivors follows the input order.
pub fn filter_moving_window_subsets<T: Itemset + Clone>(itemsets: &[T], win_len: usize) -> Vec<T> {
    if itemsets.is_empty() {
        return Vec::new();
    }

    let mut by_support: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, set) in itemsets.iter().enumerate() {
        by_support.entry(set.support()).or_default().push(idx);
    }
    let converted: Vec<Vec<usize>> = itemsets
        .iter()
        .map(|set| rereference_to_last_spike(set.items(), win_len))
        .collect();

    let mut keep = vec![false; itemsets.len()];
    for members in by_support.values().rev() {
        let mut reverse_map: HashMap<usize, HashSet<usize>> = HashMap::new();
        for &idx in members {
            for &a in &converted[idx] {
                reverse_map.entry(a).or_default().insert(idx);
            }
        }
        for &idx in members {
            let mut sets = converted[idx].iter().filter_map(|a| reverse_map.get(a));
            let Some(first) = sets.next() else {
                continue;
            };
            let shared = sets.fold(first.clone(), |acc, s| &acc & s);
            keep[idx] = shared.len() == 1;
        }
    }

    itemsets
        .iter()
        .zip(keep)
        .filter_map(|(set, k)| k.then(|| set.clone()))
        .collect()
}
