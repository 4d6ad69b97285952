//! Closed-pattern engine strategy.

use super::{ClosedItemsetEngine, ClosedSet, Concept, FormalConceptEngine, Itemset, MiningError};
use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size, support and stream-count bounds applied to mined patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_spikes: usize,
    pub max_spikes: usize,
    pub min_occ: usize,
    pub max_occ: usize,
    pub min_neu: usize,
}

impl Bounds {
    /// Whether an intent of the given window length passes the size and
    /// stream-count bounds
    pub fn admits_intent(&self, intent: &[usize], win_len: usize) -> bool {
        if intent.len() < self.min_spikes || intent.len() > self.max_spikes {
            return false;
        }
        let mut streams: Vec<usize> = intent.iter().map(|&a| a / win_len).collect();
        streams.dedup();
        streams.len() >= self.min_neu
    }

    pub fn admits_support(&self, support: usize) -> bool {
        support >= self.min_occ && support <= self.max_occ
    }

    /// Full admission test for an item set.
    ///
    /// Sets whose earliest spike is not at offset 0 are rejected: the same
    /// configuration is recorded from the window its first spike opens.
    pub fn admits_itemset<I: Itemset + ?Sized>(&self, itemset: &I, win_len: usize) -> bool {
        let items = itemset.items();
        self.admits_intent(items, win_len)
            && self.admits_support(itemset.support())
            && items.iter().any(|&a| a % win_len == 0)
    }

    pub fn admits(&self, concept: &Concept, win_len: usize) -> bool {
        self.admits_itemset(concept, win_len)
    }
}

/// Strategy interface of the closed-pattern engines.
///
/// Implementations enumerate the concepts of a context that satisfy the
/// bounds. Both engines yield the same concept set on the same input.
pub trait ClosedPatternEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Enumerate admitted concepts with their extents
    fn mine(&self, context: &Context, bounds: &Bounds) -> Vec<Concept>;

    /// Enumerate admitted closed sets with supports only
    fn mine_closed_sets(&self, context: &Context, bounds: &Bounds) -> Vec<ClosedSet> {
        self.mine(context, bounds).iter().map(ClosedSet::from).collect()
    }
}

/// Available engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Closed frequent itemset enumeration by prefix-preserving closure
    /// extension
    #[default]
    ClosedItemsets,
    /// Formal concept enumeration by intersection closure
    FormalConcepts,
}

impl EngineKind {
    /// Instantiate the engine
    pub fn engine(&self) -> Box<dyn ClosedPatternEngine> {
        match self {
            EngineKind::ClosedItemsets => Box::new(ClosedItemsetEngine),
            EngineKind::FormalConcepts => Box::new(FormalConceptEngine),
        }
    }
}

impl FromStr for EngineKind {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed_itemsets" | "lcm" | "fpgrowth" => Ok(EngineKind::ClosedItemsets),
            "formal_concepts" | "fca" | "fast_fca" => Ok(EngineKind::FormalConcepts),
            other => Err(MiningError::InvalidEngine(other.to_string())),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::ClosedItemsets => f.write_str("closed_itemsets"),
            EngineKind::FormalConcepts => f.write_str("formal_concepts"),
        }
    }
}
