//! Pattern signatures and the pattern spectrum.

use super::{Itemset, MiningError};
use crate::context::offset_of;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which summary of a pattern is used for statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpectrumKind {
    /// (size, support)
    #[default]
    #[serde(rename = "#", alias = "2d")]
    TwoD,
    /// (size, support, duration)
    #[serde(rename = "3d#", alias = "3d")]
    ThreeD,
}

impl SpectrumKind {
    /// Short name as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            SpectrumKind::TwoD => "#",
            SpectrumKind::ThreeD => "3d#",
        }
    }
}

impl FromStr for SpectrumKind {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "#" | "2d" => Ok(SpectrumKind::TwoD),
            "3d#" | "3d" => Ok(SpectrumKind::ThreeD),
            other => Err(MiningError::InvalidSpectrumKind(other.to_string())),
        }
    }
}

impl fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistical signature of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    /// Number of spikes in the pattern
    pub size: usize,
    /// Number of occurrences
    pub support: usize,
    /// Bins between first and last spike (3-D scheme only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<usize>,
}

impl Signature {
    /// (size, support) signature
    pub fn two_d(size: usize, support: usize) -> Self {
        Self {
            size,
            support,
            duration: None,
        }
    }

    /// (size, support, duration) signature
    pub fn three_d(size: usize, support: usize, duration: usize) -> Self {
        Self {
            size,
            support,
            duration: Some(duration),
        }
    }

    /// Build the signature of an item set under the given scheme
    pub fn of<I: Itemset + ?Sized>(itemset: &I, kind: SpectrumKind, win_len: usize) -> Self {
        let size = itemset.items().len();
        let support = itemset.support();
        match kind {
            SpectrumKind::TwoD => Self::two_d(size, support),
            SpectrumKind::ThreeD => Self::three_d(size, support, duration(itemset.items(), win_len)),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.duration {
            Some(d) => write!(f, "({}, {}, {})", self.size, self.support, d),
            None => write!(f, "({}, {})", self.size, self.support),
        }
    }
}

/// Bins between the first and the last spike of an attribute set
pub(crate) fn duration(items: &[usize], win_len: usize) -> usize {
    let offsets = items.iter().map(|&a| offset_of(a, win_len));
    match (offsets.clone().min(), offsets.max()) {
        (Some(lo), Some(hi)) => hi - lo,
        _ => 0,
    }
}

/// Number of patterns per signature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSpectrum {
    kind: SpectrumKind,
    counts: BTreeMap<Signature, usize>,
}

impl PatternSpectrum {
    /// Create an empty spectrum
    pub fn new(kind: SpectrumKind) -> Self {
        Self {
            kind,
            counts: BTreeMap::new(),
        }
    }

    /// Count the signatures of all given item sets
    pub fn from_itemsets<I: Itemset>(itemsets: &[I], kind: SpectrumKind, win_len: usize) -> Self {
        let mut spectrum = Self::new(kind);
        for itemset in itemsets {
            spectrum.add(Signature::of(itemset, kind, win_len));
        }
        spectrum
    }

    /// Record one pattern with the given signature
    pub fn add(&mut self, signature: Signature) {
        *self.counts.entry(signature).or_insert(0) += 1;
    }

    /// Signature scheme
    pub fn kind(&self) -> SpectrumKind {
        self.kind
    }

    /// Number of patterns with `signature`
    pub fn count(&self, signature: &Signature) -> usize {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    /// Number of distinct signatures
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no pattern was recorded
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of patterns over all signatures
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Iterate (signature, count) in signature order
    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &usize)> {
        self.counts.iter()
    }

    /// Signatures in ascending order
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.counts.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::Concept;

    #[test]
    fn test_signature_of_concept() {
        // win_len 4: stream0@0, stream1@3
        let concept = Concept::new(vec![0, 7], vec![2, 9, 15]);
        assert_eq!(
            Signature::of(&concept, SpectrumKind::TwoD, 4),
            Signature::two_d(2, 3)
        );
        assert_eq!(
            Signature::of(&concept, SpectrumKind::ThreeD, 4),
            Signature::three_d(2, 3, 3)
        );
    }

    #[test]
    fn test_spectrum_conservation() {
        let concepts = vec![
            Concept::new(vec![0, 4], vec![1, 5]),
            Concept::new(vec![0, 5], vec![2, 6]),
            Concept::new(vec![0, 4, 8], vec![1, 5, 9]),
        ];
        let spectrum = PatternSpectrum::from_itemsets(&concepts, SpectrumKind::TwoD, 4);
        assert_eq!(spectrum.total(), concepts.len());
        assert_eq!(spectrum.count(&Signature::two_d(2, 2)), 2);

        let spectrum = PatternSpectrum::from_itemsets(&concepts, SpectrumKind::ThreeD, 4);
        assert_eq!(spectrum.total(), concepts.len());
        assert_eq!(spectrum.len(), 3);
    }

    #[test]
    fn test_spectrum_kind_parsing() {
        assert_eq!("#".parse::<SpectrumKind>().unwrap(), SpectrumKind::TwoD);
        assert_eq!("3d#".parse::<SpectrumKind>().unwrap(), SpectrumKind::ThreeD);
        assert!(matches!(
            "4d".parse::<SpectrumKind>(),
            Err(MiningError::InvalidSpectrumKind(_))
        ));
    }
}
