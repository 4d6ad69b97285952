//! Concept representation.

use super::spectrum::{self, Signature, SpectrumKind};
use crate::context::{offset_of, stream_of};
use crate::stability::Stability;
use serde::{Deserialize, Serialize};

/// Anything carrying a sorted attribute set and an occurrence count
pub trait Itemset {
    /// Sorted attribute ids
    fn items(&self) -> &[usize];
    /// Number of occurrences
    fn support(&self) -> usize;
}

/// A closed (intent, extent) pair of the sliding-window context.
///
/// The intent lists attribute ids (`stream * win_len + offset`), the extent
/// lists the window start bins in which every attribute of the intent occurs.
/// Both are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Concept {
    pub intent: Vec<usize>,
    pub extent: Vec<usize>,
}

impl Concept {
    /// Create a concept, sorting both sets
    pub fn new(mut intent: Vec<usize>, mut extent: Vec<usize>) -> Self {
        intent.sort_unstable();
        intent.dedup();
        extent.sort_unstable();
        extent.dedup();
        Self { intent, extent }
    }

    /// Pattern size (number of spikes)
    pub fn size(&self) -> usize {
        self.intent.len()
    }

    /// Number of occurrences
    pub fn support(&self) -> usize {
        self.extent.len()
    }

    /// Distinct streams taking part in the pattern
    pub fn streams(&self, win_len: usize) -> Vec<usize> {
        let mut streams: Vec<usize> = self
            .intent
            .iter()
            .map(|&a| stream_of(a, win_len))
            .collect();
        streams.dedup();
        streams
    }

    /// Number of distinct streams
    pub fn num_streams(&self, win_len: usize) -> usize {
        self.streams(win_len).len()
    }

    pub fn first_offset(&self, win_len: usize) -> Option<usize> {
        self.intent.iter().map(|&a| offset_of(a, win_len)).min()
    }

    pub fn last_offset(&self, win_len: usize) -> Option<usize> {
        self.intent.iter().map(|&a| offset_of(a, win_len)).max()
    }

    /// Bins between the first and the last spike
    pub fn duration(&self, win_len: usize) -> usize {
        spectrum::duration(&self.intent, win_len)
    }

    /// Whether some spike sits at offset 0 of the window
    pub fn is_anchored(&self, win_len: usize) -> bool {
        self.first_offset(win_len) == Some(0)
    }

    /// Signature under the given scheme
    pub fn signature(&self, kind: SpectrumKind, win_len: usize) -> Signature {
        Signature::of(self, kind, win_len)
    }
}

impl Itemset for Concept {
    fn items(&self) -> &[usize] {
        &self.intent
    }

    fn support(&self) -> usize {
        self.extent.len()
    }
}

impl AsRef<Concept> for Concept {
    fn as_ref(&self) -> &Concept {
        self
    }
}

/// A closed attribute set with its support only, as produced when mining
/// for the pattern spectrum
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClosedSet {
    pub intent: Vec<usize>,
    pub support: usize,
}

impl Itemset for ClosedSet {
    fn items(&self) -> &[usize] {
        &self.intent
    }

    fn support(&self) -> usize {
        self.support
    }
}

impl From<&Concept> for ClosedSet {
    fn from(concept: &Concept) -> Self {
        Self {
            intent: concept.intent.clone(),
            support: concept.support(),
        }
    }
}

/// Concept together with its optional stability scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedConcept {
    pub concept: Concept,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<Stability>,
}

impl AnnotatedConcept {
    pub fn new(concept: Concept, stability: Option<Stability>) -> Self {
        Self { concept, stability }
    }
}

impl From<Concept> for AnnotatedConcept {
    fn from(concept: Concept) -> Self {
        Self::new(concept, None)
    }
}

impl AsRef<Concept> for AnnotatedConcept {
    fn as_ref(&self) -> &Concept {
        &self.concept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_properties() {
        // win_len 3: stream0@0, stream1@1, stream1@2
        let concept = Concept::new(vec![5, 0, 4], vec![20, 10]);
        assert_eq!(concept.intent, vec![0, 4, 5]);
        assert_eq!(concept.extent, vec![10, 20]);
        assert_eq!(concept.size(), 3);
        assert_eq!(concept.support(), 2);
        assert_eq!(concept.streams(3), vec![0, 1]);
        assert_eq!(concept.duration(3), 2);
        assert!(concept.is_anchored(3));
    }

    #[test]
    fn test_unanchored() {
        let concept = Concept::new(vec![1, 5], vec![0]);
        assert!(!concept.is_anchored(3));
        assert_eq!(concept.first_offset(3), Some(1));
        assert_eq!(concept.last_offset(3), Some(2));
    }
}
