//! Pattern spectrum filter.

use crate::mining::{Concept, Signature, SpectrumKind};
use std::collections::HashSet;

/// Drop every concept whose signature is non-significant
pub fn pattern_spectrum_filter<C>(
    concepts: &[C],
    non_significant: &HashSet<Signature>,
    kind: SpectrumKind,
    win_len: usize,
) -> Vec<C>
where
    C: AsRef<Concept> + Clone,
{
    if non_significant.is_empty() {
        return concepts.to_vec();
    }
    concepts
        .iter()
        .filter(|c| !non_significant.contains(&c.as_ref().signature(kind, win_len)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::AnnotatedConcept;

    #[test]
    fn test_filter_by_signature() {
        let a = Concept::new(vec![0, 4], vec![1, 9, 20]);
        let b = Concept::new(vec![0, 5], vec![3, 11]);
        let excluded: HashSet<Signature> = [Signature::two_d(2, 2)].into_iter().collect();

        let kept = pattern_spectrum_filter(&[a.clone(), b.clone()], &excluded, SpectrumKind::TwoD, 3);
        assert_eq!(kept, vec![a.clone()]);

        // in 3-D the duration is part of the signature
        let excluded: HashSet<Signature> = [Signature::three_d(2, 2, 1)].into_iter().collect();
        let kept = pattern_spectrum_filter(&[a.clone(), b.clone()], &excluded, SpectrumKind::ThreeD, 3);
        assert_eq!(kept, vec![a, b]);
    }

    #[test]
    fn test_filter_keeps_annotations() {
        let a = AnnotatedConcept::from(Concept::new(vec![0, 4], vec![1, 9]));
        let kept = pattern_spectrum_filter(&[a.clone()], &HashSet::new(), SpectrumKind::TwoD, 3);
        assert_eq!(kept, vec![a]);
    }
}
