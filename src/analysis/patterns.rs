//! Concept to pattern record conversion.

use crate::context::{offset_of, stream_of};
use crate::mining::{AnnotatedConcept, Signature, SpectrumKind};
use crate::significance::PValueSpectrum;
use crate::stability::Stability;
use serde::{Deserialize, Serialize};

/// A retained pattern in user-facing form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    /// Attribute ids (`stream * win_len + offset`)
    pub itemset: Vec<usize>,
    /// Start bins of the windows the pattern occurs in
    pub windows_ids: Vec<usize>,
    /// Streams of the spikes, ordered by lag
    pub neurons: Vec<usize>,
    /// Bins after the first spike, aligned with `neurons`
    pub lags: Vec<usize>,
    /// Occurrence times of the first spike in ms
    pub times: Vec<f64>,
    pub signature: Signature,
    /// P-value of the signature, -1 when no surrogates were drawn
    pub pvalue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<Stability>,
}

/// Convert concepts into pattern records.
///
/// Signatures missing from a computed p-value spectrum get p-value 0: no
/// surrogate reached them.
pub fn concepts_to_patterns(
    concepts: &[AnnotatedConcept],
    win_len: usize,
    bin_size: f64,
    pvalue_spectrum: Option<&PValueSpectrum>,
    kind: SpectrumKind,
    t_start: f64,
) -> Vec<PatternRecord> {
    concepts
        .iter()
        .map(|annotated| {
            let concept = &annotated.concept;
            let mut spikes: Vec<(usize, usize)> = concept
                .intent
                .iter()
                .map(|&a| (offset_of(a, win_len), stream_of(a, win_len)))
                .collect();
            spikes.sort_by_key(|&(offset, _)| offset);
            let first = spikes.first().map_or(0, |&(offset, _)| offset);

            let signature = concept.signature(kind, win_len);
            let pvalue = match pvalue_spectrum {
                Some(spectrum) => spectrum.pvalue(&signature).unwrap_or(0.0),
                None => -1.0,
            };

            PatternRecord {
                itemset: concept.intent.clone(),
                windows_ids: concept.extent.clone(),
                neurons: spikes.iter().map(|&(_, stream)| stream).collect(),
                lags: spikes.iter().map(|&(offset, _)| offset - first).collect(),
                times: concept
                    .extent
                    .iter()
                    .map(|&w| t_start + (w + first) as f64 * bin_size)
                    .collect(),
                signature,
                pvalue,
                stability: annotated.stability,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::Concept;
    use crate::significance::PValueEntry;

    #[test]
    fn test_record_fields() {
        // win_len 4: stream2@0, stream0@3, stream1@1
        let concept = Concept::new(vec![8, 3, 5], vec![10, 40]);
        let records = concepts_to_patterns(
            &[concept.into()],
            4,
            2.0,
            None,
            SpectrumKind::TwoD,
            100.0,
        );
        let r = &records[0];
        assert_eq!(r.itemset, vec![3, 5, 8]);
        assert_eq!(r.neurons, vec![2, 1, 0]);
        assert_eq!(r.lags, vec![0, 1, 3]);
        assert_eq!(r.times, vec![120.0, 180.0]);
        assert_eq!(r.signature, Signature::two_d(3, 2));
        assert_eq!(r.pvalue, -1.0);
    }

    #[test]
    fn test_pvalue_lookup() {
        let spectrum = PValueSpectrum::new(
            SpectrumKind::ThreeD,
            vec![PValueEntry {
                signature: Signature::three_d(2, 2, 1),
                pvalue: 0.2,
            }],
        );
        let hit: AnnotatedConcept = Concept::new(vec![0, 5], vec![1, 7]).into();
        let miss: AnnotatedConcept = Concept::new(vec![0, 6], vec![1, 7]).into();
        let records = concepts_to_patterns(
            &[hit, miss],
            4,
            1.0,
            Some(&spectrum),
            SpectrumKind::ThreeD,
            0.0,
        );
        assert_eq!(records[0].pvalue, 0.2);
        assert_eq!(records[1].pvalue, 0.0);
    }
}
