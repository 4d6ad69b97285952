//! P-value spectrum.

use crate::mining::{Signature, SpectrumKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// P-value of one signature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PValueEntry {
    pub signature: Signature,
    pub pvalue: f64,
}

/// Probability, under the null model, of observing at least the given
/// support for a pattern of the given size (and duration)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawSpectrum")]
pub struct PValueSpectrum {
    kind: SpectrumKind,
    entries: Vec<PValueEntry>,
    /// Position of each signature in `entries`
    #[serde(skip)]
    index: HashMap<Signature, usize>,
}

#[derive(Deserialize)]
struct RawSpectrum {
    kind: SpectrumKind,
    entries: Vec<PValueEntry>,
}

impl From<RawSpectrum> for PValueSpectrum {
    fn from(raw: RawSpectrum) -> Self {
        Self::new(raw.kind, raw.entries)
    }
}

impl PValueSpectrum {
    pub fn new(kind: SpectrumKind, entries: Vec<PValueEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            index.entry(e.signature).or_insert(i);
        }
        Self {
            kind,
            entries,
            index,
        }
    }

    /// P-value of `signature`, `None` if the signature was never tested
    pub fn pvalue(&self, signature: &Signature) -> Option<f64> {
        self.index.get(signature).map(|&i| self.entries[i].pvalue)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PValueEntry> {
        self.entries.iter()
    }

    /// P-values in entry order
    pub fn pvalues(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.pvalue).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let spectrum = PValueSpectrum::new(
            SpectrumKind::TwoD,
            vec![
                PValueEntry {
                    signature: Signature::two_d(2, 3),
                    pvalue: 0.5,
                },
                PValueEntry {
                    signature: Signature::two_d(2, 4),
                    pvalue: 0.01,
                },
            ],
        );
        assert_eq!(spectrum.pvalue(&Signature::two_d(2, 4)), Some(0.01));
        assert_eq!(spectrum.pvalue(&Signature::two_d(3, 4)), None);
        assert_eq!(spectrum.pvalues(), vec![0.5, 0.01]);
    }

    #[test]
    fn test_lookup_survives_json() {
        let spectrum = PValueSpectrum::new(
            SpectrumKind::ThreeD,
            vec![PValueEntry {
                signature: Signature::three_d(3, 2, 1),
                pvalue: 0.25,
            }],
        );
        let json = serde_json::to_string(&spectrum).unwrap();
        assert!(!json.contains("index"));

        let back: PValueSpectrum = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spectrum);
        assert_eq!(back.pvalue(&Signature::three_d(3, 2, 1)), Some(0.25));
        assert_eq!(back.pvalue(&Signature::three_d(3, 2, 0)), None);
    }
}
