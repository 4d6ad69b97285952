//! Multiple testing corrections.

use super::{PValueSpectrum, SignificanceError};
use crate::mining::Signature;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multiple testing correction applied to the p-value spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Correction {
    /// Reject when p <= alpha
    #[serde(rename = "no", alias = "")]
    None,
    /// Reject when p <= alpha / m
    #[serde(rename = "bonf", alias = "b")]
    Bonferroni,
    /// Benjamini-Hochberg false discovery rate
    #[default]
    #[serde(rename = "fdr", alias = "f")]
    Fdr,
    /// Holm-Bonferroni, rank-wise thresholds alpha / (m - rank)
    #[serde(rename = "holm_bonf", alias = "hb")]
    HolmBonferroni,
}

impl FromStr for Correction {
    type Err = SignificanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "no" => Ok(Correction::None),
            "b" | "bonf" => Ok(Correction::Bonferroni),
            "f" | "fdr" => Ok(Correction::Fdr),
            "hb" | "holm_bonf" => Ok(Correction::HolmBonferroni),
            other => Err(SignificanceError::InvalidCorrection(other.to_string())),
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Correction::None => "no",
            Correction::Bonferroni => "bonf",
            Correction::Fdr => "fdr",
            Correction::HolmBonferroni => "holm_bonf",
        };
        f.write_str(name)
    }
}

impl Correction {
    /// Decide for each p-value whether it is significant at level `alpha`
    pub fn apply(&self, pvalues: &[f64], alpha: f64) -> Vec<bool> {
        let m = pvalues.len();
        if m == 0 {
            return Vec::new();
        }
        match self {
            Correction::None => pvalues.iter().map(|&p| p <= alpha).collect(),
            Correction::Bonferroni => {
                let thresh = alpha / m as f64;
                pvalues.iter().map(|&p| p <= thresh).collect()
            }
            Correction::Fdr => {
                let (thresh, _) = fdr_threshold(pvalues, alpha);
                pvalues.iter().map(|&p| p <= thresh).collect()
            }
            Correction::HolmBonferroni => {
                let mut order: Vec<usize> = (0..m).collect();
                order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));
                let mut tests = vec![false; m];
                for (rank, &idx) in order.iter().enumerate() {
                    tests[idx] = pvalues[idx] <= alpha / (m - rank) as f64;
                }
                tests
            }
        }
    }
}

/// Benjamini-Hochberg threshold and the rank of the largest significant
/// p-value (0 when nothing is significant)
pub(crate) fn fdr_threshold(pvalues: &[f64], alpha: f64) -> (f64, usize) {
    let m = pvalues.len();
    let mut sorted = pvalues.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let k = sorted
        .iter()
        .enumerate()
        .find(|&(i, &p)| p <= alpha * (m - i) as f64 / m as f64)
        .map_or(0, |(i, _)| m - i);
    (alpha * k as f64 / m as f64, k)
}

/// Outcome of testing every signature of a p-value spectrum
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignificanceTest {
    /// (signature, is significant) in spectrum order
    pub tests: Vec<(Signature, bool)>,
}

impl SignificanceTest {
    /// Every tested signature with its outcome
    pub fn spectrum(&self) -> &[(Signature, bool)] {
        &self.tests
    }

    pub fn significant(&self) -> Vec<Signature> {
        self.tests
            .iter()
            .filter(|(_, t)| *t)
            .map(|(s, _)| *s)
            .collect()
    }

    pub fn non_significant(&self) -> Vec<Signature> {
        self.tests
            .iter()
            .filter(|(_, t)| !*t)
            .map(|(s, _)| *s)
            .collect()
    }
}

/// Test the signatures of a p-value spectrum at level `alpha`.
///
/// `alpha == 1` skips testing: every signature is significant.
pub fn test_signature_significance(
    spectrum: &PValueSpectrum,
    alpha: f64,
    correction: Correction,
) -> Result<SignificanceTest, SignificanceError> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(SignificanceError::InvalidAlpha(alpha));
    }
    let outcomes = if alpha == 1.0 {
        vec![true; spectrum.len()]
    } else {
        correction.apply(&spectrum.pvalues(), alpha)
    };
    Ok(SignificanceTest {
        tests: spectrum
            .iter()
            .map(|e| e.signature)
            .zip(outcomes)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::SpectrumKind;
    use crate::significance::PValueEntry;
    use approx::assert_relative_eq;

    const PVALUES: [f64; 6] = [0.001, 0.008, 0.039, 0.041, 0.042, 0.6];

    #[test]
    fn test_uncorrected_and_bonferroni() {
        assert_eq!(
            Correction::None.apply(&PVALUES, 0.05),
            vec![true, true, true, true, true, false]
        );
        // 0.05 / 6 = 0.00833
        assert_eq!(
            Correction::Bonferroni.apply(&PVALUES, 0.05),
            vec![true, true, false, false, false, false]
        );
    }

    #[test]
    fn test_fdr() {
        // descending scan stops at 0.008 <= 0.05 * 2 / 6
        let (thresh, k) = fdr_threshold(&PVALUES, 0.05);
        assert_eq!(k, 2);
        assert_relative_eq!(thresh, 0.05 * 2.0 / 6.0);
        assert_eq!(
            Correction::Fdr.apply(&PVALUES, 0.05),
            vec![true, true, false, false, false, false]
        );

        let (thresh, k) = fdr_threshold(&[0.5, 0.9], 0.05);
        assert_eq!((thresh, k), (0.0, 0));
    }

    #[test]
    fn test_holm_bonferroni_per_rank() {
        let tests = Correction::HolmBonferroni.apply(&[0.009, 0.0001, 0.3], 0.05);
        // ranks: 0.0001 -> 0.05/3, 0.009 -> 0.05/2, 0.3 -> 0.05/1
        assert_eq!(tests, vec![true, true, false]);
    }

    #[test]
    fn test_correction_monotonicity() {
        let pvalues: Vec<f64> = (0..40).map(|i| (i as f64 / 40.0).powi(3)).collect();
        for &alpha in &[0.01, 0.05, 0.2] {
            let none = Correction::None.apply(&pvalues, alpha);
            let fdr = Correction::Fdr.apply(&pvalues, alpha);
            let bonf = Correction::Bonferroni.apply(&pvalues, alpha);
            for i in 0..pvalues.len() {
                assert!(!bonf[i] || fdr[i]);
                assert!(!fdr[i] || none[i]);
            }
        }
    }

    #[test]
    fn test_signature_test_views() {
        let spectrum = PValueSpectrum::new(
            SpectrumKind::TwoD,
            vec![
                PValueEntry {
                    signature: Signature::two_d(2, 2),
                    pvalue: 1.0,
                },
                PValueEntry {
                    signature: Signature::two_d(2, 5),
                    pvalue: 0.0,
                },
            ],
        );
        let test = test_signature_significance(&spectrum, 0.05, Correction::Fdr).unwrap();
        assert_eq!(test.significant(), vec![Signature::two_d(2, 5)]);
        assert_eq!(test.non_significant(), vec![Signature::two_d(2, 2)]);

        let bypass = test_signature_significance(&spectrum, 1.0, Correction::Fdr).unwrap();
        assert!(bypass.non_significant().is_empty());

        assert!(matches!(
            test_signature_significance(&spectrum, 0.0, Correction::Fdr),
            Err(SignificanceError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn test_correction_names() {
        assert_eq!("".parse::<Correction>().unwrap(), Correction::None);
        assert_eq!("hb".parse::<Correction>().unwrap(), Correction::HolmBonferroni);
        assert_eq!("bonf".parse::<Correction>().unwrap(), Correction::Bonferroni);
        assert!(matches!(
            "bh".parse::<Correction>(),
            Err(SignificanceError::InvalidCorrection(_))
        ));
    }
}
