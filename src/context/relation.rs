//! Window x attribute relation matrix and its derivation operators.

use ndarray::Array2;

/// Boolean relation between window positions and attributes.
///
/// Rows are indexed by window start bin (shape `[num_bins, attributes]`),
/// rows of windows that were not retained stay all false. The list of
/// retained windows is kept alongside so that derivations range over the
/// objects of the context only.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMatrix {
    matrix: Array2<bool>,
    windows: Vec<usize>,
}

impl RelationMatrix {
    pub(crate) fn new(matrix: Array2<bool>, windows: Vec<usize>) -> Self {
        Self { matrix, windows }
    }

    /// Underlying matrix
    pub fn matrix(&self) -> &Array2<bool> {
        &self.matrix
    }

    /// Retained window start bins, ascending
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Number of attribute columns
    pub fn num_attributes(&self) -> usize {
        self.matrix.ncols()
    }

    /// Whether `attribute` occurs in the window starting at `window`
    pub fn contains(&self, window: usize, attribute: usize) -> bool {
        self.matrix
            .get([window, attribute])
            .copied()
            .unwrap_or(false)
    }

    /// Windows containing every attribute of `intent` (the ' operator on
    /// attribute sets)
    pub fn extent_of(&self, intent: &[usize]) -> Vec<usize> {
        self.windows
            .iter()
            .copied()
            .filter(|&w| intent.iter().all(|&a| self.contains(w, a)))
            .collect()
    }

    /// Attributes shared by every window of `extent` (the ' operator on
    /// window sets). The empty extent derives every attribute.
    pub fn intent_of(&self, extent: &[usize]) -> Vec<usize> {
        (0..self.num_attributes())
            .filter(|&a| extent.iter().all(|&w| self.contains(w, a)))
            .collect()
    }

    /// Check the Galois closure of a concept candidate
    pub fn is_closed(&self, intent: &[usize], extent: &[usize]) -> bool {
        self.extent_of(intent) == extent && self.intent_of(extent) == intent
    }
}
