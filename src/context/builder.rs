//! Context construction from binned spike trains.

use super::{attribute, ContextError, RelationMatrix};
use ndarray::Array2;
use tracing::debug;

/// The formal context of a binned dataset.
///
/// Objects are window positions, attributes are `(stream, offset)` pairs
/// encoded as `stream * win_len + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    win_len: usize,
    num_streams: usize,
    num_bins: usize,
    /// Window start bins, ascending
    windows: Vec<usize>,
    /// Attributes of each window, aligned with `windows`
    transactions: Vec<Vec<usize>>,
    /// (window, attribute) incidence pairs
    pairs: Vec<(usize, usize)>,
    relation: RelationMatrix,
}

impl Context {
    /// Window length in bins
    pub fn win_len(&self) -> usize {
        self.win_len
    }

    /// Number of streams of the binned input
    pub fn num_streams(&self) -> usize {
        self.num_streams
    }

    /// Number of bins of the binned input
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Number of distinct attributes (`num_streams * win_len`)
    pub fn num_attributes(&self) -> usize {
        self.num_streams * self.win_len
    }

    /// Retained window start bins
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Number of retained windows
    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    /// Number of windows holding at least one attribute
    pub fn num_nonempty_windows(&self) -> usize {
        self.transactions.iter().filter(|t| !t.is_empty()).count()
    }

    /// Attributes of each retained window (sorted)
    pub fn transactions(&self) -> &[Vec<usize>] {
        &self.transactions
    }

    /// (window, attribute) incidence pairs
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Window x attribute relation matrix
    pub fn relation(&self) -> &RelationMatrix {
        &self.relation
    }

    /// Whether the context holds no incidence at all
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Builds a [`Context`] from a boolean stream x bin matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBuilder {
    win_len: usize,
    all_windows: bool,
}

impl ContextBuilder {
    /// Create a builder for windows of `win_len` bins
    pub fn new(win_len: usize) -> Self {
        Self {
            win_len,
            all_windows: false,
        }
    }

    /// Keep every window position instead of only windows whose first bin
    /// holds a spike
    pub fn all_windows(mut self, all: bool) -> Self {
        self.all_windows = all;
        self
    }

    /// Build the context.
    ///
    /// By default only windows starting with a spike are retained: any
    /// configuration in a later-starting window reappears, shifted, in the
    /// window opened by its own first spike.
    pub fn build(&self, matrix: &Array2<bool>) -> Result<Context, ContextError> {
        if self.win_len == 0 {
            return Err(ContextError::InvalidWindowLength(self.win_len));
        }
        let (num_streams, num_bins) = matrix.dim();
        let win_len = self.win_len;

        // Streams firing in each bin
        let active: Vec<Vec<usize>> = (0..num_bins)
            .map(|bin| {
                (0..num_streams)
                    .filter(|&stream| matrix[[stream, bin]])
                    .collect()
            })
            .collect();

        let windows: Vec<usize> = if self.all_windows {
            (0..(num_bins + 1).saturating_sub(win_len)).collect()
        } else {
            (0..num_bins).filter(|&bin| !active[bin].is_empty()).collect()
        };

        let mut relation = Array2::from_elem((num_bins, num_streams * win_len), false);
        for &window in &windows {
            for offset in 0..win_len {
                let bin = window + offset;
                if bin >= num_bins {
                    break;
                }
                for &stream in &active[bin] {
                    relation[[window, attribute(stream, offset, win_len)]] = true;
                }
            }
        }

        let mut transactions = Vec::with_capacity(windows.len());
        let mut pairs = Vec::new();
        for &window in &windows {
            let items: Vec<usize> = relation
                .row(window)
                .iter()
                .enumerate()
                .filter_map(|(a, &set)| set.then_some(a))
                .collect();
            pairs.extend(items.iter().map(|&a| (window, a)));
            transactions.push(items);
        }

        debug!(
            windows = windows.len(),
            pairs = pairs.len(),
            "built context"
        );

        Ok(Context {
            win_len,
            num_streams,
            num_bins,
            relation: RelationMatrix::new(relation, windows.clone()),
            windows,
            transactions,
            pairs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn matrix() -> Array2<bool> {
        // 2 streams x 6 bins
        array![
            [true, false, false, true, false, false],
            [false, true, false, false, false, true],
        ]
    }

    #[test]
    fn test_windows_start_with_spike() {
        let ctx = ContextBuilder::new(2).build(&matrix()).unwrap();

        assert_eq!(ctx.windows(), &[0, 1, 3, 5]);
        // window 0: stream0@0, stream1@1 -> attributes 0 and 3
        assert_eq!(ctx.transactions()[0], vec![0, 3]);
        // window 1: stream1@0 -> attribute 2
        assert_eq!(ctx.transactions()[1], vec![2]);
        // window 5 truncated at the end of the data
        assert_eq!(ctx.transactions()[3], vec![2]);
        assert!(ctx.pairs().contains(&(3, 0)));
        assert_eq!(ctx.relation().matrix().dim(), (6, 4));
    }

    #[test]
    fn test_every_row_of_retained_window_nonempty() {
        let ctx = ContextBuilder::new(3).build(&matrix()).unwrap();
        for (w, items) in ctx.windows().iter().zip(ctx.transactions()) {
            assert!(!items.is_empty(), "window {} is empty", w);
        }
        assert_eq!(ctx.num_nonempty_windows(), ctx.num_windows());
    }

    #[test]
    fn test_all_windows() {
        let ctx = ContextBuilder::new(2)
            .all_windows(true)
            .build(&matrix())
            .unwrap();
        assert_eq!(ctx.windows(), &[0, 1, 2, 3, 4]);
        // window 4 holds only stream1@1
        assert_eq!(ctx.transactions()[4], vec![3]);
    }

    #[test]
    fn test_empty_and_invalid() {
        let empty = Array2::from_elem((3, 10), false);
        let ctx = ContextBuilder::new(3).build(&empty).unwrap();
        assert!(ctx.is_empty());
        assert_eq!(ctx.num_windows(), 0);

        assert_eq!(
            ContextBuilder::new(0).build(&empty).unwrap_err(),
            ContextError::InvalidWindowLength(0)
        );
    }
}
