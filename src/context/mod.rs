//! Sliding-window context construction.
//!
//! This module provides:
//! - Attribute encoding of (stream, offset) pairs
//! - The relation matrix between windows and attributes
//! - Context building from a binned stream x bin matrix

mod builder;
mod relation;

pub use builder::{Context, ContextBuilder};
pub use relation::RelationMatrix;

use thiserror::Error;

/// Errors raised while building a context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Window length must be at least 1 bin, got {0}")]
    InvalidWindowLength(usize),
}

/// Encode a spike of `stream` at `offset` bins into the window
#[inline]
pub fn attribute(stream: usize, offset: usize, win_len: usize) -> usize {
    stream * win_len + offset
}

/// Stream index of an attribute
#[inline]
pub fn stream_of(attribute: usize, win_len: usize) -> usize {
    attribute / win_len
}

/// Offset (bins from the window start) of an attribute
#[inline]
pub fn offset_of(attribute: usize, win_len: usize) -> usize {
    attribute % win_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_encoding() {
        let a = attribute(3, 2, 5);
        assert_eq!(a, 17);
        assert_eq!(stream_of(a, 5), 3);
        assert_eq!(offset_of(a, 5), 2);
    }
}
