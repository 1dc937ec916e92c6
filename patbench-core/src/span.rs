//! Index Spans
//!
//! A half-open `[first, last)` pair of indices into a sequence owned
//! elsewhere. Splitting a span never copies or aliases the sequence.

use crate::error::PatternError;

/// Half-open index range. Invariant: `first <= last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    first: usize,
    last: usize,
}

impl Span {
    /// Build a span, rejecting `first > last`
    pub fn new(first: usize, last: usize) -> Result<Self, PatternError> {
        if first > last {
            return Err(PatternError::InvalidRange { first, last });
        }
        Ok(Self { first, last })
    }

    /// Span covering a whole sequence of `len` elements
    pub fn full(len: usize) -> Self {
        Self { first: 0, last: len }
    }

    /// First index (inclusive)
    pub fn first(&self) -> usize {
        self.first
    }

    /// Last index (exclusive)
    pub fn last(&self) -> usize {
        self.last
    }

    /// Number of elements covered
    pub fn size(&self) -> usize {
        self.last - self.first
    }

    /// Whether the span covers no elements
    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }

    /// Split at `mid = first + size / 2` into `[first, mid)` and `[mid, last)`
    pub fn split(&self) -> (Span, Span) {
        let mid = self.first + self.size() / 2;
        debug_assert!(self.first <= mid && mid <= self.last);
        (
            Span {
                first: self.first,
                last: mid,
            },
            Span {
                first: mid,
                last: self.last,
            },
        )
    }

    /// View of `seq` covered by this span
    pub fn slice<'a, T>(&self, seq: &'a [T]) -> &'a [T] {
        &seq[self.first..self.last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_range() {
        assert_eq!(
            Span::new(5, 2),
            Err(PatternError::InvalidRange { first: 5, last: 2 })
        );
        assert!(Span::new(3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_split_sizes() {
        let (left, right) = Span::new(0, 5).unwrap().split();
        assert_eq!((left.first(), left.last()), (0, 2));
        assert_eq!((right.first(), right.last()), (2, 5));
        assert_eq!(left.size() + right.size(), 5);

        let (left, right) = Span::new(10, 14).unwrap().split();
        assert_eq!(left.size(), 2);
        assert_eq!(right.size(), 2);
        assert_eq!(left.last(), right.first());
    }

    #[test]
    fn test_slice() {
        let data = [1, 2, 3, 4, 5];
        assert_eq!(Span::new(1, 4).unwrap().slice(&data), &[2, 3, 4]);
        assert_eq!(Span::full(5).slice(&data), &data);
    }
}
