//! Genomic ranges.
//!
//! A [`Range`] is a 1-based, inclusive interval on a sequence, the coordinate
//! system used by GFF3. A range always satisfies `start <= end`.

use std::fmt;

/// A 1-based inclusive interval `[start, end]` on a sequence.
///
/// # Examples
///
/// ```
/// use annosketch_core::range::Range;
///
/// let gene = Range::new(1000, 1999).unwrap();
/// assert_eq!(gene.length(), 1000);
/// assert!(gene.overlaps(Range::new(1999, 2500).unwrap()));
/// assert!(Range::new(10, 5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    start: u64,
    end: u64,
}

impl Range {
    /// Creates a new range, rejecting `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self, String> {
        if start > end {
            return Err(format!("range start {start} is greater than end {end}"));
        }
        Ok(Self { start, end })
    }

    /// Returns the first position of the range.
    pub fn start(self) -> u64 {
        self.start
    }

    /// Returns the last position of the range.
    pub fn end(self) -> u64 {
        self.end
    }

    /// Number of positions covered, counting both ends.
    pub fn length(self) -> u64 {
        self.end - self.start + 1
    }

    /// Returns `true` if the two ranges share at least one position.
    pub fn overlaps(self, other: Range) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns `true` if `other` lies completely within this range.
    pub fn contains(self, other: Range) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Returns `true` if `pos` lies within this range.
    pub fn contains_position(self, pos: u64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Smallest range covering both ranges.
    pub fn join(self, other: Range) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_new_rejects_inverted() {
        assert!(Range::new(5, 4).is_err());
        assert!(Range::new(5, 5).is_ok());
    }

    #[test]
    fn test_range_length_is_inclusive() {
        assert_eq!(Range::new(1, 1).unwrap().length(), 1);
        assert_eq!(Range::new(100, 199).unwrap().length(), 100);
    }

    #[test]
    fn test_range_overlaps_at_shared_endpoint() {
        let a = Range::new(1, 10).unwrap();
        let b = Range::new(10, 20).unwrap();
        let c = Range::new(11, 20).unwrap();

        assert!(a.overlaps(b));
        assert!(b.overlaps(a));
        assert!(!a.overlaps(c));
    }

    #[test]
    fn test_range_contains() {
        let outer = Range::new(1, 100).unwrap();
        assert!(outer.contains(Range::new(1, 100).unwrap()));
        assert!(outer.contains(Range::new(20, 30).unwrap()));
        assert!(!outer.contains(Range::new(90, 101).unwrap()));
        assert!(outer.contains_position(100));
        assert!(!outer.contains_position(0));
    }

    #[test]
    fn test_range_join() {
        let joined = Range::new(50, 60).unwrap().join(Range::new(10, 20).unwrap());
        assert_eq!(joined, Range::new(10, 60).unwrap());
    }

    #[test]
    fn test_range_display() {
        assert_eq!(Range::new(3, 7).unwrap().to_string(), "3..7");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn range_strategy() -> impl Strategy<Value = Range> {
        (1u64..10_000, 0u64..5_000)
            .prop_map(|(start, len)| Range::new(start, start + len).expect("start <= end"))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in range_strategy(), b in range_strategy()) {
            prop_assert_eq!(a.overlaps(b), b.overlaps(a));
        }

        #[test]
        fn join_contains_both(a in range_strategy(), b in range_strategy()) {
            let joined = a.join(b);
            prop_assert!(joined.contains(a));
            prop_assert!(joined.contains(b));
        }
    }
}
