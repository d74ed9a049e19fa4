//! Compact range representation for source offsets.
//!
//! Uses `u32` offsets to save memory (8 bytes vs 16 for usize pair).
//! Supports documents up to 4GB in size.

/// Compact byte range into the source text.
///
/// Every token and node records the slice of the source it came from, even
/// when its text was transformed (escape collapsing).
///
/// # Example
/// ```
/// use inkmark::Range;
///
/// let source = "Hello, World!";
/// let range = Range::new(0, 5);
/// assert_eq!(range.text(source), "Hello");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

// Compile-time size verification
const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize values.
    ///
    /// # Panics
    /// Panics in debug mode if values exceed u32::MAX.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Create an empty range at a position.
    #[inline]
    pub const fn empty_at(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Source text covered by this range.
    ///
    /// Returns an empty string when the range does not fall on character
    /// boundaries of `source`.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or_default()
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this range contains a position.
    #[inline]
    pub const fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Smallest range covering both `self` and `other`.
    #[inline]
    pub fn cover(&self, other: Range) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::from_usize(r.start, r.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    #[inline]
    fn from(r: Range) -> Self {
        r.start as usize..r.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_size() {
        assert_eq!(std::mem::size_of::<Range>(), 8);
    }

    #[test]
    fn test_range_text() {
        let source = "Hello, World!";
        assert_eq!(Range::new(0, 5).text(source), "Hello");
        assert_eq!(Range::new(7, 12).text(source), "World");
    }

    #[test]
    fn test_range_text_off_boundary() {
        // 'é' is two bytes; splitting it yields nothing rather than panicking.
        assert_eq!(Range::new(0, 1).text("é"), "");
    }

    #[test]
    fn test_range_empty() {
        let r = Range::empty_at(5);
        assert_eq!(r.len(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_range_contains() {
        let r = Range::new(10, 20);
        assert!(!r.contains(9));
        assert!(r.contains(10));
        assert!(r.contains(19));
        assert!(!r.contains(20));
    }

    #[test]
    fn test_range_cover() {
        let r = Range::new(4, 8).cover(Range::new(2, 6));
        assert_eq!(r, Range::new(2, 8));
    }

    #[test]
    fn test_range_from_std_range() {
        let r: Range = (10usize..20usize).into();
        assert_eq!(r, Range::new(10, 20));
        let back: std::ops::Range<usize> = r.into();
        assert_eq!(back, 10..20);
    }
}
