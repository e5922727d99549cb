//! Byte-offset spans into source text.

use text_size::TextSize;

/// A half-open byte range `[start, end)` into a source file.
///
/// Spans are attached to tokens, AST nodes, and failures so that
/// diagnostics can point back at the text that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: TextSize,
    pub end: TextSize,
}

impl Span {
    pub fn new(start: impl Into<TextSize>, end: impl Into<TextSize>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// An empty span at offset zero, for synthesized nodes.
    pub fn empty() -> Self {
        Self {
            start: TextSize::from(0),
            end: TextSize::from(0),
        }
    }

    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: TextSize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The smallest span covering both `self` and `other`.
    pub fn cover(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start.into()..span.end.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_len() {
        let span = Span::new(4u32, 11u32);
        assert_eq!(span.len(), TextSize::from(7));
        assert!(!span.is_empty());
    }

    #[test]
    fn test_empty_span() {
        let span = Span::empty();
        assert!(span.is_empty());
        assert_eq!(span.len(), TextSize::from(0));
    }

    #[test]
    fn test_contains_is_half_open() {
        let span = Span::new(2u32, 5u32);
        assert!(span.contains(TextSize::from(2)));
        assert!(span.contains(TextSize::from(4)));
        assert!(!span.contains(TextSize::from(5)));
    }

    #[test]
    fn test_cover() {
        let a = Span::new(3u32, 6u32);
        let b = Span::new(10u32, 14u32);
        assert_eq!(a.cover(b), Span::new(3u32, 14u32));
        assert_eq!(b.cover(a), Span::new(3u32, 14u32));
    }

    #[test]
    fn test_range_conversion() {
        let span = Span::new(1u32, 9u32);
        let range: std::ops::Range<usize> = span.into();
        assert_eq!(range, 1..9);
    }
}
