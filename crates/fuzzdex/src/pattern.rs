//! Derived pattern record shared by the backing matchers.

/// The immutable pattern a fuzzy enumeration runs against.
///
/// Splits the pattern text into the literal prefix every match must carry
/// and the suffix the edit distance applies to. The requested prefix length
/// may exceed the pattern length; it is clamped, which degenerates to exact
/// prefix matching of the whole pattern.
#[derive(Debug)]
pub(crate) struct Pattern {
    bytes: Vec<u8>,
    char_len: usize,
    prefix_len: usize,
    prefix_bytes: Vec<u8>,
    suffix: String,
}

impl Pattern {
    pub(crate) fn new(text: &str, requested_prefix_len: usize) -> Self {
        let char_len = text.chars().count();
        let prefix_len = requested_prefix_len.min(char_len);
        let split = text
            .char_indices()
            .nth(prefix_len)
            .map_or(text.len(), |(byte_idx, _)| byte_idx);
        Self {
            bytes: text.as_bytes().to_vec(),
            char_len,
            prefix_len,
            prefix_bytes: text.as_bytes()[..split].to_vec(),
            suffix: text[split..].to_string(),
        }
    }

    /// UTF-8 encoding of the full pattern.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pattern length in Unicode scalar values.
    pub(crate) fn char_len(&self) -> usize {
        self.char_len
    }

    /// Clamped literal prefix length, in scalar values.
    pub(crate) fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// UTF-8 encoding of the literal prefix.
    pub(crate) fn prefix_bytes(&self) -> &[u8] {
        &self.prefix_bytes
    }

    /// The pattern text after the literal prefix.
    pub(crate) fn suffix(&self) -> &str {
        &self.suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_prefix_and_suffix() {
        let pattern = Pattern::new("hello", 2);
        assert_eq!(pattern.bytes(), b"hello");
        assert_eq!(pattern.char_len(), 5);
        assert_eq!(pattern.prefix_len(), 2);
        assert_eq!(pattern.prefix_bytes(), b"he");
        assert_eq!(pattern.suffix(), "llo");
    }

    #[test]
    fn zero_prefix() {
        let pattern = Pattern::new("hello", 0);
        assert_eq!(pattern.prefix_bytes(), b"");
        assert_eq!(pattern.suffix(), "hello");
    }

    #[test]
    fn prefix_longer_than_pattern_is_clamped() {
        let pattern = Pattern::new("foo", 10);
        assert_eq!(pattern.prefix_len(), 3);
        assert_eq!(pattern.prefix_bytes(), b"foo");
        assert_eq!(pattern.suffix(), "");
    }

    #[test]
    fn multibyte_prefix_split_lands_on_char_boundary() {
        let pattern = Pattern::new("café au lait", 4);
        assert_eq!(pattern.prefix_bytes(), "café".as_bytes());
        assert_eq!(pattern.suffix(), " au lait");
        assert_eq!(pattern.char_len(), 12);
    }

    #[test]
    fn empty_pattern() {
        let pattern = Pattern::new("", 3);
        assert_eq!(pattern.char_len(), 0);
        assert_eq!(pattern.prefix_len(), 0);
        assert_eq!(pattern.suffix(), "");
    }
}
