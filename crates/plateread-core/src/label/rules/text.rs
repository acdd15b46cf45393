//! Character-indexed text helpers shared by the extractors.
//!
//! Positions are counted in characters, not bytes.

/// Whitespace or control character (code point <= 32).
pub fn is_boundary(c: char) -> bool {
    (c as u32) <= 32
}

/// Everything before the first whitespace or control character.
pub fn truncate_at_first_whitespace(text: &str) -> &str {
    match text.find(is_boundary) {
        Some(end) => &text[..end],
        None => text,
    }
}

/// Character index of the first occurrence of `needle`.
pub fn char_index_of(text: &str, needle: &str) -> Option<usize> {
    text.find(needle).map(|byte| text[..byte].chars().count())
}

/// Text from character `start` onward; empty when `start` is past the end.
pub fn substring_from(text: &str, start: usize) -> &str {
    match text.char_indices().nth(start) {
        Some((byte, _)) => &text[byte..],
        None => "",
    }
}

/// `index + skip`, where a missing index counts as -1.
pub fn offset_from(index: Option<usize>, skip: usize) -> usize {
    match index {
        Some(index) => index + skip,
        None => skip.saturating_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_at_first_whitespace() {
        assert_eq!(truncate_at_first_whitespace("abc def"), "abc");
        assert_eq!(truncate_at_first_whitespace("noSpaceHere"), "noSpaceHere");
        assert_eq!(truncate_at_first_whitespace(""), "");
        assert_eq!(truncate_at_first_whitespace("12345\nEXTRA"), "12345");
        assert_eq!(truncate_at_first_whitespace("a\u{7}b"), "a");
        assert_eq!(truncate_at_first_whitespace(" leading"), "");
    }

    #[test]
    fn test_is_boundary() {
        assert!(is_boundary(' '));
        assert!(is_boundary('\t'));
        assert!(is_boundary('\0'));
        assert!(!is_boundary('!'));
        // Non-breaking space is above the cutoff.
        assert!(!is_boundary('\u{a0}'));
    }

    #[test]
    fn test_char_positions() {
        assert_eq!(char_index_of("ÉTÉ TM", "TM"), Some(4));
        assert_eq!(char_index_of("abc", "TM"), None);
        assert_eq!(substring_from("ÉTÉ TM", 4), "TM");
        assert_eq!(substring_from("abc", 10), "");
    }

    #[test]
    fn test_offset_from_missing_index() {
        assert_eq!(offset_from(Some(3), 7), 10);
        assert_eq!(offset_from(None, 7), 6);
    }
}
