//! Text Measurement
//!
//! Measures text in terminal cells for chip and caret sizing.
//!
//! - ASCII printable: 1 cell
//! - CJK / fullwidth: 2 cells
//! - Emoji sequences (ZWJ, skin tones, flags): 2 cells
//! - Combining marks and control characters: 0 cells
//!
//! Uses `unicode-width` for East Asian Width and `unicode-segmentation`
//! for grapheme cluster boundaries, so nothing is ever split mid-cluster.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::types::Size;

/// Display width of a single codepoint in terminal cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    // Terminals render these emoji ranges wide even where the tables say 1.
    match c as u32 {
        0x2600..=0x27BF => 2,
        0x1F300..=0x1F5FF => 2,
        0x1F600..=0x1F64F => 2,
        0x1F680..=0x1F6FF => 2,
        0x1F900..=0x1F9FF => 2,
        0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0) as u16,
    }
}

/// Display width of a grapheme cluster in terminal cells.
pub fn grapheme_width(grapheme: &str) -> u16 {
    let mut chars = grapheme.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return 0,
    };

    if grapheme.len() == first.len_utf8() {
        return char_width(first);
    }

    // Regional indicator pair (flag)
    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }

    for c in chars {
        match c as u32 {
            0x200D | 0xFE0F | 0x20E3 => return 2,
            0x1F3FB..=0x1F3FF => return 2,
            _ => {}
        }
    }

    char_width(first)
}

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    if s.is_empty() {
        return 0;
    }

    if s.is_ascii() {
        let count = s.bytes().filter(|&b| (0x20..0x7F).contains(&b)).count();
        return count.min(u16::MAX as usize) as u16;
    }

    s.graphemes(true)
        .fold(0u16, |acc, g| acc.saturating_add(grapheme_width(g)))
}

/// Size of a single-line label. Empty text still occupies one line.
pub fn measure_line(text: &str) -> Size {
    Size::new(string_width(text), 1)
}

/// Truncate text to fit within `max_width` cells, ending in `…` when cut.
pub fn truncate_text(text: &str, max_width: u16) -> String {
    if max_width == 0 {
        return String::new();
    }
    if string_width(text) <= max_width {
        return text.to_string();
    }

    let target = max_width - 1;
    let mut result = String::with_capacity(text.len());
    let mut width = 0u16;
    for grapheme in text.graphemes(true) {
        let gw = grapheme_width(grapheme);
        if width + gw > target {
            break;
        }
        result.push_str(grapheme);
        width += gw;
    }
    result.push('…');
    result
}

/// Remove the last grapheme cluster. Returns false on empty input.
pub fn pop_grapheme(text: &mut String) -> bool {
    match text.grapheme_indices(true).next_back() {
        Some((start, _)) => {
            text.truncate(start);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a b c"), 5);
    }

    #[test]
    fn test_string_width_control_chars() {
        assert_eq!(string_width("\t"), 0);
        assert_eq!(string_width("a\tb"), 2);
    }

    #[test]
    fn test_string_width_wide() {
        assert_eq!(string_width("你好"), 4);
        assert_eq!(string_width("😀"), 2);
        assert_eq!(string_width("e\u{0301}"), 1);
        assert_eq!(string_width("👨\u{200D}👩\u{200D}👧"), 2);
    }

    #[test]
    fn test_measure_line() {
        assert_eq!(measure_line("tag"), Size::new(3, 1));
        assert_eq!(measure_line(""), Size::new(0, 1));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("hello", 4), "hel…");
        assert_eq!(truncate_text("hello", 0), "");
    }

    #[test]
    fn test_truncate_wide_never_splits() {
        // "你" is 2 wide, target 2 leaves room for just one.
        assert_eq!(truncate_text("你好世界", 3), "你…");
    }

    #[test]
    fn test_pop_grapheme() {
        let mut s = String::from("ae\u{0301}");
        assert!(pop_grapheme(&mut s));
        assert_eq!(s, "a");
        assert!(pop_grapheme(&mut s));
        assert!(!pop_grapheme(&mut s));
    }
}
