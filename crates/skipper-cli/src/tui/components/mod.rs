//! Reusable rendering pieces.

pub mod scrollbar;
pub mod spinner;
pub mod status_bar;

pub use scrollbar::render_scrollbar;
pub use spinner::spinner_frame;
pub use status_bar::render_status_bar;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Clip `text` to `max_width` terminal columns, ending with an ellipsis
/// when anything was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_leaves_short_text_alone() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_clips_with_ellipsis() {
        assert_eq!(truncate_to_width("hello world", 8), "hello w…");
        assert_eq!(truncate_to_width("hello", 1), "…");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn test_truncate_respects_wide_characters() {
        // each CJK glyph is two columns wide
        let clipped = truncate_to_width("日本語テキスト", 5);
        assert_eq!(clipped, "日本…");
    }
}
