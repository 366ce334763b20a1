//! Sanitizing history text for terminal display
//!
//! Query and result text comes from whatever the user typed or pasted and
//! from external engines. Escape sequences in it must never reach the
//! terminal, both in `list` output and in the interactive browser.

/// Strips ANSI CSI escape sequences and stray control characters
///
/// Tab, newline and carriage return are kept.
///
/// # Examples
///
/// ```
/// use query_history::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mrouge\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "rouge");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI runs until its final letter
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Single-line preview of `text`: sanitized, whitespace runs collapsed,
/// cut to `max_chars` with a trailing ellipsis when shortened.
pub fn preview_line(text: &str, max_chars: usize) -> String {
    let clean = strip_ansi_codes(text);
    let collapsed = clean.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes_color() {
        let text = "\x1b[31mRed text\x1b[0m normal";
        assert_eq!(strip_ansi_codes(text), "Red text normal");
    }

    #[test]
    fn test_strip_ansi_codes_cursor_movement() {
        let text = "\x1b[2J\x1b[H Cleared screen";
        assert_eq!(strip_ansi_codes(text), " Cleared screen");
    }

    #[test]
    fn test_strip_ansi_codes_bell_and_backspace() {
        assert_eq!(strip_ansi_codes("Alert! \x07"), "Alert! ");
        assert_eq!(strip_ansi_codes("Test\x08"), "Test");
    }

    #[test]
    fn test_strip_ansi_codes_preserves_newlines() {
        let text = "Line 1\nLine 2\rLine 3\tTabbed";
        assert_eq!(strip_ansi_codes(text), text);
    }

    #[test]
    fn test_strip_ansi_codes_unicode() {
        let text = "你好 \x1b[31m世界\x1b[0m 🌍";
        assert_eq!(strip_ansi_codes(text), "你好 世界 🌍");
    }

    #[test]
    fn test_preview_line_collapses_whitespace() {
        assert_eq!(preview_line("hello\n  world\t!", 40), "hello world !");
    }

    #[test]
    fn test_preview_line_truncates() {
        assert_eq!(preview_line("abcdefghij", 5), "abcd…");
        assert_eq!(preview_line("abcde", 5), "abcde");
    }

    #[test]
    fn test_preview_line_counts_chars_not_bytes() {
        assert_eq!(preview_line("日本語のテキスト", 4), "日本語…");
    }
}
