//! Shared text utilities

use unicode_width::UnicodeWidthStr;

/// Wrap text to `max_width` display columns, breaking on whitespace.
///
/// Words longer than `max_width` are never broken; they get a line of their
/// own. Blank input produces no lines.
///
/// # Example
/// ```
/// use suml::core::wrap_label;
///
/// let lines = wrap_label("This is a long label", 10);
/// assert_eq!(lines, vec!["This is a", "long label"]);
/// ```
pub fn wrap_label(label: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in label.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);

        if current_width == 0 {
            current_line = word.to_string();
            current_width = word_width;
        } else if max_width == 0 || current_width + 1 + word_width <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_width = word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_label() {
        assert_eq!(wrap_label("Hello", 20), vec!["Hello"]);
    }

    #[test]
    fn test_wrap_long_label() {
        assert_eq!(wrap_label("This is a long label", 10), vec!["This is a", "long label"]);
    }

    #[test]
    fn test_long_word_is_not_broken() {
        assert_eq!(
            wrap_label("a supercalifragilistic word", 8),
            vec!["a", "supercalifragilistic", "word"]
        );
    }

    #[test]
    fn test_wrap_empty_label() {
        assert!(wrap_label("", 10).is_empty());
        assert!(wrap_label("   ", 10).is_empty());
    }

    #[test]
    fn test_wrap_unicode() {
        let result = wrap_label("日本 語テスト", 6);
        assert_eq!(result, vec!["日本", "語テスト"]);
    }
}
