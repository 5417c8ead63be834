//! Bracket-depth-aware tokenizer shared by both grammars
//!
//! A statement such as `[Customer|name]<>-*[Order]` is split into one token
//! per top-level shape (`[Customer|name]`, `[Order]`) and one token per
//! connector fragment between shapes (`<>-*`). Nested brackets stay inside
//! the enclosing shape token, which is how cluster member lists survive.
//!
//! Escaped brackets (`\[`, `\]`) never change the depth. Inside a token they
//! are held as private-use placeholders so the grammars can look for real
//! brackets; [`Token::text`] and [`unescape`] turn them back into literals.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

pub(crate) const OPEN_PLACEHOLDER: char = '\u{E000}';
pub(crate) const CLOSE_PLACEHOLDER: char = '\u{E001}';

/// One bracketed shape or one connector fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    raw: String,
    span: Range<usize>,
}

impl Token {
    /// Trimmed token text with escaped brackets still held as placeholders.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed token text with escaped brackets restored to `[` and `]`.
    pub fn text(&self) -> String {
        unescape(&self.raw)
    }

    /// Byte range of the untrimmed segment in the original input.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Whitespace-only segments carry no meaning for either grammar.
    pub fn is_blank(&self) -> bool {
        self.raw.is_empty()
    }

    /// True for a `[...]` shape token.
    pub fn is_shape(&self) -> bool {
        self.raw.len() >= 2 && self.raw.starts_with('[') && self.raw.ends_with(']')
    }

    /// True for a statement separator: commas only, or a `//` comment.
    pub fn is_separator(&self) -> bool {
        if self.raw.is_empty() {
            return false;
        }
        let stripped = self.raw.trim_matches(|c: char| c == ',' || c.is_whitespace());
        stripped.is_empty() || stripped.starts_with("//")
    }
}

/// Restore escape placeholders to literal brackets.
pub fn unescape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            OPEN_PLACEHOLDER => '[',
            CLOSE_PLACEHOLDER => ']',
            other => other,
        })
        .collect()
}

/// Split `input` into bracket-respecting tokens.
///
/// The iterator makes a single forward pass. Every segment of the input lands
/// in exactly one token span, so the spans concatenate back to the input.
pub fn tokenize(input: &str) -> Tokens<'_> {
    Tokens {
        input,
        chars: input.char_indices().peekable(),
        depth: 0,
        word: String::new(),
        start: 0,
        done: false,
    }
}

/// Turn multi-line source into the comma-separated form the grammars read.
///
/// Each line becomes its own statement; `//` comment lines become empty
/// separators so brackets inside comments never produce shapes.
pub fn normalize_lines(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .map(|line| if line.starts_with("//") { "" } else { line })
        .collect::<Vec<_>>()
        .join(",")
}

/// Iterator returned by [`tokenize`].
pub struct Tokens<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    depth: isize,
    word: String,
    start: usize,
    done: bool,
}

impl Tokens<'_> {
    fn flush(&mut self, end: usize) -> Token {
        let token = Token {
            raw: self.word.trim().to_string(),
            span: self.start..end,
        };
        self.word.clear();
        self.start = end;
        token
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }

        while let Some((i, c)) = self.chars.next() {
            match c {
                '\\' => match self.chars.peek() {
                    Some(&(_, '[')) => {
                        self.chars.next();
                        self.word.push(OPEN_PLACEHOLDER);
                    }
                    Some(&(_, ']')) => {
                        self.chars.next();
                        self.word.push(CLOSE_PLACEHOLDER);
                    }
                    _ => self.word.push(c),
                },
                '[' => {
                    self.depth += 1;
                    if self.depth == 1 && i > self.start {
                        let token = self.flush(i);
                        self.word.push(c);
                        return Some(token);
                    }
                    self.word.push(c);
                }
                ']' => {
                    self.depth -= 1;
                    self.word.push(c);
                    if self.depth == 0 {
                        return Some(self.flush(i + c.len_utf8()));
                    }
                }
                _ => self.word.push(c),
            }
        }

        self.done = true;
        if self.start < self.input.len() {
            Some(self.flush(self.input.len()))
        } else {
            None
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}
