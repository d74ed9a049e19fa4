//! Token types produced by the lexer.

use crate::Range;

/// Token kinds.
///
/// Punctuation tokens are a single character, except backtick runs and
/// fence runs, which are kept whole so their length can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of non-whitespace, non-punctuation characters (escapes collapsed
    /// outside literal modes).
    Characters,
    /// One line ending (`\n`, `\r\n` or `\r`).
    Newline,
    /// Run of non-newline whitespace.
    Whitespace,
    /// ASCII punctuation.
    Punctuation,
    /// Validated `&name;`, `&#123;` or `&#x1F;` reference.
    CharacterReference,
    /// A backslash directly before a line ending.
    HardBreak,
    /// Force-consumed input that no builder accepted.
    Unclassified,
    /// Synthetic end marker, always last.
    Eof,
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Token text. Equal to the source slice except where a backslash
    /// escape was collapsed or a replacement character was substituted.
    pub text: String,
    /// Source bytes this token covers.
    pub range: Range,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, range: Range) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    /// Punctuation token consisting of exactly `ch`.
    #[inline]
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punctuation && self.text.len() == ch.len_utf8() && self.text.starts_with(ch)
    }

    /// Punctuation token made of one or more `ch`.
    #[inline]
    pub fn is_punct_run_of(&self, ch: char) -> bool {
        self.kind == TokenKind::Punctuation && !self.text.is_empty() && self.text.chars().all(|c| c == ch)
    }

    /// Text is exactly the source it covers: no collapsed escape, no
    /// substituted character.
    #[inline]
    pub fn is_verbatim(&self) -> bool {
        self.range.len() as usize == self.text.len()
    }

    #[inline]
    pub fn is_line_end(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::Eof)
    }

    #[inline]
    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    #[inline]
    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }
}
