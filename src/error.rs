//! Recoverable parse errors.
//!
//! Neither phase aborts: errors are collected next to a best-effort result.

use crate::lexer::TokenKind;

/// An error recorded while tokenizing or building inline nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No token builder matched; one character was force-consumed.
    #[error("no token builder matched {found:?} at byte {offset}")]
    Lexical { offset: u32, found: char },

    /// No inline builder accepted the token; it was skipped.
    #[error("no inline builder accepted {kind:?} token #{index}")]
    Construction { index: usize, kind: TokenKind },
}

impl ParseError {
    /// Whether this error came from the tokenizer.
    pub fn is_lexical(&self) -> bool {
        matches!(self, ParseError::Lexical { .. })
    }
}
