//! Mode-stack tokenizer.
//!
//! Turns source text into a flat token sequence, always ending with a
//! single `Eof` token. At each position the builders in
//! [`TokenBuilder::ORDER`] are tried in turn; the first that accepts wins.
//! The active [`Mode`] changes what the builders accept:
//! - `Code` keeps backslashes and ampersands literal
//! - `Html` and `Autolink` keep backslash escapes verbatim
//!
//! Input that no builder accepts (only U+0000 today) is recorded as a
//! lexical error and force-consumed as an `Unclassified` token, so the
//! tokenizer always terminates and never loses input.

mod builders;
mod cursor;
mod mode;
mod runs;
mod token;

pub use builders::TokenBuilder;
pub use cursor::Cursor;
pub use mode::{Mode, ModeStack};
pub use token::{Token, TokenKind};

use crate::{ParseError, Range};
use runs::BacktickRuns;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    pub ch: u8,
    pub len: usize,
}

/// Mutable state shared by the builders.
#[derive(Debug)]
pub struct LexState {
    pub(crate) modes: ModeStack,
    /// Mode to enter at the next line ending (a fence's info string comes first).
    pub(crate) pending_mode: Option<Mode>,
    pub(crate) in_fenced_code: bool,
    pub(crate) fence: Option<Fence>,
    /// Length of the backtick run that closes the current code span.
    pub(crate) code_span_len: usize,
    /// Offset just past the `>` that ends the current HTML or autolink context.
    pub(crate) angle_end: Option<usize>,
    pub(crate) runs: BacktickRuns,
}

impl LexState {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            modes: ModeStack::new(),
            pending_mode: None,
            in_fenced_code: false,
            fence: None,
            code_span_len: 0,
            angle_end: None,
            runs: BacktickRuns::index(source),
        }
    }
}

/// Tokenizer over one source string.
pub struct Lexer<'a> {
    source: &'a str,
    state: LexState,
    errors: Vec<ParseError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            state: LexState::new(source),
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole source.
    ///
    /// The token ranges tile the source: each starts where the previous one
    /// ended, and the final `Eof` sits at `source.len()`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.source.len() / 4 + 1);
        let mut cursor = Cursor::new(self.source);

        while !cursor.is_eof() {
            let matched = TokenBuilder::ORDER
                .iter()
                .any(|builder| builder.build(&mut cursor, &mut self.state, &mut tokens));
            if !matched {
                self.force_consume(&mut cursor, &mut tokens);
            }
        }

        let end = self.source.len();
        tokens.push(Token::new(TokenKind::Eof, "", Range::empty_at(end as u32)));
        tokens
    }

    fn force_consume(&mut self, cursor: &mut Cursor<'_>, tokens: &mut Vec<Token>) {
        let start = cursor.offset();
        let Some(found) = cursor.bump() else {
            return;
        };
        log::debug!(target: "inkmark::lexer", "no token builder matched {found:?} at byte {start}");
        self.errors.push(ParseError::Lexical {
            offset: start as u32,
            found,
        });
        let text = if found == '\0' { '\u{FFFD}' } else { found };
        tokens.push(Token::new(
            TokenKind::Unclassified,
            text.to_string(),
            Range::from_usize(start, cursor.offset()),
        ));
    }

    /// Current mode stack.
    pub fn modes(&self) -> &ModeStack {
        &self.state.modes
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}

/// Tokenize `source`, returning the tokens and any lexical errors.
///
/// # Example
/// ```
/// use inkmark::{tokenize, TokenKind};
///
/// let (tokens, errors) = tokenize("*hi*");
/// assert!(errors.is_empty());
/// assert_eq!(tokens.len(), 4);
/// assert_eq!(tokens[1].kind, TokenKind::Characters);
/// assert_eq!(tokens[3].kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<ParseError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();
    (tokens, lexer.into_errors())
}
