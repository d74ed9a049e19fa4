//! Lexical mode stack.
//!
//! The lexer's record of nested contexts. `Normal` is the permanent base;
//! `Code` suspends entities and escapes, `Html` and `Autolink` suspend
//! escapes. Code spans and tags cannot nest, so the stack stays shallow and
//! lives inline in a `SmallVec`.

use smallvec::{smallvec, SmallVec};

/// A lexical context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Code,
    Html,
    Autolink,
}

impl Mode {
    /// Backslash escapes are preserved verbatim in this mode.
    #[inline]
    pub fn is_literal(self) -> bool {
        self != Mode::Normal
    }
}

/// Stack of modes with a non-removable `Normal` base.
#[derive(Debug, Clone)]
pub struct ModeStack {
    modes: SmallVec<[Mode; 4]>,
}

impl ModeStack {
    pub fn new() -> Self {
        Self {
            modes: smallvec![Mode::Normal],
        }
    }

    #[inline]
    pub fn push(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    /// Pop the top mode. The base mode is never removed.
    #[inline]
    pub fn pop(&mut self) -> Option<Mode> {
        if self.modes.len() > 1 {
            self.modes.pop()
        } else {
            None
        }
    }

    /// Current mode.
    #[inline]
    pub fn peek(&self) -> Option<Mode> {
        self.modes.last().copied()
    }

    /// Current mode, defaulting to the base.
    #[inline]
    pub fn current(&self) -> Mode {
        self.peek().unwrap_or(Mode::Normal)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.modes.len()
    }
}

impl Default for ModeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_mode_survives_pop() {
        let mut stack = ModeStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.current(), Mode::Normal);
    }

    #[test]
    fn test_push_pop() {
        let mut stack = ModeStack::new();
        stack.push(Mode::Html);
        assert_eq!(stack.peek(), Some(Mode::Html));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(Mode::Html));
        assert_eq!(stack.current(), Mode::Normal);
    }

    #[test]
    fn test_literal_modes() {
        assert!(!Mode::Normal.is_literal());
        assert!(Mode::Code.is_literal());
        assert!(Mode::Html.is_literal());
        assert!(Mode::Autolink.is_literal());
    }
}
