//! Position cursor over the source text.
//!
//! A plain offset into a `&str`; copying it is how builders save and
//! restore their position.

/// A cursor for scanning UTF-8 source.
///
/// # Example
/// ```
/// use inkmark::lexer::Cursor;
///
/// let mut cursor = Cursor::new("Hello, World!");
/// assert_eq!(cursor.peek(), Some('H'));
/// cursor.advance(7);
/// assert_eq!(cursor.peek(), Some('W'));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Peek the current character without advancing.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek the current byte.
    #[inline]
    pub fn peek_byte(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    /// Peek at byte n positions ahead.
    #[inline]
    pub fn peek_byte_ahead(&self, n: usize) -> Option<u8> {
        self.bytes().get(self.pos + n).copied()
    }

    /// Character immediately before the cursor.
    #[inline]
    pub fn prev(&self) -> Option<char> {
        self.source[..self.pos].chars().next_back()
    }

    /// Advance by n bytes. `n` must land on a character boundary.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.source.is_char_boundary(self.pos + n));
        self.pos += n;
    }

    /// Consume and return the current character.
    #[inline]
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume characters while `pred` holds; returns the number of bytes consumed.
    #[inline]
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.pos - start
    }

    /// Length of the run of byte `b` starting at the cursor.
    #[inline]
    pub fn run_len(&self, b: u8) -> usize {
        self.bytes()[self.pos..].iter().take_while(|&&x| x == b).count()
    }

    /// Whether the cursor sits at the start of a line, after at most
    /// three spaces of indentation.
    pub fn at_line_start(&self) -> bool {
        let before = &self.bytes()[..self.pos];
        let indent = before.iter().rev().take(4).take_while(|&&b| b == b' ').count();
        if indent > 3 {
            return false;
        }
        let at = before.len() - indent;
        at == 0 || matches!(before[at - 1], b'\n' | b'\r')
    }
}
