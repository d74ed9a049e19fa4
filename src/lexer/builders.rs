//! Token builders.
//!
//! Each builder gets first refusal at the cursor, in [`TokenBuilder::ORDER`].
//! A builder either consumes input and pushes at least one token, or
//! returns `false` having touched nothing: every builder works on a copy
//! of the cursor and commits it only on success.

use super::cursor::Cursor;
use super::mode::Mode;
use super::token::{Token, TokenKind};
use super::LexState;
use crate::classify::{is_ascii_punctuation, is_escapable, is_line_ending, is_whitespace};
use crate::entity::scan_character_reference;
use crate::{limits, scan, Range};

/// The token builders, as a tagged union dispatched by `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBuilder {
    Whitespace,
    Newline,
    CharacterReference,
    Characters,
    Punctuation,
}

impl TokenBuilder {
    /// First match wins. Character references run before punctuation so `&`
    /// gets a chance to start one; characters run before punctuation so a
    /// backslash is handled as an escape.
    pub const ORDER: [TokenBuilder; 5] = [
        TokenBuilder::Whitespace,
        TokenBuilder::Newline,
        TokenBuilder::CharacterReference,
        TokenBuilder::Characters,
        TokenBuilder::Punctuation,
    ];

    /// Try to build token(s) at the cursor.
    pub fn build(self, cursor: &mut Cursor<'_>, state: &mut LexState, out: &mut Vec<Token>) -> bool {
        match self {
            TokenBuilder::Whitespace => build_whitespace(cursor, out),
            TokenBuilder::Newline => build_newline(cursor, state, out),
            TokenBuilder::CharacterReference => build_character_reference(cursor, state, out),
            TokenBuilder::Characters => build_characters(cursor, state, out),
            TokenBuilder::Punctuation => build_punctuation(cursor, state, out),
        }
    }
}

fn push(out: &mut Vec<Token>, kind: TokenKind, text: impl Into<String>, start: usize, end: usize) {
    out.push(Token::new(kind, text, Range::from_usize(start, end)));
}

fn build_whitespace(cursor: &mut Cursor<'_>, out: &mut Vec<Token>) -> bool {
    let mut c = *cursor;
    let start = c.offset();
    if c.eat_while(is_whitespace) == 0 {
        return false;
    }
    push(out, TokenKind::Whitespace, &c.source()[start..c.offset()], start, c.offset());
    *cursor = c;
    true
}

fn build_newline(cursor: &mut Cursor<'_>, state: &mut LexState, out: &mut Vec<Token>) -> bool {
    let start = cursor.offset();
    let len = match (cursor.peek_byte(), cursor.peek_byte_ahead(1)) {
        (Some(b'\r'), Some(b'\n')) => 2,
        (Some(b'\r' | b'\n'), _) => 1,
        _ => return false,
    };
    cursor.advance(len);
    push(out, TokenKind::Newline, &cursor.source()[start..start + len], start, start + len);

    // A fence's info string has ended; its code mode starts now.
    if let Some(mode) = state.pending_mode.take() {
        #[cfg(feature = "trace")]
        log::trace!(target: "inkmark::lexer", "entering deferred {mode:?} mode at byte {}", start + len);
        state.modes.push(mode);
    }
    true
}

fn build_character_reference(cursor: &mut Cursor<'_>, state: &mut LexState, out: &mut Vec<Token>) -> bool {
    if state.modes.current() == Mode::Code || cursor.peek_byte() != Some(b'&') {
        return false;
    }
    let start = cursor.offset();
    let Some(end) = scan_character_reference(cursor.bytes(), start) else {
        return false;
    };
    push(out, TokenKind::CharacterReference, &cursor.source()[start..end], start, end);
    cursor.advance(end - start);
    true
}

fn build_characters(cursor: &mut Cursor<'_>, state: &mut LexState, out: &mut Vec<Token>) -> bool {
    let mode = state.modes.current();
    let mut c = *cursor;
    let start = c.offset();
    let mut text = String::new();

    while let Some(ch) = c.peek() {
        if ch == '\\' {
            let next = c.rest()[1..].chars().next();
            match next {
                Some(n) if is_line_ending(n) => {
                    if mode.is_literal() {
                        text.push('\\');
                        c.advance(1);
                        continue;
                    }
                    // Hard break signal: only the backslash, the line ending
                    // stays for the newline builder.
                    if text.is_empty() {
                        push(out, TokenKind::HardBreak, "\\", start, start + 1);
                        cursor.advance(1);
                        return true;
                    }
                    break;
                }
                Some(n) if mode == Mode::Normal && is_escapable(n) => {
                    text.push(n);
                    c.advance(1 + n.len_utf8());
                }
                Some(n) if mode.is_literal() && !ends_literal_context(mode, n) && !is_whitespace(n) => {
                    text.push('\\');
                    text.push(n);
                    c.advance(1 + n.len_utf8());
                }
                _ => {
                    text.push('\\');
                    c.advance(1);
                }
            }
            continue;
        }
        if ch == '\0' || is_whitespace(ch) || is_line_ending(ch) || (ch.is_ascii() && is_ascii_punctuation(ch as u8)) {
            break;
        }
        text.push(ch);
        c.advance(ch.len_utf8());
    }

    if c.offset() == start {
        return false;
    }
    push(out, TokenKind::Characters, text, start, c.offset());
    *cursor = c;
    true
}

/// Characters a literal-mode backslash must not swallow, because they may
/// close the current context.
#[inline]
fn ends_literal_context(mode: Mode, ch: char) -> bool {
    match mode {
        Mode::Code => ch == '`',
        Mode::Html | Mode::Autolink => ch == '>',
        Mode::Normal => false,
    }
}

fn build_punctuation(cursor: &mut Cursor<'_>, state: &mut LexState, out: &mut Vec<Token>) -> bool {
    let Some(b) = cursor.peek_byte() else {
        return false;
    };
    if !is_ascii_punctuation(b) {
        return false;
    }
    match b {
        b'`' | b'~' => build_fence_or_span(cursor, state, out, b),
        b'<' => {
            open_angle_context(cursor, state);
            push_single(cursor, out);
            true
        }
        b'>' => {
            let pos = cursor.offset();
            if matches!(state.modes.current(), Mode::Html | Mode::Autolink) && state.angle_end == Some(pos + 1) {
                state.modes.pop();
                state.angle_end = None;
            }
            push_single(cursor, out);
            true
        }
        _ => {
            push_single(cursor, out);
            true
        }
    }
}

fn push_single(cursor: &mut Cursor<'_>, out: &mut Vec<Token>) {
    let start = cursor.offset();
    // Only ASCII reaches here, so one byte is one character.
    push(out, TokenKind::Punctuation, &cursor.source()[start..start + 1], start, start + 1);
    cursor.advance(1);
}

/// `<` in normal mode enters an HTML or autolink context, but only when the
/// construct is complete; otherwise the `<` is ordinary punctuation and no
/// state leaks past it. Raw HTML is tried first, as in inline construction.
fn open_angle_context(cursor: &Cursor<'_>, state: &mut LexState) {
    if state.modes.current() != Mode::Normal || state.pending_mode.is_some() {
        return;
    }
    let pos = cursor.offset();
    let bytes = cursor.bytes();
    let entered = if let Some(end) = scan::html_end(bytes, pos) {
        Some((Mode::Html, end))
    } else {
        scan::autolink_end(bytes, pos).map(|(end, _)| (Mode::Autolink, end))
    };
    if let Some((mode, end)) = entered {
        #[cfg(feature = "trace")]
        log::trace!(target: "inkmark::lexer", "entering {mode:?} mode at byte {pos} until {end}");
        state.modes.push(mode);
        state.angle_end = Some(end);
    }
}

fn build_fence_or_span(cursor: &mut Cursor<'_>, state: &mut LexState, out: &mut Vec<Token>, b: u8) -> bool {
    let start = cursor.offset();
    let run = cursor.run_len(b);
    let at_line_start = cursor.at_line_start();
    let mode = state.modes.current();

    let mut whole_run = b == b'`';
    if state.in_fenced_code {
        let closes = matches!(state.fence, Some(f) if f.ch == b && run >= f.len);
        if mode == Mode::Code && at_line_start && closes {
            #[cfg(feature = "trace")]
            log::trace!(target: "inkmark::lexer", "closing fence at byte {start}");
            state.modes.pop();
            state.in_fenced_code = false;
            state.fence = None;
            whole_run = true;
        }
    } else if mode == Mode::Normal && run >= 3 && at_line_start && fence_info_ok(cursor, b, run) {
        state.pending_mode = Some(Mode::Code);
        state.in_fenced_code = true;
        state.fence = Some(super::Fence { ch: b, len: run });
        whole_run = true;
    } else if b == b'`' && mode == Mode::Code {
        if run == state.code_span_len {
            state.modes.pop();
            state.code_span_len = 0;
        }
    } else if b == b'`' && mode == Mode::Normal && run <= limits::MAX_CODE_SPAN_BACKTICKS && state.runs.has_closer(run, start) {
        state.modes.push(Mode::Code);
        state.code_span_len = run;
    }

    let len = if whole_run { run } else { 1 };
    push(out, TokenKind::Punctuation, &cursor.source()[start..start + len], start, start + len);
    cursor.advance(len);
    true
}

/// A backtick fence's info string may not contain backticks; otherwise the
/// run is an inline code span at the start of a line.
fn fence_info_ok(cursor: &Cursor<'_>, b: u8, run: usize) -> bool {
    if b != b'`' {
        return true;
    }
    let rest = &cursor.bytes()[cursor.offset() + run..];
    let line_end = memchr::memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
    memchr::memchr(b'`', &rest[..line_end]).is_none()
}
