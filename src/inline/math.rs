//! Inline formulas: `$x$` and `$$x$$`.
//!
//! Opener and closer are `$` runs of the same length (one or two) on the
//! same line. The opener may not be followed by whitespace, the closer may
//! not be preceded by it, and a single `$` closer may not be followed by a
//! digit, so prices like `$5 and $6` stay text.
//!
//! Whether a run can close does not depend on its opener, so the closers
//! are indexed once per token slice and every opener is a lookup.

use super::{Built, Matched, Scope};
use crate::lexer::{Token, TokenKind};
use crate::node::NodeKind;

const NONE: u32 = u32::MAX;

/// Next closing `$` run of each length, per token index.
#[derive(Debug, Default)]
pub(crate) struct FormulaClosers {
    /// `next[len - 1][i]`: the first run of `len` dollars at or after token
    /// `i` that can close, or `NONE` if a line ends first.
    next: [Vec<u32>; 2],
}

fn is_space_token(token: Option<&Token>) -> bool {
    token.is_none_or(|t| matches!(t.kind, TokenKind::Whitespace | TokenKind::Newline | TokenKind::Eof))
}

impl FormulaClosers {
    pub(crate) fn index(tokens: &[Token]) -> Self {
        let n = tokens.len();
        let mut run = vec![0usize; n + 1];
        for j in (0..n).rev() {
            if tokens[j].is_punct('$') {
                run[j] = run[j + 1] + 1;
            }
        }

        let mut next = [vec![NONE; n + 1], vec![NONE; n + 1]];
        for j in (0..n).rev() {
            let token = &tokens[j];
            if matches!(token.kind, TokenKind::Newline | TokenKind::Eof | TokenKind::HardBreak) {
                continue;
            }
            for (slot, len) in next.iter_mut().zip(1..) {
                slot[j] = slot[j + 1];
                let starts_run = run[j] == len && (j == 0 || !tokens[j - 1].is_punct('$'));
                if !starts_run || j == 0 || is_space_token(Some(&tokens[j - 1])) {
                    continue;
                }
                let digit_follows = tokens
                    .get(j + len)
                    .is_some_and(|t| t.first_char().is_some_and(|c| c.is_ascii_digit()));
                if len == 2 || !digit_follows {
                    slot[j] = j as u32;
                }
            }
        }
        Self { next }
    }

    /// First closer of `len` dollars at or after `from`, on the same line.
    fn closer(&self, len: usize, from: usize) -> Option<usize> {
        let at = *self.next.get(len.checked_sub(1)?)?.get(from)?;
        (at != NONE).then_some(at as usize)
    }
}

fn dollar_run(scope: &Scope<'_>, i: usize) -> usize {
    let mut end = i;
    while scope.token(end).is_some_and(|t| t.is_punct('$')) {
        end += 1;
    }
    end - i
}

pub(super) fn build(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    if !scope.options.math || !scope.token(i)?.is_punct('$') {
        return None;
    }
    if i > scope.start && scope.tokens[i - 1].is_punct('$') {
        return None;
    }
    let len = dollar_run(scope, i);
    if len > 2 {
        return None;
    }
    let body = i + len;
    if is_space_token(scope.token(body)) {
        return None;
    }

    let j = scope.closers.closer(len, body)?;
    if j >= scope.end {
        return None;
    }
    Some(Matched {
        built: Built::Node {
            kind: NodeKind::FormulaInline(scope.text(body, j)),
            range: scope.span(i, j + len),
        },
        next: j + len,
    })
}
