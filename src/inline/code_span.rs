//! Code spans.
//!
//! A backtick run closes only against a run of exactly the same length.
//! The lexer has already switched to code mode between the two, so the
//! tokens in between carry literal text.

use super::{Built, Matched, Scope};
use crate::lexer::TokenKind;
use crate::node::NodeKind;

/// Index of the closing run for the opener at `i`.
fn find_closer(scope: &Scope<'_>, i: usize) -> Option<usize> {
    let opener = scope.token(i)?;
    if !opener.is_punct_run_of('`') {
        return None;
    }
    (i + 1..scope.end).find(|&j| {
        let t = &scope.tokens[j];
        t.kind == TokenKind::Punctuation && t.text == opener.text
    })
}

/// Index after the code span starting at `i`.
pub(super) fn end_token(scope: &Scope<'_>, i: usize) -> Option<usize> {
    find_closer(scope, i).map(|close| close + 1)
}

pub(super) fn build(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    let close = find_closer(scope, i)?;

    let mut content = String::new();
    for token in &scope.tokens[i + 1..close] {
        if token.kind == TokenKind::Newline {
            content.push(' ');
        } else {
            content.push_str(&token.text);
        }
    }
    let padded = content.len() >= 2 && content.starts_with(' ') && content.ends_with(' ');
    if padded && !content.bytes().all(|b| b == b' ') {
        content = content[1..content.len() - 1].to_string();
    }

    Some(Matched {
        built: Built::Node {
            kind: NodeKind::InlineCode(content),
            range: scope.span(i, close + 1),
        },
        next: close + 1,
    })
}
