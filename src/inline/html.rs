//! Raw inline HTML.
//!
//! Comments, CDATA sections, declarations, processing instructions and
//! open/closing tags are recognised by [`scan::html_end`], the same scanner
//! the lexer uses to enter HTML mode. A match must end on a token boundary
//! inside the region and may not contain a backslash escape; otherwise the
//! `<` falls through untouched.

use super::{Built, Matched, Scope};
use crate::node::NodeKind;
use crate::scan;

/// Index after the raw HTML construct starting at `i`.
pub(super) fn end_token(scope: &Scope<'_>, i: usize) -> Option<usize> {
    if !scope.options.allow_html || !scope.token(i)?.is_punct('<') {
        return None;
    }
    let start = scope.joined.offset(i);
    let end = scan::html_end(scope.joined.bytes(), start)?;
    let next = scope.joined.token_at(end)?;
    (next <= scope.end && scope.is_verbatim(i, next)).then_some(next)
}

pub(super) fn build(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    let next = end_token(scope, i)?;
    let raw = scope.joined.slice(scope.joined.offset(i), scope.joined.offset(next));
    Some(Matched {
        built: Built::Node {
            kind: NodeKind::Html(raw.to_string()),
            range: scope.span(i, next),
        },
        next,
    })
}
