//! Angle-bracket autolinks: `<scheme:rest>` and `<local@domain>`.

use super::{Built, Matched, Scope};
use crate::escape::encode_autolink_destination;
use crate::node::NodeKind;
use crate::scan::{self, AutolinkKind};

fn scan_at(scope: &Scope<'_>, i: usize) -> Option<(usize, AutolinkKind)> {
    if !scope.token(i)?.is_punct('<') {
        return None;
    }
    let start = scope.joined.offset(i);
    let (end, kind) = scan::autolink_end(scope.joined.bytes(), start)?;
    let next = scope.joined.token_at(end)?;
    (next <= scope.end && scope.is_verbatim(i, next)).then_some((next, kind))
}

/// Index after the autolink starting at `i`.
pub(super) fn end_token(scope: &Scope<'_>, i: usize) -> Option<usize> {
    scan_at(scope, i).map(|(next, _)| next)
}

pub(super) fn build(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    if scope.in_link {
        return None;
    }
    let (next, kind) = scan_at(scope, i)?;
    let start = scope.joined.offset(i);
    let end = scope.joined.offset(next);
    let content = scope.joined.slice(start + 1, end - 1);
    let url = match kind {
        AutolinkKind::Uri => encode_autolink_destination(content).into_owned(),
        AutolinkKind::Email => format!("mailto:{content}"),
    };
    Some(Matched {
        built: Built::Wrapped {
            kind: NodeKind::Link {
                url,
                title: Some(content.to_string()),
            },
            text: content.to_string(),
            range: scope.span(i, next),
        },
        next,
    })
}
