//! Emphasis, strong emphasis and strikethrough.
//!
//! Delimiter runs are collected while the region is built, each as a
//! placeholder `Text` node plus a [`Delimiter`] record. When the region is
//! complete, [`process_emphasis`] runs the CommonMark delimiter-stack
//! algorithm over the records: matched pairs wrap the nodes between them,
//! and the placeholder text shrinks by the delimiters used.

use super::{Built, Matched, Scope};
use crate::classify::CharClass;
use crate::node::{NodeId, NodeKind, Tree};
use crate::Range;

/// A maximal run of `*`, `_` or `~` with its flanking verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DelimiterRun {
    pub ch: char,
    pub len: usize,
    pub can_open: bool,
    pub can_close: bool,
}

impl DelimiterRun {
    /// Classify a run of `len` delimiters between `before` and `after`.
    pub fn classify(ch: char, len: usize, before: Option<char>, after: Option<char>) -> Self {
        let prev = CharClass::of(before);
        let next = CharClass::of(after);
        let left_flanking =
            next != CharClass::Whitespace && (next != CharClass::Punctuation || prev != CharClass::Other);
        let right_flanking =
            prev != CharClass::Whitespace && (prev != CharClass::Punctuation || next != CharClass::Other);

        let (can_open, can_close) = if ch == '_' {
            (
                left_flanking && (!right_flanking || prev == CharClass::Punctuation),
                right_flanking && (!left_flanking || next == CharClass::Punctuation),
            )
        } else {
            (left_flanking, right_flanking)
        };
        Self {
            ch,
            len,
            can_open,
            can_close,
        }
    }
}

/// Delimiter stack entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Delimiter {
    node: NodeId,
    run: DelimiterRun,
    /// Run length before any delimiters were used (rule of three).
    orig_len: usize,
    active: bool,
}

impl Delimiter {
    pub fn new(node: NodeId, run: DelimiterRun) -> Self {
        Self {
            node,
            run,
            orig_len: run.len,
            active: true,
        }
    }
}

fn delimiter_char(scope: &Scope<'_>, i: usize) -> Option<char> {
    let token = scope.token(i)?;
    ['*', '_', '~']
        .into_iter()
        .find(|&ch| token.is_punct(ch))
        .filter(|&ch| ch != '~' || scope.options.strikethrough)
}

/// Delimiter run builder.
pub(super) fn build(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    let ch = delimiter_char(scope, i)?;
    // Only whole runs; the tail of a rejected run stays text.
    if i > scope.start && scope.tokens[i - 1].is_punct(ch) {
        return None;
    }
    let mut end = i;
    while scope.token(end).is_some_and(|t| t.is_punct(ch)) {
        end += 1;
    }
    let len = end - i;
    if ch == '~' && len > 2 {
        return None;
    }

    let before = i.checked_sub(1).and_then(|p| scope.tokens[p].last_char());
    let after = scope.tokens.get(end).and_then(|t| t.first_char());
    Some(Matched {
        built: Built::Delimiter {
            run: DelimiterRun::classify(ch, len, before, after),
            range: scope.span(i, end),
        },
        next: end,
    })
}

#[inline]
fn char_slot(ch: char) -> usize {
    match ch {
        '*' => 0,
        '_' => 1,
        _ => 2,
    }
}

/// Resolve the region's delimiter stack against the children of `parent`.
pub(crate) fn process_emphasis(tree: &mut Tree, parent: NodeId, delims: &mut [Delimiter]) {
    // Lowest stack index worth searching for an opener, per closer class
    // (char, original length mod 3, can_open).
    let mut floors = [[[0usize; 2]; 3]; 3];
    let mut c = 0;

    while c < delims.len() {
        let closer = delims[c];
        if !closer.active || !closer.run.can_close {
            c += 1;
            continue;
        }
        let ch = closer.run.ch;
        let slot = (char_slot(ch), closer.orig_len % 3, closer.run.can_open as usize);
        let floor = floors[slot.0][slot.1][slot.2];

        let opener = (floor..c).rev().find(|&o| {
            let op = &delims[o];
            if !op.active || op.run.ch != ch || !op.run.can_open {
                return false;
            }
            if ch == '~' {
                return op.run.len == closer.run.len;
            }
            let odd_match = (closer.run.can_open || op.run.can_close)
                && closer.orig_len % 3 != 0
                && (op.orig_len + closer.orig_len) % 3 == 0;
            !odd_match
        });

        let Some(o) = opener else {
            floors[slot.0][slot.1][slot.2] = c;
            if !closer.run.can_open {
                delims[c].active = false;
            }
            c += 1;
            continue;
        };

        let used = if ch == '~' {
            closer.run.len
        } else if closer.run.len >= 2 && delims[o].run.len >= 2 {
            2
        } else {
            1
        };
        let kind = match (ch, used) {
            ('~', _) => NodeKind::Strike,
            (_, 2) => NodeKind::Strong,
            _ => NodeKind::Emphasis,
        };

        let opener_node = delims[o].node;
        let (Some(from), Some(to)) = (tree.position(opener_node), tree.position(closer.node)) else {
            delims[c].active = false;
            c += 1;
            continue;
        };
        let start = shrink(tree, opener_node, used, true);
        let end = shrink(tree, closer.node, used, false);
        tree.wrap_children(parent, from + 1, to, kind, Range::new(start, end));

        for between in &mut delims[o + 1..c] {
            between.active = false;
        }
        delims[o].run.len -= used;
        delims[c].run.len -= used;
        if delims[o].run.len == 0 {
            tree.detach(opener_node);
            delims[o].active = false;
        }
        if delims[c].run.len == 0 {
            tree.detach(closer.node);
            delims[c].active = false;
            c += 1;
        }
    }
}

/// Remove `used` delimiter characters from a placeholder node: from the end
/// of an opener, from the start of a closer. Returns the boundary of the
/// removed part on the emphasis side (start for openers, end for closers).
fn shrink(tree: &mut Tree, node: NodeId, used: usize, opener: bool) -> u32 {
    let data = tree.get_mut(node);
    if let NodeKind::Text(text) = &mut data.kind {
        let keep = text.len().saturating_sub(used);
        if opener {
            text.truncate(keep);
        } else {
            text.drain(..used.min(text.len()));
        }
    }
    let used = used as u32;
    if opener {
        data.range.end = data.range.end.saturating_sub(used).max(data.range.start);
        data.range.end
    } else {
        let boundary = data.range.start + used;
        data.range.start = boundary.min(data.range.end);
        boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_flanking() {
        let run = DelimiterRun::classify('*', 1, None, Some('f'));
        assert!(run.can_open);
        assert!(!run.can_close);
    }

    #[test]
    fn test_right_flanking() {
        let run = DelimiterRun::classify('*', 1, Some('o'), None);
        assert!(!run.can_open);
        assert!(run.can_close);
    }

    #[test]
    fn test_intraword_star_both_ways() {
        let run = DelimiterRun::classify('*', 1, Some('a'), Some('b'));
        assert!(run.can_open && run.can_close);
    }

    #[test]
    fn test_intraword_underscore_neither() {
        let run = DelimiterRun::classify('_', 1, Some('a'), Some('b'));
        assert!(!run.can_open);
        assert!(!run.can_close);
    }

    #[test]
    fn test_punctuation_before_opener() {
        // `a*"foo"*` : the first run is right-flanking only.
        let run = DelimiterRun::classify('*', 1, Some('a'), Some('"'));
        assert!(!run.can_open);

        let run = DelimiterRun::classify('_', 1, Some('"'), Some('f'));
        assert!(run.can_open);
    }

    #[test]
    fn test_whitespace_both_sides() {
        let run = DelimiterRun::classify('*', 1, Some(' '), Some(' '));
        assert!(!run.can_open && !run.can_close);
    }
}
