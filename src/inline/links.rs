//! Inline links and images: `[text](dest "title")`, `![alt](dest)`.
//!
//! Brackets are matched over tokens. Code spans, raw HTML and angle
//! autolinks are skipped whole, so a `]` inside them never closes a link.
//! A link may not contain another link: if the text holds a complete inner
//! link, the outer brackets stay literal and the inner one wins.

use super::{Built, Matched, Scope};
use crate::lexer::TokenKind;
use crate::limits;
use crate::node::NodeKind;

/// Index of the `]` matching the `[` at `open`.
fn find_bracket_close(scope: &Scope<'_>, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = open + 1;
    while let Some(token) = scope.token(j) {
        if let Some(after) = scope.atomic_end(j) {
            j = after;
            continue;
        }
        if token.is_punct('[') {
            depth += 1;
            if depth > limits::MAX_BRACKET_DEPTH {
                return None;
            }
        } else if token.is_punct(']') {
            if depth == 0 {
                return Some(j);
            }
            depth -= 1;
        } else if token.kind == TokenKind::Eof {
            return None;
        }
        j += 1;
    }
    None
}

/// Skip whitespace and at most one line ending.
fn skip_spaces(scope: &Scope<'_>, mut j: usize) -> usize {
    let mut seen_newline = false;
    while let Some(token) = scope.token(j) {
        match token.kind {
            TokenKind::Whitespace => {}
            TokenKind::Newline if !seen_newline => seen_newline = true,
            _ => break,
        }
        j += 1;
    }
    j
}

/// `<...>` destination starting at the `<` at `j`.
fn angle_destination(scope: &Scope<'_>, j: usize) -> Option<(String, usize)> {
    let mut url = String::new();
    let mut k = j + 1;
    loop {
        let token = scope.token(k)?;
        if token.is_punct('>') {
            return Some((url, k + 1));
        }
        if token.is_punct('<') || token.is_line_end() {
            return None;
        }
        url.push_str(&token.text);
        k += 1;
    }
}

/// Bare destination: no whitespace, parentheses balanced.
fn bare_destination(scope: &Scope<'_>, j: usize) -> Option<(String, usize)> {
    let mut url = String::new();
    let mut depth = 0usize;
    let mut k = j;
    while let Some(token) = scope.token(k) {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Eof => break,
            TokenKind::Unclassified | TokenKind::HardBreak => return None,
            _ => {}
        }
        if token.is_punct('(') {
            depth += 1;
            if depth > limits::MAX_LINK_PAREN_DEPTH {
                return None;
            }
        } else if token.is_punct(')') {
            if depth == 0 {
                break;
            }
            depth -= 1;
        }
        url.push_str(&token.text);
        k += 1;
    }
    (depth == 0).then_some((url, k))
}

/// Title delimited by `"`, `'` or `(...)` starting at `j`.
fn title(scope: &Scope<'_>, j: usize) -> Option<(String, usize)> {
    let open = scope.token(j)?;
    let close = match open.text.as_str() {
        "\"" => '"',
        "'" => '\'',
        "(" => ')',
        _ => return None,
    };
    if open.kind != TokenKind::Punctuation {
        return None;
    }
    let mut text = String::new();
    let mut k = j + 1;
    loop {
        let token = scope.token(k)?;
        if token.is_punct(close) {
            return Some((text, k + 1));
        }
        if close == ')' && token.is_punct('(') {
            return None;
        }
        match token.kind {
            TokenKind::Eof | TokenKind::Unclassified => return None,
            TokenKind::Newline => {
                // A blank line ends the paragraph, so the title cannot span it.
                let after = skip_spaces_only(scope, k + 1);
                if scope.token(after).is_none_or(|t| t.is_line_end()) {
                    return None;
                }
            }
            _ => {}
        }
        text.push_str(&token.text);
        k += 1;
    }
}

fn skip_spaces_only(scope: &Scope<'_>, mut j: usize) -> usize {
    while scope.token(j).is_some_and(|t| t.kind == TokenKind::Whitespace) {
        j += 1;
    }
    j
}

/// Destination and title after `]`, from `(` through `)`.
fn inline_tail(scope: &Scope<'_>, paren: usize) -> Option<(String, Option<String>, usize)> {
    if !scope.token(paren)?.is_punct('(') {
        return None;
    }
    let j = skip_spaces(scope, paren + 1);
    let (url, after_dest) = if scope.token(j)?.is_punct('<') {
        angle_destination(scope, j)?
    } else {
        bare_destination(scope, j)?
    };

    let j = skip_spaces(scope, after_dest);
    let mut end = j;
    let mut link_title = None;
    if j > after_dest {
        if let Some((t, after_title)) = title(scope, j) {
            link_title = Some(t);
            end = skip_spaces(scope, after_title);
        }
    }
    scope.token(end)?.is_punct(')').then_some((url, link_title, end + 1))
}

/// Whether tokens `from..to` contain a complete link (images excepted).
fn contains_link(scope: &Scope<'_>, from: usize, to: usize) -> bool {
    let inner = Scope { end: to, ..*scope };
    let mut k = from;
    while k < to {
        if let Some(after) = inner.atomic_end(k) {
            k = after;
            continue;
        }
        let is_image = k > 0 && inner.tokens[k - 1].is_punct('!');
        if inner.tokens[k].is_punct('[') && !is_image {
            let complete = find_bracket_close(&inner, k).and_then(|close| inline_tail(&inner, close + 1));
            if complete.is_some() {
                return true;
            }
        }
        k += 1;
    }
    false
}

pub(super) fn build(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    if !scope.options.links || scope.depth >= limits::MAX_INLINE_NESTING {
        return None;
    }
    let token = scope.token(i)?;
    let is_image = token.is_punct('!') && scope.token(i + 1).is_some_and(|t| t.is_punct('['));
    if !is_image && (scope.in_link || !token.is_punct('[')) {
        return None;
    }
    let open = if is_image { i + 1 } else { i };

    let close = find_bracket_close(scope, open)?;
    let (url, title, next) = inline_tail(scope, close + 1)?;
    if !is_image && contains_link(scope, open + 1, close) {
        return None;
    }

    let kind = if is_image {
        NodeKind::Image {
            url,
            alt: String::new(),
            title,
        }
    } else {
        NodeKind::Link { url, title }
    };
    Some(Matched {
        built: Built::Span {
            kind,
            content: open + 1..close,
            range: scope.span(i, next),
        },
        next,
    })
}
