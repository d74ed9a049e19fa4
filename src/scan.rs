//! Byte-level scanners for inline HTML and autolink grammar.
//!
//! Shared by the lexer (to decide whether `<` really opens an HTML or
//! autolink context) and by the inline builders (to validate the construct
//! over token text). All functions take the full buffer and a start offset
//! and return the end offset on success; they never allocate.

use crate::limits;
use memchr::{memchr, memmem};

/// What kind of angle-bracket autolink was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkKind {
    /// `<scheme:rest>`
    Uri,
    /// `<local@domain>`
    Email,
}

/// Scan raw inline HTML starting at `<`.
///
/// Recognizes, in order: comment, CDATA section, declaration, processing
/// instruction, closing tag, opening/self-closing tag. Returns the offset
/// just past the closing `>`.
pub fn html_end(text: &[u8], start: usize) -> Option<usize> {
    if text.get(start) != Some(&b'<') {
        return None;
    }
    match text.get(start + 1) {
        Some(b'!') => {
            if text[start..].starts_with(b"<!--") {
                return comment_end(text, start);
            }
            if text[start..].starts_with(b"<![CDATA[") {
                return find(text, start + 9, b"]]>").map(|end| end + 3);
            }
            declaration_end(text, start)
        }
        Some(b'?') => find(text, start + 2, b"?>").map(|end| end + 2),
        _ => tag_end(text, start),
    }
}

fn comment_end(text: &[u8], start: usize) -> Option<usize> {
    let i = start + 4;
    if i >= text.len() {
        return None;
    }
    // `<!-->` and `<!--->` are complete (empty) comments.
    if text[i] == b'>' {
        return Some(i + 1);
    }
    if text[i] == b'-' && text.get(i + 1) == Some(&b'>') {
        return Some(i + 2);
    }
    find(text, i, b"-->").map(|end| end + 3)
}

fn declaration_end(text: &[u8], start: usize) -> Option<usize> {
    if !text.get(start + 2).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    memchr(b'>', &text[start + 2..]).map(|idx| start + 2 + idx + 1)
}

fn tag_end(text: &[u8], start: usize) -> Option<usize> {
    let len = text.len();
    let mut i = start + 1;

    let is_closing = text.get(i) == Some(&b'/');
    if is_closing {
        i += 1;
    }

    if !text.get(i).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    i += 1;
    while i < len && (text[i].is_ascii_alphanumeric() || text[i] == b'-') {
        i += 1;
    }

    if is_closing {
        i = skip_html_whitespace(text, i);
        return (text.get(i) == Some(&b'>')).then_some(i + 1);
    }

    loop {
        match text.get(i)? {
            b'>' => return Some(i + 1),
            b'/' => return (text.get(i + 1) == Some(&b'>')).then_some(i + 2),
            b if !is_html_whitespace(*b) => return None,
            _ => {}
        }
        i = skip_html_whitespace(text, i);
        match text.get(i)? {
            b'>' => return Some(i + 1),
            b'/' => return (text.get(i + 1) == Some(&b'>')).then_some(i + 2),
            b if !is_attr_name_start(*b) => return None,
            _ => {}
        }
        i += 1;
        while i < len && is_attr_name_char(text[i]) {
            i += 1;
        }

        let before_value = i;
        i = skip_html_whitespace(text, i);
        if text.get(i) != Some(&b'=') {
            i = before_value;
            continue;
        }
        i = skip_html_whitespace(text, i + 1);
        let quote = *text.get(i)?;
        if quote == b'"' || quote == b'\'' {
            // A `>` inside a quoted value does not end the tag.
            let close = memchr(quote, &text[i + 1..])?;
            i += close + 2;
        } else {
            let value_start = i;
            while i < len
                && !is_html_whitespace(text[i])
                && !matches!(text[i], b'"' | b'\'' | b'=' | b'<' | b'>' | b'`')
            {
                i += 1;
            }
            if i == value_start {
                return None;
            }
        }
    }
}

/// Scan an angle-bracket autolink starting at `<`.
///
/// The content must end at the next `>` with no whitespace, control
/// character or `<` in between, and classify as an absolute URI or an email
/// address. Returns the offset just past `>` and the kind.
pub fn autolink_end(text: &[u8], start: usize) -> Option<(usize, AutolinkKind)> {
    if text.get(start) != Some(&b'<') {
        return None;
    }
    let content_start = start + 1;
    let mut i = content_start;
    while i < text.len() {
        let b = text[i];
        if b == b'>' {
            break;
        }
        if b == b'<' || b <= b' ' || b == 0x7F {
            return None;
        }
        i += 1;
    }
    if i >= text.len() || i == content_start {
        return None;
    }
    let content = &text[content_start..i];
    let kind = if is_absolute_uri(content) {
        AutolinkKind::Uri
    } else if is_email_address(content) {
        AutolinkKind::Email
    } else {
        return None;
    };
    Some((i + 1, kind))
}

/// `scheme:rest` where scheme is a letter followed by letters, digits, `+`,
/// `-` or `.`, 2..=32 bytes long, and at least one byte follows the colon.
pub fn is_absolute_uri(content: &[u8]) -> bool {
    let Some(colon) = memchr(b':', content) else {
        return false;
    };
    let scheme = &content[..colon];
    if scheme.len() < limits::MIN_SCHEME_LEN || scheme.len() > limits::MAX_SCHEME_LEN {
        return false;
    }
    if !scheme[0].is_ascii_alphabetic() {
        return false;
    }
    if !scheme
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
    {
        return false;
    }
    colon + 1 < content.len()
}

/// `local@domain` with the HTML5 local-part alphabet and a validated domain.
pub fn is_email_address(content: &[u8]) -> bool {
    let Some(at) = memchr(b'@', content) else {
        return false;
    };
    let (local, domain) = (&content[..at], &content[at + 1..]);
    !local.is_empty() && local.iter().all(|&b| is_email_local_byte(b)) && is_valid_domain(domain)
}

/// Bytes allowed in the local part of an angle-bracket email autolink.
#[inline]
pub fn is_email_local_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b)
}

/// At least two dot-separated labels; every label is 1..=63 alphanumerics
/// or hyphens and neither starts nor ends with a hyphen.
pub fn is_valid_domain(domain: &[u8]) -> bool {
    let mut labels = 0usize;
    for label in domain.split(|&b| b == b'.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if label[0] == b'-' || label[label.len() - 1] == b'-' {
            return false;
        }
        if !label.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-') {
            return false;
        }
        labels += 1;
    }
    labels >= 2
}

#[inline]
pub fn is_html_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

#[inline]
fn skip_html_whitespace(text: &[u8], mut i: usize) -> usize {
    while i < text.len() && is_html_whitespace(text[i]) {
        i += 1;
    }
    i
}

#[inline]
fn is_attr_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

#[inline]
fn is_attr_name_char(b: u8) -> bool {
    is_attr_name_start(b) || b.is_ascii_digit() || b == b'.' || b == b'-'
}

fn find(text: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    if start >= text.len() {
        return None;
    }
    memmem::find(&text[start..], needle).map(|idx| start + idx)
}
