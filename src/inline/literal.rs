//! Bare URL and email autolinks (GFM extended autolinks).
//!
//! A candidate starts at a characters token that begins a word (start of
//! region, after whitespace, or after one of `*`, `_`, `~`, `(`) and runs
//! to the next whitespace. Trailing sentence punctuation, a trailing
//! character reference and unbalanced `)` are handed back token by token,
//! so a closing `*` can still act as a delimiter. Tokens holding a
//! backslash escape end the candidate.
//!
//! Many word starts can share one run (`(a(a(a…`), so the run end and the
//! extent of domain and local-part tokens are indexed once per token
//! slice. A start is only validated in full when the index says its host
//! or domain can be well formed.

use std::cell::Cell;

use super::{Built, Matched, Scope};
use crate::lexer::{Token, TokenKind};
use crate::node::NodeKind;
use crate::scan::is_valid_domain;

/// URL prefixes and what to put in front of the link destination.
const URL_PREFIXES: [(&str, &str); 4] = [
    ("http://", ""),
    ("https://", ""),
    ("ftp://", ""),
    ("www.", "http://"),
];

fn starts_word(scope: &Scope<'_>, i: usize) -> bool {
    if i == scope.start {
        return true;
    }
    let prev = &scope.tokens[i - 1];
    match prev.kind {
        TokenKind::Whitespace | TokenKind::Newline => true,
        TokenKind::Punctuation => ["*", "_", "~", "("].contains(&prev.text.as_str()),
        _ => false,
    }
}

fn extends_candidate(token: &Token) -> bool {
    if !token.is_verbatim() {
        return false;
    }
    match token.kind {
        TokenKind::Characters | TokenKind::CharacterReference => true,
        TokenKind::Punctuation => !matches!(token.first_char(), Some('<' | '>' | '`')),
        _ => false,
    }
}

fn is_alnum_word(token: &Token) -> bool {
    token.kind == TokenKind::Characters && token.text.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn is_domain_token(token: &Token) -> bool {
    is_alnum_word(token) || token.is_punct('.') || token.is_punct('-')
}

fn is_local_token(token: &Token) -> bool {
    is_domain_token(token) || token.is_punct('_') || token.is_punct('+')
}

fn is_trailing_punct(token: &Token) -> bool {
    token.kind == TokenKind::Punctuation
        && matches!(token.text.as_str(), "?" | "!" | "." | "," | ":" | "*" | "_" | "~" | "'" | "\"")
}

/// `&name;` that did not validate as a reference, ending at `end`.
fn entity_like(tokens: &[Token], start: usize, end: usize) -> bool {
    end >= start + 3
        && tokens[end - 1].is_punct(';')
        && is_alnum_word(&tokens[end - 2])
        && tokens[end - 3].is_punct('&')
}

/// First index at or after each token where `keep` fails.
fn extent(tokens: &[Token], keep: impl Fn(&Token) -> bool) -> Vec<usize> {
    let mut out = vec![tokens.len(); tokens.len() + 1];
    for i in (0..tokens.len()).rev() {
        out[i] = if keep(&tokens[i]) { out[i + 1] } else { i };
    }
    out
}

/// Per-slice lookups for candidate scanning.
#[derive(Debug, Default)]
pub(crate) struct WordIndex {
    word_end: Vec<usize>,
    domain_end: Vec<usize>,
    local_end: Vec<usize>,
    /// `trim_floor[e]`: lowest end a candidate ending at `e` can be trimmed
    /// to, counting every `)` as unbalanced.
    trim_floor: Vec<usize>,
    /// `(at, run_end)` of the last email candidate that failed. Every start
    /// reaching the same `@` has the same domain and trimmed end.
    failed_email: Cell<Option<(usize, usize)>>,
}

impl WordIndex {
    pub(crate) fn index(tokens: &[Token]) -> Self {
        let mut trim_floor = vec![0; tokens.len() + 1];
        for end in 1..=tokens.len() {
            let last = &tokens[end - 1];
            trim_floor[end] = if entity_like(tokens, 0, end) {
                trim_floor[end - 3]
            } else if last.kind == TokenKind::CharacterReference
                || is_trailing_punct(last)
                || last.is_punct(';')
                || last.is_punct(')')
            {
                trim_floor[end - 1]
            } else {
                end
            };
        }
        Self {
            word_end: extent(tokens, extends_candidate),
            domain_end: extent(tokens, is_domain_token),
            local_end: extent(tokens, is_local_token),
            trim_floor,
            failed_email: Cell::new(None),
        }
    }
}

/// Drop trailing tokens that should not end a link.
fn trim_end(scope: &Scope<'_>, start: usize, mut end: usize) -> usize {
    let mut unclosed: isize = scope.tokens[start..end]
        .iter()
        .map(|t| t.is_punct('(') as isize - t.is_punct(')') as isize)
        .sum();
    while end > start {
        let last = &scope.tokens[end - 1];
        if last.kind == TokenKind::CharacterReference || is_trailing_punct(last) {
            end -= 1;
        } else if last.is_punct(';') {
            end -= if entity_like(scope.tokens, start, end) { 3 } else { 1 };
        } else if last.is_punct(')') && unclosed < 0 {
            unclosed += 1;
            end -= 1;
        } else {
            break;
        }
    }
    end
}

fn is_bare_email_local(local: &str) -> bool {
    !local.is_empty()
        && local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b'+'))
}

/// Link destination for a candidate, if it is a URL or email address.
fn destination(candidate: &str) -> Option<String> {
    let lower = candidate.to_ascii_lowercase();
    if let Some((prefix, add)) = URL_PREFIXES.iter().find(|(p, _)| lower.starts_with(p)) {
        let rest = &candidate[prefix.len()..];
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let host = match host.rsplit_once(':') {
            Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => host,
        };
        return is_valid_domain(host.as_bytes()).then(|| format!("{add}{candidate}"));
    }

    let (local, domain) = candidate.split_once('@')?;
    (is_bare_email_local(local) && is_valid_domain(domain.as_bytes())).then(|| format!("mailto:{candidate}"))
}

/// Index of the first host token when tokens at `i` spell a URL prefix.
fn url_host_start(scope: &Scope<'_>, i: usize, run_end: usize) -> Option<usize> {
    let word = scope.tokens[i].text.as_str();
    let punct: &[char] = if ["http", "https", "ftp"].iter().any(|p| word.eq_ignore_ascii_case(p)) {
        &[':', '/', '/']
    } else if word.eq_ignore_ascii_case("www") {
        &['.']
    } else {
        return None;
    };
    let host = i + 1 + punct.len();
    let spelled = punct
        .iter()
        .enumerate()
        .all(|(k, &ch)| i + 1 + k < run_end && scope.tokens[i + 1 + k].is_punct(ch));
    spelled.then_some(host)
}

fn is_host_end(token: &Token) -> bool {
    token.is_punct('/') || token.is_punct('?') || token.is_punct('#')
}

/// Whether the host starting at token `host` can validate. `false` is
/// final; `true` means the full check has to run.
fn host_may_validate(scope: &Scope<'_>, host: usize, run_end: usize, floor: usize) -> bool {
    let words = scope.words;
    let stop = words.domain_end[host].min(run_end);
    if stop >= floor {
        return true;
    }
    let tokens = scope.tokens;
    let named = || {
        let bytes = scope.joined.bytes();
        is_valid_domain(&bytes[scope.joined.offset(host)..scope.joined.offset(stop)])
    };
    if is_host_end(&tokens[stop]) {
        return named();
    }
    if !tokens[stop].is_punct(':') || !named() {
        return false;
    }
    let port = stop + 1;
    if port >= floor || is_host_end(&tokens[port]) {
        return true;
    }
    let after = port + 1;
    tokens[port].kind == TokenKind::Characters
        && tokens[port].text.bytes().all(|b| b.is_ascii_digit())
        && (after >= floor || is_host_end(&tokens[after]))
}

/// Index of the `@` of an email candidate starting at `i`, if its local
/// part is well formed and its domain can be.
fn email_at(scope: &Scope<'_>, i: usize, run_end: usize, floor: usize) -> Option<usize> {
    let words = scope.words;
    let at = words.local_end[i].min(run_end);
    if at == i || at >= run_end || !scope.tokens[at].is_punct('@') {
        return None;
    }
    if words.domain_end[at + 1].min(run_end) < floor {
        return None;
    }
    (words.failed_email.get() != Some((at, run_end))).then_some(at)
}

pub(super) fn build(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    if !scope.options.autolink_literals || scope.in_link || scope.in_failed_angle {
        return None;
    }
    if scope.token(i)?.kind != TokenKind::Characters || !starts_word(scope, i) {
        return None;
    }

    let run_end = scope.words.word_end[i].min(scope.end);
    if run_end <= i {
        return None;
    }
    let floor = scope.words.trim_floor[run_end];
    let email = match url_host_start(scope, i, run_end) {
        Some(host) if host_may_validate(scope, host, run_end, floor) => None,
        Some(_) => return None,
        None => Some(email_at(scope, i, run_end, floor)?),
    };

    let end = trim_end(scope, i, run_end);
    if end <= i {
        return None;
    }
    let candidate = scope.text(i, end);
    let Some(url) = destination(&candidate) else {
        if let Some(at) = email {
            scope.words.failed_email.set(Some((at, run_end)));
        }
        return None;
    };
    Some(Matched {
        built: Built::Wrapped {
            kind: NodeKind::Link { url, title: None },
            text: candidate,
            range: scope.span(i, end),
        },
        next: end,
    })
}

#[cfg(test)]
mod tests {
    use super::{destination, WordIndex};
    use crate::{parse_inline, tokenize, Options};

    fn outline(src: &str) -> String {
        let doc = parse_inline(src, &Options::default());
        doc.tree.outline(doc.paragraph)
    }

    #[test]
    fn test_destination() {
        assert_eq!(destination("http://example.com").as_deref(), Some("http://example.com"));
        assert_eq!(destination("www.example.com/x").as_deref(), Some("http://www.example.com/x"));
        assert_eq!(destination("https://example.com:8080/a").as_deref(), Some("https://example.com:8080/a"));
        assert_eq!(destination("user@example.com").as_deref(), Some("mailto:user@example.com"));
        assert_eq!(destination("http://localhost"), None);
        assert_eq!(destination("user@-bad-.com"), None);
        assert_eq!(destination("not a link"), None);
    }

    #[test]
    fn test_word_index() {
        // tokens: a ( b . c ) ! ␠ d
        let (tokens, _) = tokenize("a(b.c)! d");
        let words = WordIndex::index(&tokens);
        assert_eq!(words.word_end[0], 7);
        assert_eq!(words.domain_end[2], 5);
        assert_eq!(words.local_end[0], 1);
        assert_eq!(words.trim_floor[7], 5);
        assert_eq!(words.trim_floor[5], 5);
    }

    #[test]
    fn test_trailing_period() {
        assert_eq!(
            outline("Check http://example.com."),
            r#"Text("Check "), Link("http://example.com")[Text("http://example.com")], Text(".")"#
        );
    }

    #[test]
    fn test_balanced_parens() {
        assert_eq!(
            outline("(see www.example.com/a_(b))"),
            r#"Text("(see "), Link("http://www.example.com/a_(b)")[Text("www.example.com/a_(b)")], Text(")")"#
        );
    }

    #[test]
    fn test_entity_suffix() {
        assert_eq!(
            outline("www.example.com&hl;"),
            r#"Link("http://www.example.com")[Text("www.example.com")], Text("&hl;")"#
        );
    }

    #[test]
    fn test_port() {
        assert_eq!(
            outline("http://example.com:8080/x y"),
            r#"Link("http://example.com:8080/x")[Text("http://example.com:8080/x")], Text(" y")"#
        );
        assert_eq!(outline("http://example.com:80a/x"), r#"Text("http://example.com:80a/x")"#);
    }

    #[test]
    fn test_email() {
        assert_eq!(
            outline("mail user@example.com, now"),
            r#"Text("mail "), Link("mailto:user@example.com")[Text("user@example.com")], Text(", now")"#
        );
    }

    #[test]
    fn test_later_word_start_in_same_run() {
        assert_eq!(
            outline("foo(www.example.com)"),
            r#"Text("foo("), Link("http://www.example.com")[Text("www.example.com")], Text(")")"#
        );
    }

    #[test]
    fn test_not_at_word_start() {
        assert_eq!(outline("xhttp://example.com"), r#"Text("xhttp://example.com")"#);
    }

    #[test]
    fn test_escape_ends_candidate() {
        assert_eq!(outline("www.example.com\\\\"), r#"Text("www.example.com\\")"#);
        assert_eq!(outline("www\\.example.com"), r#"Text("www.example.com")"#);
    }

    #[test]
    fn test_inside_emphasis() {
        assert_eq!(
            outline("*www.example.com*"),
            r#"Emphasis[Link("http://www.example.com")[Text("www.example.com")]]"#
        );
    }

    #[test]
    fn test_many_word_starts_in_one_run() {
        for src in ["(a".repeat(20_000), "(www.a".repeat(20_000), "a_".repeat(20_000) + "b@example"] {
            let doc = parse_inline(&src, &Options::default());
            let tree = &doc.tree;
            assert_eq!(tree.children(doc.paragraph).len(), 1, "{}", &src[..12]);
            assert_eq!(tree.text_content(doc.paragraph), src);
        }
    }
}
