//! Inline construction.
//!
//! Walks a token slice left to right and builds inline nodes under a parent
//! supplied by the block layer:
//! 1. At each token the builders in [`InlineBuilder::ORDER`] are tried in
//!    turn. A builder is a pure function of the tokens and a start index; it
//!    returns what it matched and where to resume, or nothing.
//! 2. Tokens no builder claims are buffered as plain text, which is flushed
//!    into a `Text` node before the next structural node.
//! 3. Delimiter runs become placeholder `Text` nodes; at the end of each
//!    region the delimiter stack is resolved into emphasis, strong and
//!    strike nodes.
//!
//! Link text and image descriptions are built as nested regions, so
//! delimiters never pair across a link boundary.

mod autolink;
mod code_span;
mod emphasis;
mod html;
mod links;
mod literal;
mod math;

use crate::lexer::{Token, TokenKind};
use crate::node::{BreakKind, NodeId, NodeKind, Tree};
use crate::{limits, Options, ParseError, Range};
use emphasis::{Delimiter, DelimiterRun};
use literal::WordIndex;
use math::FormulaClosers;

/// Token texts laid end to end, so byte scanners shared with the lexer can
/// run over token sequences. `starts[i]` is where token `i` begins; the
/// extra last entry is the total length.
#[derive(Debug)]
pub(crate) struct Joined {
    text: String,
    starts: Vec<usize>,
}

impl Joined {
    fn new(tokens: &[Token]) -> Self {
        let mut text = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
        let mut starts = Vec::with_capacity(tokens.len() + 1);
        for token in tokens {
            starts.push(text.len());
            text.push_str(&token.text);
        }
        starts.push(text.len());
        Self { text, starts }
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    #[inline]
    pub(crate) fn offset(&self, index: usize) -> usize {
        self.starts[index]
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &str {
        self.text.get(start..end).unwrap_or_default()
    }

    /// Index of the token starting exactly at `offset`.
    pub(crate) fn token_at(&self, offset: usize) -> Option<usize> {
        self.starts.binary_search(&offset).ok()
    }
}

/// Read-only view of one region, handed to every builder.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'a> {
    pub tokens: &'a [Token],
    pub joined: &'a Joined,
    pub words: &'a WordIndex,
    pub closers: &'a FormulaClosers,
    pub start: usize,
    pub end: usize,
    pub options: Options,
    pub in_link: bool,
    pub in_failed_angle: bool,
    pub depth: usize,
}

impl<'a> Scope<'a> {
    /// Token `i` if it lies inside the region.
    #[inline]
    pub fn token(&self, i: usize) -> Option<&'a Token> {
        if i >= self.start && i < self.end {
            self.tokens.get(i)
        } else {
            None
        }
    }

    /// Source range covered by tokens `from..to` (`to > from`).
    pub fn span(&self, from: usize, to: usize) -> Range {
        let first = self.tokens[from].range;
        let last = self.tokens[to.max(from + 1) - 1].range;
        first.cover(last)
    }

    /// Whether tokens `from..to` carry their source text unchanged. Byte
    /// scanners over the joined text must not see collapsed escapes.
    pub fn is_verbatim(&self, from: usize, to: usize) -> bool {
        self.tokens[from..to].iter().all(Token::is_verbatim)
    }

    /// Concatenated text of tokens `from..to`.
    pub fn text(&self, from: usize, to: usize) -> String {
        self.tokens[from..to].iter().map(|t| t.text.as_str()).collect()
    }

    /// Index after a construct that brackets may not cut through: a code
    /// span, raw HTML or an angle autolink starting at `i`.
    pub fn atomic_end(&self, i: usize) -> Option<usize> {
        code_span::end_token(self, i)
            .or_else(|| html::end_token(self, i))
            .or_else(|| autolink::end_token(self, i))
    }
}

/// What a builder matched.
#[derive(Debug)]
pub(crate) enum Built {
    /// A leaf node.
    Node { kind: NodeKind, range: Range },
    /// A container with a single text child (autolinks).
    Wrapped { kind: NodeKind, text: String, range: Range },
    /// A container whose children are built from tokens `content`.
    Span { kind: NodeKind, content: std::ops::Range<usize>, range: Range },
    /// A delimiter run to resolve at the end of the region.
    Delimiter { run: DelimiterRun, range: Range },
    /// Text to add to the pending buffer.
    Text { text: String, range: Range },
    /// Tokens consumed without output.
    Skip,
}

#[derive(Debug)]
pub(crate) struct Matched {
    pub built: Built,
    pub next: usize,
}

/// Inline node builders, tried in order at every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineBuilder {
    CodeSpan,
    RawHtml,
    Autolink,
    Link,
    Formula,
    Literal,
    DelimiterRun,
    CharRef,
    LineBreak,
}

impl InlineBuilder {
    /// Raw HTML is tried before angle autolinks; both before anything that
    /// could start inside them.
    pub const ORDER: [InlineBuilder; 9] = [
        InlineBuilder::CodeSpan,
        InlineBuilder::RawHtml,
        InlineBuilder::Autolink,
        InlineBuilder::Link,
        InlineBuilder::Formula,
        InlineBuilder::Literal,
        InlineBuilder::DelimiterRun,
        InlineBuilder::CharRef,
        InlineBuilder::LineBreak,
    ];

    fn try_build(self, scope: &Scope<'_>, i: usize) -> Option<Matched> {
        match self {
            InlineBuilder::CodeSpan => code_span::build(scope, i),
            InlineBuilder::RawHtml => html::build(scope, i),
            InlineBuilder::Autolink => autolink::build(scope, i),
            InlineBuilder::Link => links::build(scope, i),
            InlineBuilder::Formula => math::build(scope, i),
            InlineBuilder::Literal => literal::build(scope, i),
            InlineBuilder::DelimiterRun => emphasis::build(scope, i),
            InlineBuilder::CharRef => build_char_ref(scope, i),
            InlineBuilder::LineBreak => build_line_break(scope, i),
        }
    }
}

fn build_char_ref(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    let token = scope.token(i)?;
    if token.kind != TokenKind::CharacterReference {
        return None;
    }
    Some(Matched {
        built: Built::Node {
            kind: NodeKind::CharRef(token.text.clone()),
            range: token.range,
        },
        next: i + 1,
    })
}

/// Skip the whitespace tokens starting at `i`.
fn skip_whitespace(scope: &Scope<'_>, mut i: usize) -> usize {
    while scope.token(i).is_some_and(|t| t.kind == TokenKind::Whitespace) {
        i += 1;
    }
    i
}

/// A line ending with nothing but whitespace after it in the region.
fn is_trailing_newline(scope: &Scope<'_>, i: usize) -> bool {
    let after = skip_whitespace(scope, i + 1);
    scope.token(after).is_none_or(|t| t.kind == TokenKind::Eof)
}

fn build_line_break(scope: &Scope<'_>, i: usize) -> Option<Matched> {
    let token = scope.token(i)?;
    match token.kind {
        TokenKind::HardBreak => {
            let newline = i + 1;
            let ends_line = scope.token(newline).is_some_and(|t| t.kind == TokenKind::Newline);
            if ends_line && !is_trailing_newline(scope, newline) {
                Some(Matched {
                    built: Built::Node {
                        kind: NodeKind::LineBreak(BreakKind::Hard),
                        range: scope.span(i, newline + 1),
                    },
                    next: skip_whitespace(scope, newline + 1),
                })
            } else {
                // A backslash at the end of the block is literal.
                Some(Matched {
                    built: Built::Text {
                        text: "\\".to_string(),
                        range: token.range,
                    },
                    next: i + 1,
                })
            }
        }
        TokenKind::Newline => {
            if is_trailing_newline(scope, i) {
                return Some(Matched {
                    built: Built::Skip,
                    next: i + 1,
                });
            }
            let hard = i > scope.start
                && scope.tokens[i - 1].kind == TokenKind::Whitespace
                && scope.tokens[i - 1].text.ends_with("  ");
            let kind = if hard { BreakKind::Hard } else { BreakKind::Soft };
            Some(Matched {
                built: Built::Node {
                    kind: NodeKind::LineBreak(kind),
                    range: token.range,
                },
                next: skip_whitespace(scope, i + 1),
            })
        }
        _ => None,
    }
}

/// Per-region mutable state.
struct Region {
    parent: NodeId,
    pending: String,
    pending_range: Option<Range>,
    delimiters: Vec<Delimiter>,
    in_failed_angle: bool,
}

impl Region {
    fn new(parent: NodeId) -> Self {
        Self {
            parent,
            pending: String::new(),
            pending_range: None,
            delimiters: Vec::new(),
            in_failed_angle: false,
        }
    }

    fn buffer(&mut self, text: &str, range: Range) {
        self.pending.push_str(text);
        self.pending_range = Some(self.pending_range.map_or(range, |r| r.cover(range)));
    }

    fn flush(&mut self, tree: &mut Tree) {
        if let Some(range) = self.pending_range.take() {
            let text = std::mem::take(&mut self.pending);
            if !text.is_empty() {
                tree.append(self.parent, NodeKind::Text(text), range);
            }
        }
    }
}

/// Inline construction driver.
#[derive(Debug, Clone, Default)]
pub struct InlineParser {
    options: Options,
}

impl InlineParser {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Build the inline content of `tokens` as children of `parent`.
    ///
    /// `tokens` is one block's inline content, optionally ending with the
    /// lexer's `Eof`. The whole slice is consumed. Returns the construction
    /// errors; the tree is always populated with a best-effort result.
    pub fn build(&self, tokens: &[Token], tree: &mut Tree, parent: NodeId) -> Vec<ParseError> {
        let joined = Joined::new(tokens);
        let words = if self.options.autolink_literals {
            WordIndex::index(tokens)
        } else {
            WordIndex::default()
        };
        let closers = if self.options.math {
            FormulaClosers::index(tokens)
        } else {
            FormulaClosers::default()
        };
        let mut errors = Vec::new();
        let scope = Scope {
            tokens,
            joined: &joined,
            words: &words,
            closers: &closers,
            start: 0,
            end: tokens.len(),
            options: self.options,
            in_link: false,
            in_failed_angle: false,
            depth: 0,
        };
        self.build_region(scope, tree, parent, &mut errors);
        tree.merge_text(parent);
        errors
    }

    fn build_region(&self, scope: Scope<'_>, tree: &mut Tree, parent: NodeId, errors: &mut Vec<ParseError>) {
        let mut region = Region::new(parent);
        let mut i = scope.start;

        while i < scope.end {
            let here = Scope {
                in_failed_angle: region.in_failed_angle,
                ..scope
            };
            let matched = InlineBuilder::ORDER.iter().find_map(|b| {
                let m = b.try_build(&here, i)?;
                #[cfg(feature = "trace")]
                log::trace!(target: "inkmark::inline", "{b:?} matched tokens {i}..{}", m.next);
                Some(m)
            });
            if let Some(m) = matched {
                debug_assert!(m.next > i);
                self.commit(m.built, &scope, tree, &mut region, errors);
                i = m.next;
                continue;
            }

            let token = &scope.tokens[i];
            match token.kind {
                TokenKind::Characters | TokenKind::Punctuation | TokenKind::CharacterReference => {
                    if token.is_punct('<') {
                        region.in_failed_angle = true;
                    } else if token.is_punct('>') {
                        region.in_failed_angle = false;
                    }
                    region.buffer(&token.text, token.range);
                }
                TokenKind::Whitespace => {
                    let line_end = scope.tokens.get(i + 1).is_none_or(|t| t.is_line_end());
                    if !line_end {
                        region.buffer(&token.text, token.range);
                    }
                }
                TokenKind::Eof if i + 1 == scope.tokens.len() => {}
                kind @ (TokenKind::Eof | TokenKind::Unclassified | TokenKind::Newline | TokenKind::HardBreak) => {
                    log::debug!(target: "inkmark::inline", "no inline builder accepted {kind:?} token #{i}");
                    errors.push(ParseError::Construction { index: i, kind });
                }
            }
            i += 1;
        }

        region.flush(tree);
        emphasis::process_emphasis(tree, parent, &mut region.delimiters);
    }

    fn commit(&self, built: Built, scope: &Scope<'_>, tree: &mut Tree, region: &mut Region, errors: &mut Vec<ParseError>) {
        match built {
            Built::Node { kind, range } => {
                region.flush(tree);
                tree.append(region.parent, kind, range);
            }
            Built::Wrapped { kind, text, range } => {
                region.flush(tree);
                let node = tree.append(region.parent, kind, range);
                let inner = Range::new(range.start + 1, range.end.saturating_sub(1).max(range.start + 1));
                tree.append(node, NodeKind::Text(text), inner);
            }
            Built::Span { kind, content, range } => {
                region.flush(tree);
                let is_link = matches!(kind, NodeKind::Link { .. });
                let node = tree.append(region.parent, kind, range);
                let nested = Scope {
                    start: content.start,
                    end: content.end,
                    in_link: scope.in_link || is_link,
                    in_failed_angle: false,
                    depth: scope.depth + 1,
                    ..*scope
                };
                self.build_region(nested, tree, node, errors);
                if !is_link {
                    let alt = tree.text_content(node);
                    tree.clear_children(node);
                    if let NodeKind::Image { alt: slot, .. } = &mut tree.get_mut(node).kind {
                        *slot = alt;
                    }
                }
            }
            Built::Delimiter { run, range } => {
                region.flush(tree);
                let text: String = std::iter::repeat_n(run.ch, run.len).collect();
                let node = tree.append(region.parent, NodeKind::Text(text), range);
                if region.delimiters.len() < limits::MAX_DELIMITER_RUNS {
                    region.delimiters.push(Delimiter::new(node, run));
                }
            }
            Built::Text { text, range } => region.buffer(&text, range),
            Built::Skip => {}
        }
    }
}

/// Build `tokens` under `parent` with default options.
///
/// # Example
/// ```
/// use inkmark::{build_inline, tokenize, NodeKind, Tree};
///
/// let (tokens, _) = tokenize("*foo*");
/// let mut tree = Tree::new();
/// let para = tree.append(tree.root(), NodeKind::Paragraph, Default::default());
/// let errors = build_inline(&tokens, &mut tree, para);
/// assert!(errors.is_empty());
/// assert_eq!(tree.outline(para), r#"Emphasis[Text("foo")]"#);
/// ```
pub fn build_inline(tokens: &[Token], tree: &mut Tree, parent: NodeId) -> Vec<ParseError> {
    InlineParser::default().build(tokens, tree, parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    fn outline_with(src: &str, options: Options) -> String {
        let (tokens, _) = tokenize(src);
        let mut tree = Tree::new();
        let root = tree.root();
        let errors = InlineParser::new(options).build(&tokens, &mut tree, root);
        assert!(errors.is_empty(), "{errors:?}");
        tree.outline(root)
    }

    fn outline(src: &str) -> String {
        outline_with(src, Options::default())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(outline("hello world"), r#"Text("hello world")"#);
    }

    #[test]
    fn test_soft_break() {
        assert_eq!(outline("foo\nbar"), r#"Text("foo"), SoftBreak, Text("bar")"#);
    }

    #[test]
    fn test_hard_breaks() {
        assert_eq!(outline("foo  \nbar"), r#"Text("foo"), HardBreak, Text("bar")"#);
        assert_eq!(outline("foo\\\nbar"), r#"Text("foo"), HardBreak, Text("bar")"#);
    }

    #[test]
    fn test_line_edges_are_trimmed() {
        assert_eq!(outline("foo \n   bar\n"), r#"Text("foo"), SoftBreak, Text("bar")"#);
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        assert_eq!(outline("foo\\"), r#"Text("foo\\")"#);
        assert_eq!(outline("foo\\\n"), r#"Text("foo\\")"#);
    }

    #[test]
    fn test_char_ref_node() {
        assert_eq!(outline("a &amp; b"), r#"Text("a "), CharRef("&amp;"), Text(" b")"#);
    }

    #[test]
    fn test_unclassified_token_is_reported() {
        let (tokens, lex_errors) = tokenize("a\0b");
        assert_eq!(lex_errors.len(), 1);
        let mut tree = Tree::new();
        let root = tree.root();
        let errors = build_inline(&tokens, &mut tree, root);
        assert_eq!(
            errors,
            vec![ParseError::Construction {
                index: 1,
                kind: TokenKind::Unclassified
            }]
        );
        assert_eq!(tree.outline(root), r#"Text("ab")"#);
    }

    #[test]
    fn test_stray_eof_is_reported() {
        let (mut tokens, _) = tokenize("a");
        let (tail, _) = tokenize("b");
        tokens.extend(tail);
        let mut tree = Tree::new();
        let root = tree.root();
        let errors = build_inline(&tokens, &mut tree, root);
        assert_eq!(errors.len(), 1);
        assert_eq!(tree.outline(root), r#"Text("ab")"#);
    }

    #[test]
    fn test_failed_angle_suppresses_literal_links() {
        assert_eq!(
            outline("<a http://example.com"),
            r#"Text("<a http://example.com")"#
        );
        assert_eq!(
            outline("a > http://example.com"),
            r#"Text("a > "), Link("http://example.com")[Text("http://example.com")]"#
        );
    }

    #[test]
    fn test_options_disable_builders() {
        let options = Options {
            allow_html: false,
            ..Options::default()
        };
        assert_eq!(outline_with("<b>", options), r#"Text("<b>")"#);

        let options = Options {
            autolink_literals: false,
            ..Options::default()
        };
        assert_eq!(outline_with("www.example.com", options), r#"Text("www.example.com")"#);
    }

    #[test]
    fn test_joined_token_lookup() {
        let (tokens, _) = tokenize("ab <c>");
        let joined = Joined::new(&tokens);
        assert_eq!(joined.offset(2), 3);
        assert_eq!(joined.token_at(3), Some(2));
        assert_eq!(joined.token_at(4), Some(3));
        assert_eq!(joined.slice(3, 6), "<c>");
    }
}
