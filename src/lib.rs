//! inkmark: the inline engine of a CommonMark parser
//!
//! Two phases turn one block's text into inline nodes:
//! 1. [`tokenize`]: a mode-stack lexer produces a lossless token stream
//!    (code spans, raw HTML and autolinks switch lexing modes).
//! 2. [`build_inline`]: ordered inline builders turn tokens into nodes under
//!    a parent supplied by the block layer, then delimiter runs are resolved
//!    into emphasis, strong and strike nodes.
//!
//! # Design Principles
//! - No panics on input: failures are recorded and parsing continues
//! - No regex: byte-level scanners shared by both phases
//! - Builders are pure: a failed attempt leaves no trace
//! - Source ranges on every token and node

pub mod classify;
pub mod entity;
pub mod error;
pub mod escape;
pub mod inline;
pub mod lexer;
pub mod limits;
pub mod node;
pub mod range;
pub mod scan;

// Re-export primary types
pub use error::ParseError;
pub use inline::{build_inline, InlineBuilder, InlineParser};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use node::{BreakKind, NodeData, NodeId, NodeKind, Tree};
pub use range::Range;

/// Inline parsing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Raw inline HTML becomes `Html` nodes.
    pub allow_html: bool,
    /// Bare URLs and email addresses become links.
    pub autolink_literals: bool,
    /// `~text~` and `~~text~~` become `Strike` nodes.
    pub strikethrough: bool,
    /// `$x$` and `$$x$$` become `FormulaInline` nodes.
    pub math: bool,
    /// Inline links and images.
    pub links: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allow_html: true,
            autolink_literals: true,
            strikethrough: true,
            math: true,
            links: true,
        }
    }
}

/// Result of [`parse_inline`].
#[derive(Debug, Clone)]
pub struct InlineDocument {
    pub tree: Tree,
    /// The `Document` root.
    pub root: NodeId,
    /// The `Paragraph` holding the inline content.
    pub paragraph: NodeId,
    /// Lexical errors followed by construction errors.
    pub errors: Vec<ParseError>,
}

/// Parse one block's inline text into a `Document > Paragraph` tree.
///
/// # Example
/// ```
/// use inkmark::{parse_inline, Options};
///
/// let doc = parse_inline("**bold *and italic***", &Options::default());
/// assert_eq!(
///     doc.tree.outline(doc.paragraph),
///     r#"Strong[Text("bold "), Emphasis[Text("and italic")]]"#
/// );
/// ```
pub fn parse_inline(text: &str, options: &Options) -> InlineDocument {
    let (tokens, mut errors) = tokenize(text);
    let mut tree = Tree::new();
    let root = tree.root();
    let paragraph = tree.append(root, NodeKind::Paragraph, Range::from_usize(0, text.len()));
    errors.extend(InlineParser::new(*options).build(&tokens, &mut tree, paragraph));
    InlineDocument {
        tree,
        root,
        paragraph,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_structure() {
        let doc = parse_inline("hi", &Options::default());
        assert_eq!(doc.tree.kind(doc.root), &NodeKind::Document);
        assert_eq!(doc.tree.parent(doc.paragraph), Some(doc.root));
        assert_eq!(doc.tree.outline(doc.root), r#"Paragraph[Text("hi")]"#);
        assert!(doc.errors.is_empty());
    }

    #[test]
    fn test_errors_from_both_phases() {
        let doc = parse_inline("\0", &Options::default());
        assert_eq!(doc.errors.len(), 2);
        assert!(doc.errors[0].is_lexical());
        assert!(!doc.errors[1].is_lexical());
    }

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert!(options.allow_html && options.autolink_literals && options.strikethrough);
        assert!(options.math && options.links);
    }
}
