//! Tokenizer tests: token shapes, mode transitions and source coverage.

use inkmark::lexer::Mode;
use inkmark::{tokenize, Lexer, Range, Token, TokenKind};
use proptest::prelude::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).0.into_iter().map(|t| t.kind).collect()
}

fn texts(src: &str) -> Vec<String> {
    tokenize(src).0.into_iter().map(|t| t.text).collect()
}

/// Every token starts where the previous one ended; `Eof` sits at the end.
fn assert_tiles(src: &str, tokens: &[Token]) {
    let mut at = 0u32;
    for token in tokens {
        assert_eq!(token.range.start, at, "gap before {token:?} in {src:?}");
        at = token.range.end;
    }
    let last = tokens.last().expect("at least Eof");
    assert_eq!(last.kind, TokenKind::Eof);
    assert_eq!(last.range, Range::empty_at(src.len() as u32));
}

#[test]
fn crlf_is_one_newline() {
    assert_eq!(
        kinds("a\r\nb"),
        vec![TokenKind::Characters, TokenKind::Newline, TokenKind::Characters, TokenKind::Eof]
    );
    assert_eq!(texts("a\r\nb")[1], "\r\n");
}

#[test]
fn escape_keeps_source_range() {
    let (tokens, _) = tokenize("a\\*b c");
    assert_eq!(tokens[0].text, "a*b");
    assert_eq!(tokens[0].range, Range::new(0, 4));
    assert_tiles("a\\*b c", &tokens);
}

#[test]
fn backslash_before_space_is_literal() {
    assert_eq!(texts("\\ x"), vec!["\\", " ", "x", ""]);
}

#[test]
fn hard_break_token() {
    assert_eq!(
        kinds("a\\\nb"),
        vec![
            TokenKind::Characters,
            TokenKind::HardBreak,
            TokenKind::Newline,
            TokenKind::Characters,
            TokenKind::Eof
        ]
    );
}

#[test]
fn character_references() {
    let (tokens, _) = tokenize("&copy; &#35; &#X22;");
    let refs: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::CharacterReference)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(refs, vec!["&copy;", "&#35;", "&#X22;"]);

    assert_eq!(texts("&bogus;"), vec!["&", "bogus", ";", ""]);
    assert_eq!(texts("&#12345678;")[0], "&");
}

#[test]
fn backtick_runs_are_whole_tokens() {
    assert_eq!(texts("``a``"), vec!["``", "a", "``", ""]);
}

#[test]
fn code_mode_backslash_before_backtick() {
    let mut lexer = Lexer::new("`a\\`");
    let tokens = lexer.tokenize();
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["`", "a\\", "`", ""]);
    assert_eq!(lexer.modes().depth(), 1);
}

#[test]
fn code_mode_keeps_escapes() {
    assert_eq!(texts("`\\*`"), vec!["`", "\\*", "`", ""]);
}

#[test]
fn tildes_are_single_tokens() {
    assert_eq!(texts("~~x~~"), vec!["~", "~", "x", "~", "~", ""]);
}

#[test]
fn tilde_fence_with_info_string() {
    let src = "~~~ rust\nx\n~~~";
    let mut lexer = Lexer::new(src);
    let tokens = lexer.tokenize();
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["~~~", " ", "rust", "\n", "x", "\n", "~~~", ""]);
    assert_eq!(lexer.modes().depth(), 1);
}

#[test]
fn unterminated_fence_stays_in_code() {
    let mut lexer = Lexer::new("```\n&amp;");
    let tokens = lexer.tokenize();
    assert_eq!(lexer.modes().current(), Mode::Code);
    assert_eq!(lexer.modes().depth(), 2);
    assert!(tokens.iter().all(|t| t.kind != TokenKind::CharacterReference));
}

#[test]
fn fence_needs_line_start() {
    let mut lexer = Lexer::new("a ```\nb");
    lexer.tokenize();
    assert_eq!(lexer.modes().depth(), 1);
}

#[test]
fn lone_angle_is_punctuation() {
    let mut lexer = Lexer::new("a < b");
    let tokens = lexer.tokenize();
    assert_eq!(tokens[2].kind, TokenKind::Punctuation);
    assert_eq!(tokens[2].text, "<");
    assert_eq!(lexer.modes().depth(), 1);
}

#[test]
fn autolink_mode_keeps_backslash() {
    assert!(texts("<https://a.b/\\x>").contains(&"\\x".to_string()));
}

#[test]
fn unicode_runs() {
    assert_eq!(texts("héllo wörld"), vec!["héllo", " ", "wörld", ""]);
    // Non-ASCII punctuation is part of a characters run.
    assert_eq!(texts("«a»"), vec!["«a»", ""]);
}

#[test]
fn nul_becomes_replacement() {
    let (tokens, errors) = tokenize("\0");
    assert_eq!(errors.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Unclassified);
    assert_eq!(tokens[0].text, "\u{FFFD}");
    assert_tiles("\0", &tokens);
}

#[test]
fn well_formed_input_returns_to_base_mode() {
    for src in ["`a` <b> <https://x.y> ```\nc\n```", "<!-- `x` -->", "``a ` b``"] {
        let mut lexer = Lexer::new(src);
        lexer.tokenize();
        assert_eq!(lexer.modes().depth(), 1, "{src:?}");
    }
}

/// Code spans, tags, comments, autolinks and plain words, one per item.
fn well_formed_piece() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}",
        "[a-z ]{1,6}".prop_map(|s| format!("`{s}`")),
        "[a-z]{1,3}".prop_map(|s| format!("``{s} ` {s}``")),
        "[a-z]{1,5}".prop_map(|s| format!("<{s}>")),
        "[a-z]{1,5}".prop_map(|s| format!("</{s}>")),
        "[a-z]{1,5}".prop_map(|s| format!("<a href=\"{s}\">")),
        "[a-z ]{0,6}".prop_map(|s| format!("<!--{s}-->")),
        "[a-z]{1,5}".prop_map(|s| format!("<https://{s}.io/{s}>")),
        "[a-z]{1,5}".prop_map(|s| format!("<{s}@example.com>")),
    ]
}

proptest! {
    #[test]
    fn well_formed_sequences_return_to_base_mode(
        pieces in prop::collection::vec(well_formed_piece(), 0..24),
    ) {
        let src = pieces.join(" ");
        let mut lexer = Lexer::new(&src);
        let tokens = lexer.tokenize();
        prop_assert_eq!(lexer.modes().depth(), 1);
        prop_assert_eq!(lexer.modes().current(), Mode::Normal);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn tokens_tile_any_input(src in any::<String>()) {
        let (tokens, _) = tokenize(&src);
        let mut at = 0u32;
        for token in &tokens {
            prop_assert_eq!(token.range.start, at);
            at = token.range.end;
        }
        prop_assert_eq!(at as usize, src.len());
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    #[test]
    fn tokens_are_lossless_without_escapes(src in "[a-z0-9 \t\n*_`~<>&#;!\\[\\]()$@.:/\"'=-]{0,64}") {
        let (tokens, errors) = tokenize(&src);
        prop_assert!(errors.is_empty());
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(joined, src.clone());
        for token in &tokens {
            prop_assert_eq!(token.range.text(&src), token.text.as_str());
        }
    }
}
