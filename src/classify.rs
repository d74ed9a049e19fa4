//! Character classification for tokenization and flanking rules.
//!
//! All functions are pure and total. ASCII is answered from lookup tables;
//! non-ASCII falls back to `char` properties plus a compact table of the
//! common Unicode punctuation blocks.

/// Lookup table for ASCII punctuation (CommonMark definition).
/// Every entry is also backslash-escapable.
static ASCII_PUNCT: [bool; 128] = {
    let mut table = [false; 128];
    let chars = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
    let mut i = 0;
    while i < chars.len() {
        table[chars[i] as usize] = true;
        i += 1;
    }
    table
};

/// Non-ASCII punctuation and symbol ranges treated as punctuation for flanking.
const UNICODE_PUNCT_RANGES: &[(u32, u32)] = &[
    (0x00A1, 0x00BF), // Latin-1 punctuation and symbols
    (0x00D7, 0x00D7), // multiplication sign
    (0x00F7, 0x00F7), // division sign
    (0x2010, 0x2027), // dashes, quotes, bullets
    (0x2030, 0x205E), // per mille, primes, guillemets
    (0x2190, 0x23FF), // arrows, math operators, technical
    (0x2500, 0x27BF), // box drawing, shapes, dingbats
    (0x27C0, 0x27FF), // misc math symbols
    (0x2E00, 0x2E7F), // supplemental punctuation
    (0x3001, 0x3003), // CJK comma, full stop, ditto
    (0x3008, 0x3011), // CJK brackets
    (0x3014, 0x301F), // CJK brackets
    (0xFE10, 0xFE19), // vertical forms
    (0xFE30, 0xFE4F), // CJK compatibility forms
    (0xFF01, 0xFF0F), // fullwidth punctuation
    (0xFF1A, 0xFF20),
    (0xFF3B, 0xFF40),
    (0xFF5B, 0xFF65),
];

/// Whitespace other than line endings: space, tab, vertical tab, form feed
/// and Unicode space separators.
#[inline]
pub fn is_whitespace(ch: char) -> bool {
    match ch {
        ' ' | '\t' | '\u{0B}' | '\u{0C}' => true,
        '\n' | '\r' => false,
        c if c.is_ascii() => false,
        c => c.is_whitespace(),
    }
}

/// Line ending characters.
#[inline]
pub fn is_line_ending(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// CommonMark punctuation: ASCII punctuation plus Unicode punctuation and symbols.
#[inline]
pub fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ASCII_PUNCT[ch as usize];
    }
    let cp = ch as u32;
    UNICODE_PUNCT_RANGES
        .iter()
        .any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// ASCII punctuation only. Drives token boundaries in the lexer.
#[inline]
pub fn is_ascii_punctuation(b: u8) -> bool {
    b < 128 && ASCII_PUNCT[b as usize]
}

/// Characters that a backslash can escape.
#[inline]
pub fn is_escapable(ch: char) -> bool {
    ch.is_ascii() && ASCII_PUNCT[ch as usize]
}

/// Classification of the character next to a delimiter run.
/// Start and end of input count as whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    Punctuation,
    Other,
}

impl CharClass {
    /// Classify an optional neighbouring character.
    #[inline]
    pub fn of(ch: Option<char>) -> Self {
        match ch {
            None => CharClass::Whitespace,
            Some(c) if is_whitespace(c) || is_line_ending(c) => CharClass::Whitespace,
            Some(c) if is_punctuation(c) => CharClass::Punctuation,
            Some(_) => CharClass::Other,
        }
    }
}
