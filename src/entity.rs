//! Character reference recognition.
//!
//! Only validity is decided here. The raw reference text is kept as is;
//! turning it into Unicode scalars is up to whoever renders the tree.

use crate::limits;

/// Scan a character reference starting at `start` (which must be `&`).
///
/// Returns the end offset (just past `;`) when the reference is well formed:
/// - decimal `&#` + 1..=7 digits + `;`
/// - hex `&#x`/`&#X` + 1..=6 hex digits + `;`
/// - named `&` + alphanumeric name + `;`, present in the HTML5 entity table
///
/// Numeric values above U+10FFFF are rejected. `&#0;` is accepted.
pub fn scan_character_reference(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'&') {
        return None;
    }
    let mut i = start + 1;
    if bytes.get(i) == Some(&b'#') {
        i += 1;
        let is_hex = matches!(bytes.get(i), Some(b'x' | b'X'));
        if is_hex {
            i += 1;
        }
        let (radix, max_digits) = if is_hex {
            (16, limits::MAX_HEX_REF_DIGITS)
        } else {
            (10, limits::MAX_DECIMAL_REF_DIGITS)
        };
        let digits_start = i;
        let mut value: u32 = 0;
        while let Some(&b) = bytes.get(i) {
            let Some(digit) = (b as char).to_digit(radix) else {
                break;
            };
            if i - digits_start == max_digits {
                return None;
            }
            value = value * radix + digit;
            i += 1;
        }
        if i == digits_start || bytes.get(i) != Some(&b';') || value > 0x10FFFF {
            return None;
        }
        return Some(i + 1);
    }

    let name_start = i;
    if !bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    while bytes.get(i).is_some_and(u8::is_ascii_alphanumeric) {
        if i - name_start == limits::MAX_ENTITY_NAME_LEN {
            return None;
        }
        i += 1;
    }
    if bytes.get(i) != Some(&b';') {
        return None;
    }
    let raw = std::str::from_utf8(&bytes[start..=i]).ok()?;
    is_named_reference(raw).then_some(i + 1)
}

/// Check `&name;` against the HTML5 named character reference table.
///
/// Every HTML5 entity expands to one or two code points; a longer result
/// means only a legacy prefix (e.g. `&amp` in `&ampx;`) was decoded.
pub fn is_named_reference(raw: &str) -> bool {
    let decoded = html_escape::decode_html_entities(raw);
    decoded != raw && decoded.chars().count() <= 2
}
