//! Destination encoding for autolinks.
//!
//! Fast-path optimized: scans for the first byte that needs encoding and
//! borrows the input untouched when there is none.

use memchr::memchr3;
use std::borrow::Cow;

/// Percent-encode `\`, `[` and `]` in an angle-bracket autolink destination.
///
/// Backslash escapes do not work inside autolinks, so the backslash is kept
/// as `%5C` instead of being interpreted.
///
/// # Example
/// ```
/// use inkmark::escape::encode_autolink_destination;
///
/// assert_eq!(encode_autolink_destination("https://a.b/c"), "https://a.b/c");
/// assert_eq!(encode_autolink_destination("http://a.b/\\[x]"), "http://a.b/%5C%5Bx%5D");
/// ```
pub fn encode_autolink_destination(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let Some(first) = memchr3(b'\\', b'[', b']', bytes) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 8);
    out.push_str(&input[..first]);
    let mut pos = first;
    while let Some(offset) = memchr3(b'\\', b'[', b']', &bytes[pos..]) {
        let at = pos + offset;
        out.push_str(&input[pos..at]);
        out.push_str(match bytes[at] {
            b'\\' => "%5C",
            b'[' => "%5B",
            _ => "%5D",
        });
        pos = at + 1;
    }
    out.push_str(&input[pos..]);
    Cow::Owned(out)
}
