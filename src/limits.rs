//! DoS prevention constants.
//!
//! These limits keep pathological inputs from causing quadratic or
//! worse time complexity in the tokenizer and the inline builders.

/// Maximum recursion depth for nested inline regions (link text inside link text
/// is disallowed, but images may nest inside links).
pub const MAX_INLINE_NESTING: usize = 32;

/// Maximum backtick run length for code spans (prevents O(n^2) matching).
/// Longer runs are treated as literal text.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum parentheses nesting in link destinations.
pub const MAX_LINK_PAREN_DEPTH: usize = 32;

/// Maximum bracket depth when matching `[` with `]`.
pub const MAX_BRACKET_DEPTH: usize = 32;

/// Longest named character reference in the HTML5 table
/// (`&CounterClockwiseContourIntegral;` has 31 name bytes).
pub const MAX_ENTITY_NAME_LEN: usize = 32;

/// Maximum decimal digits in a numeric character reference.
pub const MAX_DECIMAL_REF_DIGITS: usize = 7;

/// Maximum hex digits in a numeric character reference.
pub const MAX_HEX_REF_DIGITS: usize = 6;

/// Autolink scheme length bounds.
pub const MIN_SCHEME_LEN: usize = 2;
pub const MAX_SCHEME_LEN: usize = 32;

/// Upper bound on the number of delimiter runs tracked per inline region.
/// Further runs stay literal text.
pub const MAX_DELIMITER_RUNS: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_INLINE_NESTING >= 16) };
        const { assert!(MAX_CODE_SPAN_BACKTICKS >= 16) };
        const { assert!(MIN_SCHEME_LEN < MAX_SCHEME_LEN) };
        const { assert!(MAX_ENTITY_NAME_LEN >= 31) };
    }
}
