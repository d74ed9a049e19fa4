//! Backtick run index.
//!
//! A code span opens only if a run of the same length appears later. The
//! index lists every backtick run by length once per source, so that
//! question is answered by advancing a per-length cursor instead of
//! rescanning the rest of the input at every run.

use memchr::memchr_iter;
use rustc_hash::FxHashMap;

use crate::limits;

#[derive(Debug, Default)]
struct RunList {
    starts: Vec<u32>,
    next: usize,
}

/// Start offsets of all backtick runs, grouped by run length.
#[derive(Debug, Default)]
pub struct BacktickRuns {
    by_len: FxHashMap<usize, RunList>,
}

impl BacktickRuns {
    /// Index every maximal backtick run in `source`.
    pub fn index(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut by_len: FxHashMap<usize, RunList> = FxHashMap::default();
        let mut skip_until = 0usize;
        for pos in memchr_iter(b'`', bytes) {
            if pos < skip_until {
                continue;
            }
            let len = bytes[pos..].iter().take_while(|&&b| b == b'`').count();
            skip_until = pos + len;
            if len <= limits::MAX_CODE_SPAN_BACKTICKS {
                by_len.entry(len).or_default().starts.push(pos as u32);
            }
        }
        Self { by_len }
    }

    /// Whether a run of exactly `len` backticks starts after `after`.
    ///
    /// Queries must come in increasing `after` order (the lexer only moves
    /// forward), which keeps the whole pass linear.
    pub fn has_closer(&mut self, len: usize, after: usize) -> bool {
        let Some(list) = self.by_len.get_mut(&len) else {
            return false;
        };
        while list.next < list.starts.len() && list.starts[list.next] as usize <= after {
            list.next += 1;
        }
        list.next < list.starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_lengths() {
        let mut runs = BacktickRuns::index("a `b` c ``d`` e `");
        assert!(runs.has_closer(1, 2));
        assert!(runs.has_closer(2, 8));
        assert!(!runs.has_closer(2, 11));
        assert!(!runs.has_closer(3, 0));
    }

    #[test]
    fn test_runs_are_maximal() {
        // "```" is one run of three, not three runs of one.
        let mut runs = BacktickRuns::index("` ```");
        assert!(!runs.has_closer(1, 0));
        assert!(runs.has_closer(3, 0));
    }

    #[test]
    fn test_overlong_runs_are_skipped() {
        let src = "`".repeat(limits::MAX_CODE_SPAN_BACKTICKS + 1);
        let mut runs = BacktickRuns::index(&format!("{src} {src}"));
        assert!(!runs.has_closer(limits::MAX_CODE_SPAN_BACKTICKS + 1, 0));
    }
}
