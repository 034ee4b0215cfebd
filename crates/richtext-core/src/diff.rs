//! Plain-text snapshot diffing.
//!
//! The host text box only reports the text it holds *after* an edit. This module
//! recovers a single edit from two snapshots by stripping the longest common prefix and
//! then the longest common suffix that does not overlap it.
//!
//! Offsets are expressed in **character offsets** (Unicode scalar values).

use crate::error::{EngineError, Result};
use crate::text::{char_len, split_at_char};

/// A single edit expressed in character offsets.
///
/// Semantics:
/// - `start` is a character offset in the "before" text.
/// - The removed range is `[start, start + removed_len())`.
/// - `added_text` is inserted at `start` after the removal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diff {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact removed text (may be empty).
    pub removed_text: String,
    /// Exact added text (may be empty).
    pub added_text: String,
}

impl Diff {
    /// Length of `removed_text` in characters.
    pub fn removed_len(&self) -> usize {
        char_len(&self.removed_text)
    }

    /// Length of `added_text` in characters.
    pub fn added_len(&self) -> usize {
        char_len(&self.added_text)
    }

    /// Exclusive end character offset in the "before" text.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.removed_len())
    }

    /// Returns `true` if the two snapshots were identical.
    pub fn is_empty(&self) -> bool {
        self.removed_text.is_empty() && self.added_text.is_empty()
    }

    /// Returns `true` for an insertion that removes nothing.
    pub fn is_pure_insertion(&self) -> bool {
        self.removed_text.is_empty() && !self.added_text.is_empty()
    }

    /// Returns `true` for a deletion that inserts nothing.
    pub fn is_pure_deletion(&self) -> bool {
        !self.removed_text.is_empty() && self.added_text.is_empty()
    }

    /// Apply this edit to `text`.
    ///
    /// Fails with [`EngineError::InvalidRange`] if the removed span does not fit.
    pub fn apply_to(&self, text: &str) -> Result<String> {
        let len = char_len(text);
        let end = self.end();
        if self.start > len || end > len {
            return Err(EngineError::invalid_range(self.start, end, len));
        }

        let (head, rest) = split_at_char(text, self.start);
        let (_, tail) = split_at_char(rest, self.removed_len());
        let mut out = String::with_capacity(head.len() + self.added_text.len() + tail.len());
        out.push_str(head);
        out.push_str(&self.added_text);
        out.push_str(tail);
        Ok(out)
    }
}

/// Compute the minimal single edit turning `prev` into `next`.
///
/// The suffix scan never crosses the prefix boundary, so repeated characters
/// (`"aaa"` -> `"aaaa"`) produce an insertion at the end of the common prefix.
pub fn diff(prev: &str, next: &str) -> Diff {
    let prev_chars: Vec<char> = prev.chars().collect();
    let next_chars: Vec<char> = next.chars().collect();

    let mut start = 0;
    while start < prev_chars.len()
        && start < next_chars.len()
        && prev_chars[start] == next_chars[start]
    {
        start += 1;
    }

    let mut prev_end = prev_chars.len();
    let mut next_end = next_chars.len();
    while prev_end > start && next_end > start && prev_chars[prev_end - 1] == next_chars[next_end - 1]
    {
        prev_end -= 1;
        next_end -= 1;
    }

    Diff {
        start,
        removed_text: prev_chars[start..prev_end].iter().collect(),
        added_text: next_chars[start..next_end].iter().collect(),
    }
}
