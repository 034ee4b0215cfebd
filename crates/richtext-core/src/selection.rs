use crate::error::{EngineError, Result};
use std::ops::Range;

/// Selection range in character offsets, `start <= end`.
///
/// `start == end` is a caret with no selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Selection {
    /// Create a selection from two endpoints in either order.
    pub fn new(anchor: usize, active: usize) -> Self {
        Self {
            start: anchor.min(active),
            end: anchor.max(active),
        }
    }

    /// Zero-width selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns `true` for a zero-width selection.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// The selection as a half-open range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Copy with both endpoints clamped to `len`.
    pub fn clamp_to(&self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }

    /// Check that the selection fits a text of `len` characters.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.start > self.end || self.end > len {
            return Err(EngineError::invalid_range(self.start, self.end, len));
        }
        Ok(())
    }
}
