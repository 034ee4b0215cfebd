//! Mapping plain-text offsets to runs.
//!
//! An offset that falls exactly on the boundary between two runs is ambiguous. Callers
//! pick a [`BoundaryPolicy`] to resolve it:
//!
//! | policy                          | boundary offset resolves to        |
//! |---------------------------------|------------------------------------|
//! | [`BoundaryPolicy::Insertion`]    | end of the preceding run (append)  |
//! | [`BoundaryPolicy::SelectionEnd`] | end of the run holding `offset - 1` |
//!
//! The two agree on canonical documents; they differ on transient empty runs, which an
//! insertion may land in but which never contain a selected character.

use crate::document::{Document, Run};
use crate::error::{EngineError, Result};

/// How to resolve an offset that sits exactly on a run boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// `offset <= run_end`: the first run whose end is at or after the offset.
    Insertion,
    /// `offset - 1 < run_end`: the run holding the character just before the offset.
    SelectionEnd,
}

/// A run index plus a character offset local to that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPosition {
    /// Index into [`Document::runs`].
    pub run_index: usize,
    /// Character offset inside the run, `0..=run.char_len()`.
    pub local_offset: usize,
}

impl RunPosition {
    /// Create a run position.
    pub const fn new(run_index: usize, local_offset: usize) -> Self {
        Self {
            run_index,
            local_offset,
        }
    }
}

/// Locate `offset` in `document` under `policy`.
///
/// Fails with [`EngineError::InvalidRange`] if `offset` is past the end of the text.
pub fn locate(document: &Document, offset: usize, policy: BoundaryPolicy) -> Result<RunPosition> {
    locate_in(document.runs(), offset, policy)
}

pub(crate) fn locate_in(runs: &[Run], offset: usize, policy: BoundaryPolicy) -> Result<RunPosition> {
    let len: usize = runs.iter().map(Run::char_len).sum();
    if offset > len || runs.is_empty() {
        return Err(EngineError::invalid_range(offset, offset, len));
    }

    let (target, adjust) = match policy {
        BoundaryPolicy::Insertion => (offset, 0),
        BoundaryPolicy::SelectionEnd if offset == 0 => return Ok(RunPosition::new(0, 0)),
        BoundaryPolicy::SelectionEnd => (offset - 1, 1),
    };

    let mut consumed = 0;
    for (run_index, run) in runs.iter().enumerate() {
        let run_end = consumed + run.char_len();
        let inside = match policy {
            BoundaryPolicy::Insertion => target <= run_end,
            BoundaryPolicy::SelectionEnd => target < run_end,
        };
        if inside {
            let position = RunPosition::new(run_index, target - consumed + adjust);
            tracing::trace!(offset, ?policy, ?position, "located offset");
            return Ok(position);
        }
        consumed = run_end;
    }

    Err(EngineError::invalid_range(offset, offset, len))
}
