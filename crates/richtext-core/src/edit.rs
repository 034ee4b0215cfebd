//! Integrating plain-text edits into the run list.
//!
//! Cases, in priority order:
//!
//! 1. **Append at document end**: `start >= len` extends the last run.
//! 2. **Same-run edit**: start and end resolve to the same run; that run's text is
//!    rewritten in place and keeps its annotations.
//! 3. **Cross-run edit**: the start run keeps its prefix plus the added text, the end run
//!    keeps its suffix after the removed span, and every run strictly between is dropped.
//!
//! A plain edit never invents styling: added text takes the start run's annotations.
//! The only exception is a [`PendingToggle`] armed at the insertion point, handled by
//! [`apply_with_pending`].

use crate::annotations::{AnnotationFlag, AnnotationSet};
use crate::diff::Diff;
use crate::document::{Document, Run};
use crate::error::{EngineError, Result};
use crate::locate::{BoundaryPolicy, locate_in};
use crate::normalize::normalize_runs;
use crate::text::{slice_chars, split_at_char};
use crate::toggle::PendingToggle;

/// What happened to an armed pending toggle while applying an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingResolution {
    /// No pending toggle was armed.
    Idle,
    /// The edit was empty; the pending toggle stays armed.
    Kept,
    /// The edit was a pure insertion at the armed position and started a new run.
    Consumed,
    /// The edit did not match; the pending toggle was dropped unused.
    Discarded,
}

impl PendingResolution {
    /// Returns `true` if the caller should clear its pending toggle.
    pub fn clears_pending(self) -> bool {
        matches!(self, PendingResolution::Consumed | PendingResolution::Discarded)
    }
}

/// Result of [`apply_with_pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The new, normalized document.
    pub document: Document,
    /// Fate of the pending toggle passed in.
    pub pending: PendingResolution,
}

/// Apply `diff` to `document` and normalize the result.
///
/// Fails with [`EngineError::InvalidRange`] (leaving `document` untouched) if the diff's
/// start or removed span does not fit in the document.
pub fn apply(document: &Document, diff: &Diff) -> Result<Document> {
    validate(document, diff)?;
    let runs = splice(document.runs(), diff)?;
    Ok(Document::from_raw(normalize_runs(runs)))
}

/// Apply `diff`, first giving an armed pending toggle the chance to consume it.
///
/// A pure insertion at `pending.position` becomes a new run whose annotations are the
/// neighbouring run's with `pending.flag` flipped. An insertion the diff placed further
/// right counts too, if moving it back to the caret gives the same text. Any other non-empty edit discards
/// the pending toggle and is applied as a plain edit.
pub fn apply_with_pending(
    document: &Document,
    diff: &Diff,
    pending: Option<PendingToggle>,
) -> Result<EditOutcome> {
    validate(document, diff)?;

    let Some(pending) = pending else {
        return Ok(EditOutcome {
            document: Document::from_raw(normalize_runs(splice(document.runs(), diff)?)),
            pending: PendingResolution::Idle,
        });
    };

    if diff.is_empty() {
        return Ok(EditOutcome {
            document: document.clone(),
            pending: PendingResolution::Kept,
        });
    }

    let at_caret = if diff.is_pure_insertion() {
        shift_insertion(document, diff, pending.position)
    } else {
        None
    };

    if let Some(shifted) = at_caret {
        let runs = insert_toggled(document.runs(), &shifted, pending.flag)?;
        tracing::debug!(
            position = pending.position,
            flag = %pending.flag,
            inserted = diff.added_len(),
            "pending toggle consumed"
        );
        return Ok(EditOutcome {
            document: Document::from_raw(normalize_runs(runs)),
            pending: PendingResolution::Consumed,
        });
    }

    tracing::debug!(
        position = pending.position,
        flag = %pending.flag,
        edit_start = diff.start,
        "pending toggle discarded"
    );
    Ok(EditOutcome {
        document: Document::from_raw(normalize_runs(splice(document.runs(), diff)?)),
        pending: PendingResolution::Discarded,
    })
}

/// Re-anchor a pure insertion at `position` if it produces the same text there.
///
/// The snapshot diff keeps the longest common prefix, so typing a character that repeats
/// the text right after the caret shows up further right than where it was typed. Moving
/// `added` left to `position` is valid when `between + added == added' + between`, where
/// `between` is the text from `position` to `diff.start`.
fn shift_insertion(document: &Document, diff: &Diff, position: usize) -> Option<Diff> {
    if position == diff.start {
        return Some(diff.clone());
    }
    if position > diff.start {
        return None;
    }

    let text = document.text();
    let between = slice_chars(&text, position..diff.start);
    let mut combined = String::with_capacity(between.len() + diff.added_text.len());
    combined.push_str(between);
    combined.push_str(&diff.added_text);

    let (moved, rest) = split_at_char(&combined, diff.added_len());
    if rest != between {
        return None;
    }

    tracing::trace!(from = diff.start, to = position, "insertion re-anchored at pending caret");
    Some(Diff {
        start: position,
        removed_text: String::new(),
        added_text: moved.to_string(),
    })
}

fn validate(document: &Document, diff: &Diff) -> Result<()> {
    let len = document.char_count();
    let end = diff.end();
    if diff.start > len || end > len {
        return Err(EngineError::invalid_range(diff.start, end, len));
    }
    Ok(())
}

/// Build the new run list for a plain edit. Output is not normalized.
fn splice(runs: &[Run], diff: &Diff) -> Result<Vec<Run>> {
    let len: usize = runs.iter().map(Run::char_len).sum();

    tracing::debug!(
        start = diff.start,
        removed = diff.removed_len(),
        added = diff.added_len(),
        runs = runs.len(),
        "applying edit"
    );

    if diff.start >= len {
        let mut out = runs.to_vec();
        match out.last_mut() {
            Some(last) => last.text.push_str(&diff.added_text),
            None => out.push(Run::plain(diff.added_text.as_str())),
        }
        return Ok(out);
    }

    let start = locate_in(runs, diff.start, BoundaryPolicy::Insertion)?;
    let end = locate_in(runs, diff.end(), BoundaryPolicy::SelectionEnd)?;
    let mut out = Vec::with_capacity(runs.len() + 1);

    if end.run_index <= start.run_index {
        let run = &runs[start.run_index];
        let local_end = start.local_offset + diff.removed_len();
        let head = run.slice(0..start.local_offset);
        let tail = run.slice(local_end..run.char_len());

        let mut text =
            String::with_capacity(head.text.len() + diff.added_text.len() + tail.text.len());
        text.push_str(&head.text);
        text.push_str(&diff.added_text);
        text.push_str(&tail.text);

        out.extend_from_slice(&runs[..start.run_index]);
        out.push(Run::new(text, run.annotations.clone()));
        out.extend_from_slice(&runs[start.run_index + 1..]);
        return Ok(out);
    }

    let first = &runs[start.run_index];
    let last = &runs[end.run_index];

    let mut head = first.slice(0..start.local_offset);
    head.text.push_str(&diff.added_text);
    let tail = last.slice(end.local_offset..last.char_len());

    out.extend_from_slice(&runs[..start.run_index]);
    out.push(head);
    out.push(tail);
    out.extend_from_slice(&runs[end.run_index + 1..]);
    Ok(out)
}

/// Split the run at the insertion point and put the added text in a new run in between.
fn insert_toggled(runs: &[Run], diff: &Diff, flag: AnnotationFlag) -> Result<Vec<Run>> {
    if runs.is_empty() {
        return Ok(vec![Run::new(
            diff.added_text.as_str(),
            AnnotationSet::default().toggled(flag),
        )]);
    }

    let at = locate_in(runs, diff.start, BoundaryPolicy::Insertion)?;
    let neighbour = &runs[at.run_index];
    let (before, after) = neighbour.split_at(at.local_offset);
    let inserted = Run::new(
        diff.added_text.as_str(),
        neighbour.annotations.toggled(flag),
    );

    let mut out = Vec::with_capacity(runs.len() + 2);
    out.extend_from_slice(&runs[..at.run_index]);
    out.push(before);
    out.push(inserted);
    out.push(after);
    out.extend_from_slice(&runs[at.run_index + 1..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;

    fn bold(text: &str) -> Run {
        Run::new(text, AnnotationFlag::Bold.into())
    }

    fn doc(runs: Vec<Run>) -> Document {
        Document::from_runs(runs)
    }

    fn edit(start: usize, removed: &str, added: &str) -> Diff {
        Diff {
            start,
            removed_text: removed.to_string(),
            added_text: added.to_string(),
        }
    }

    #[test]
    fn test_insert_at_run_end_appends() {
        let d = doc(vec![Run::plain("ab")]);
        let out = apply(&d, &edit(2, "", "c")).unwrap();
        assert_eq!(out.runs(), &[Run::plain("abc")]);
    }

    #[test]
    fn test_insert_at_boundary_extends_preceding_run() {
        let d = doc(vec![Run::plain("ab"), bold("cd")]);
        let out = apply(&d, &edit(2, "", "X")).unwrap();
        assert_eq!(out.runs(), &[Run::plain("abX"), bold("cd")]);
    }

    #[test]
    fn test_insert_at_start_goes_to_first_run() {
        let d = doc(vec![bold("ab"), Run::plain("cd")]);
        let out = apply(&d, &edit(0, "", "X")).unwrap();
        assert_eq!(out.runs(), &[bold("Xab"), Run::plain("cd")]);
    }

    #[test]
    fn test_append_to_empty_document() {
        let out = apply(&Document::new(), &edit(0, "", "hi")).unwrap();
        assert_eq!(out.runs(), &[Run::plain("hi")]);
    }

    #[test]
    fn test_same_run_replace() {
        let d = doc(vec![Run::plain("ab"), bold("cdef"), Run::plain("g")]);
        let out = apply(&d, &edit(3, "de", "XYZ")).unwrap();
        assert_eq!(
            out.runs(),
            &[Run::plain("ab"), bold("cXYZf"), Run::plain("g")]
        );
    }

    #[test]
    fn test_same_run_delete_whole_run_merges_neighbours() {
        let d = doc(vec![Run::plain("ab"), bold("cd"), Run::plain("ef")]);
        let out = apply(&d, &edit(2, "cd", "")).unwrap();
        assert_eq!(out.runs(), &[Run::plain("abef")]);
    }

    #[test]
    fn test_cross_run_deletion() {
        let d = doc(vec![Run::plain("Hello "), bold("world")]);
        let out = apply(&d, &edit(3, "lo wo", "")).unwrap();
        assert_eq!(out.runs(), &[Run::plain("Hel"), bold("rld")]);
    }

    #[test]
    fn test_cross_run_replace_drops_middle_runs() {
        let italic = |t: &str| Run::new(t, AnnotationFlag::Italic.into());
        let d = doc(vec![Run::plain("abc"), bold("def"), italic("ghi")]);
        let out = apply(&d, &edit(1, "bcdefgh", "Z")).unwrap();
        assert_eq!(out.runs(), &[Run::plain("aZ"), italic("i")]);
    }

    #[test]
    fn test_replace_starting_at_boundary_uses_start_run_style() {
        let d = doc(vec![Run::plain("abc"), bold("def")]);
        let out = apply(&d, &edit(3, "de", "X")).unwrap();
        assert_eq!(out.runs(), &[Run::plain("abcX"), bold("f")]);
    }

    #[test]
    fn test_delete_everything() {
        let d = doc(vec![Run::plain("ab"), bold("cd")]);
        let out = apply(&d, &edit(0, "abcd", "")).unwrap();
        assert_eq!(out, Document::new());
    }

    #[test]
    fn test_invalid_range_rejected() {
        let d = doc(vec![Run::plain("abc")]);
        assert_eq!(
            apply(&d, &edit(4, "", "x")),
            Err(EngineError::InvalidRange {
                start: 4,
                end: 4,
                len: 3
            })
        );
        assert!(apply(&d, &edit(2, "cd", "")).is_err());
        assert!(apply_with_pending(&d, &edit(9, "", "x"), None).is_err());
    }

    #[test]
    fn test_pending_consumed_by_insertion_at_position() {
        let d = doc(vec![Run::plain("abc")]);
        let pending = PendingToggle::new(3, AnnotationFlag::Bold);
        let out = apply_with_pending(&d, &edit(3, "", "X"), Some(pending)).unwrap();
        assert_eq!(out.pending, PendingResolution::Consumed);
        assert_eq!(out.document.runs(), &[Run::plain("abc"), bold("X")]);
    }

    #[test]
    fn test_pending_consumed_mid_run_splits_it() {
        let d = doc(vec![bold("abcd")]);
        let pending = PendingToggle::new(2, AnnotationFlag::Bold);
        let out = apply_with_pending(&d, &edit(2, "", "X"), Some(pending)).unwrap();
        assert_eq!(
            out.document.runs(),
            &[bold("ab"), Run::plain("X"), bold("cd")]
        );
    }

    #[test]
    fn test_pending_consumed_in_empty_document() {
        let pending = PendingToggle::new(0, AnnotationFlag::Italic);
        let out = apply_with_pending(&Document::new(), &edit(0, "", "hi"), Some(pending)).unwrap();
        assert_eq!(
            out.document.runs(),
            &[Run::new("hi", AnnotationFlag::Italic.into())]
        );
    }

    #[test]
    fn test_pending_consumed_when_typed_text_repeats_following_text() {
        // Typing " " at the end of "Hello" diffs as an insertion after the existing space.
        let d = doc(vec![Run::plain("Hello world")]);
        let pending = PendingToggle::new(5, AnnotationFlag::Bold);
        let change = diff("Hello world", "Hello  world");
        assert_eq!(change.start, 6);

        let out = apply_with_pending(&d, &change, Some(pending)).unwrap();
        assert_eq!(out.pending, PendingResolution::Consumed);
        assert_eq!(
            out.document.runs(),
            &[Run::plain("Hello"), bold(" "), Run::plain(" world")]
        );
    }

    #[test]
    fn test_pending_discarded_when_insertion_cannot_move_to_caret() {
        let d = doc(vec![Run::plain("abcd")]);
        let pending = PendingToggle::new(1, AnnotationFlag::Bold);
        let out = apply_with_pending(&d, &edit(3, "", "x"), Some(pending)).unwrap();
        assert_eq!(out.pending, PendingResolution::Discarded);
        assert_eq!(out.document.runs(), &[Run::plain("abcxd")]);
    }

    #[test]
    fn test_pending_discarded_by_deletion() {
        let d = doc(vec![Run::plain("abc")]);
        let pending = PendingToggle::new(3, AnnotationFlag::Bold);
        let out = apply_with_pending(&d, &diff("abc", "ab"), Some(pending)).unwrap();
        assert_eq!(out.pending, PendingResolution::Discarded);
        assert_eq!(out.document.runs(), &[Run::plain("ab")]);
    }

    #[test]
    fn test_pending_discarded_by_insertion_elsewhere() {
        let d = doc(vec![Run::plain("abc")]);
        let pending = PendingToggle::new(3, AnnotationFlag::Bold);
        let out = apply_with_pending(&d, &edit(1, "", "X"), Some(pending)).unwrap();
        assert_eq!(out.pending, PendingResolution::Discarded);
        assert_eq!(out.document.runs(), &[Run::plain("aXbc")]);
    }

    #[test]
    fn test_pending_kept_on_empty_diff() {
        let d = doc(vec![Run::plain("abc")]);
        let pending = PendingToggle::new(3, AnnotationFlag::Bold);
        let out = apply_with_pending(&d, &diff("abc", "abc"), Some(pending)).unwrap();
        assert_eq!(out.pending, PendingResolution::Kept);
        assert!(!out.pending.clears_pending());
        assert_eq!(out.document, d);
    }
}
