//! Applying and removing annotations.
//!
//! For a non-empty selection, [`toggle`] restyles the covered characters right away. The
//! outcome is decided once for the whole selection: if every covered run already has the
//! flag it is turned off everywhere, otherwise it is turned on everywhere. A mixed
//! selection therefore always ends up uniformly on, and toggling it again turns it
//! uniformly off rather than restoring the original mix.
//!
//! A caret has no characters to restyle yet, so [`arm`] records a [`PendingToggle`] that
//! the next insertion at the caret consumes (see [`crate::edit::apply_with_pending`]).
//!
//! [`toggle`] and [`set_color`] return un-normalized documents; run
//! [`crate::normalize::normalize`] before handing the result to a host.

use crate::annotations::{AnnotationFlag, AnnotationSet, Color};
use crate::document::{Document, Run};
use crate::error::Result;
use crate::locate::{BoundaryPolicy, RunPosition, locate_in};
use crate::selection::Selection;
use std::ops::Range;

/// A formatting request armed at a caret, applied to the next text typed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    /// Caret offset (characters) the toggle is armed at.
    pub position: usize,
    /// Flag to flip relative to the neighbouring run.
    pub flag: AnnotationFlag,
}

impl PendingToggle {
    /// Create a pending toggle.
    pub const fn new(position: usize, flag: AnnotationFlag) -> Self {
        Self { position, flag }
    }
}

/// Whether a flag is set over a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    /// Every covered character has the flag.
    On,
    /// No covered character has the flag.
    Off,
    /// Some covered characters have it, some do not.
    Mixed,
}

/// Toggle `flag` over a non-empty `selection`.
///
/// A caret selection returns the document unchanged; use [`arm`] for carets.
pub fn toggle(document: &Document, selection: Selection, flag: AnnotationFlag) -> Result<Document> {
    let runs = document.runs();
    selection.validate(document.char_count())?;
    if selection.is_caret() {
        return Ok(document.clone());
    }

    let start = locate_in(runs, selection.start, BoundaryPolicy::Insertion)?;
    let end = locate_in(runs, selection.end, BoundaryPolicy::SelectionEnd)?;

    if start.run_index == end.run_index {
        let run = &runs[start.run_index];
        let flipped = run.annotations.toggled(flag);
        return Ok(Document::from_raw(rebuild(
            runs,
            start.run_index..=start.run_index,
            |_| start.local_offset..end.local_offset,
            |_| flipped.clone(),
        )));
    }

    let covered = |index: usize| covered_range(runs, index, start, end);
    let all_set = (start.run_index..=end.run_index)
        .filter(|&index| !covered(index).is_empty())
        .all(|index| runs[index].annotations.contains(flag));
    let value = !all_set;

    tracing::debug!(
        start = selection.start,
        end = selection.end,
        %flag,
        value,
        "toggling flag across runs"
    );

    Ok(Document::from_raw(rebuild(
        runs,
        start.run_index..=end.run_index,
        covered,
        |annotations| annotations.with(flag, value),
    )))
}

/// Set `color` on every character of a non-empty `selection`.
///
/// A caret selection returns the document unchanged.
pub fn set_color(document: &Document, selection: Selection, color: &Color) -> Result<Document> {
    let runs = document.runs();
    selection.validate(document.char_count())?;
    if selection.is_caret() {
        return Ok(document.clone());
    }

    let start = locate_in(runs, selection.start, BoundaryPolicy::Insertion)?;
    let end = locate_in(runs, selection.end, BoundaryPolicy::SelectionEnd)?;

    Ok(Document::from_raw(rebuild(
        runs,
        start.run_index..=end.run_index,
        |index| covered_range(runs, index, start, end),
        |annotations| annotations.with_color(color.clone()),
    )))
}

/// Arm or disarm a pending toggle at `caret`.
///
/// Requesting the flag that is already pending at the same caret disarms it. Anything
/// else replaces the current pending toggle.
pub fn arm(pending: Option<PendingToggle>, caret: usize, flag: AnnotationFlag) -> Option<PendingToggle> {
    let request = PendingToggle::new(caret, flag);
    if pending == Some(request) {
        tracing::debug!(position = caret, %flag, "pending toggle disarmed");
        None
    } else {
        tracing::debug!(position = caret, %flag, "pending toggle armed");
        Some(request)
    }
}

/// Report whether `flag` is on, off or mixed over `selection`.
///
/// For a caret, the run an insertion at the caret would extend decides, and a matching
/// pending toggle inverts the answer.
pub fn flag_state(
    document: &Document,
    selection: Selection,
    flag: AnnotationFlag,
    pending: Option<PendingToggle>,
) -> Result<FlagState> {
    let runs = document.runs();
    selection.validate(document.char_count())?;

    if selection.is_caret() {
        let at = locate_in(runs, selection.start, BoundaryPolicy::Insertion)?;
        let mut on = runs[at.run_index].annotations.contains(flag);
        if pending == Some(PendingToggle::new(selection.start, flag)) {
            on = !on;
        }
        return Ok(if on { FlagState::On } else { FlagState::Off });
    }

    let start = locate_in(runs, selection.start, BoundaryPolicy::Insertion)?;
    let end = locate_in(runs, selection.end, BoundaryPolicy::SelectionEnd)?;
    let (mut with, mut without) = (0usize, 0usize);
    for index in start.run_index..=end.run_index {
        if covered_range(runs, index, start, end).is_empty() {
            continue;
        }
        if runs[index].annotations.contains(flag) {
            with += 1;
        } else {
            without += 1;
        }
    }

    Ok(match (with, without) {
        (_, 0) => FlagState::On,
        (0, _) => FlagState::Off,
        _ => FlagState::Mixed,
    })
}

/// Local range of run `index` covered by the selection `[start, end]`.
fn covered_range(runs: &[Run], index: usize, start: RunPosition, end: RunPosition) -> Range<usize> {
    let from = if index == start.run_index {
        start.local_offset
    } else {
        0
    };
    let to = if index == end.run_index {
        end.local_offset
    } else {
        runs[index].char_len()
    };
    from..to.max(from)
}

/// Copy `runs`, splitting each run in `affected` into prefix / covered / suffix pieces and
/// restyling the covered piece. Empty pieces are omitted.
fn rebuild(
    runs: &[Run],
    affected: std::ops::RangeInclusive<usize>,
    covered: impl Fn(usize) -> Range<usize>,
    restyle: impl Fn(&AnnotationSet) -> AnnotationSet,
) -> Vec<Run> {
    let mut out = Vec::with_capacity(runs.len() + 2);
    for (index, run) in runs.iter().enumerate() {
        if !affected.contains(&index) {
            out.push(run.clone());
            continue;
        }

        let range = covered(index);
        let len = run.char_len();
        let pieces = [
            run.slice(0..range.start),
            Run::new(run.slice(range.clone()).text, restyle(&run.annotations)),
            run.slice(range.end..len),
        ];
        out.extend(pieces.into_iter().filter(|piece| !piece.is_empty()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::normalize::normalize;

    fn bold(text: &str) -> Run {
        Run::new(text, AnnotationFlag::Bold.into())
    }

    fn toggled(doc: &Document, start: usize, end: usize) -> Document {
        normalize(toggle(doc, Selection::new(start, end), AnnotationFlag::Bold).unwrap())
    }

    #[test]
    fn test_same_run_splits_into_three() {
        let doc = Document::from_text("abcdef");
        let raw = toggle(&doc, Selection::new(2, 4), AnnotationFlag::Bold).unwrap();
        assert_eq!(
            raw.runs(),
            &[Run::plain("ab"), bold("cd"), Run::plain("ef")]
        );
    }

    #[test]
    fn test_same_run_omits_empty_pieces() {
        let doc = Document::from_text("abc");
        let raw = toggle(&doc, Selection::new(0, 3), AnnotationFlag::Bold).unwrap();
        assert_eq!(raw.runs(), &[bold("abc")]);

        let raw = toggle(&doc, Selection::new(0, 1), AnnotationFlag::Bold).unwrap();
        assert_eq!(raw.runs(), &[bold("a"), Run::plain("bc")]);
    }

    #[test]
    fn test_same_run_toggle_off() {
        let doc = Document::from_runs(vec![bold("abcdef")]);
        assert_eq!(
            toggled(&doc, 1, 5).runs(),
            &[bold("a"), Run::plain("bcde"), bold("f")]
        );
    }

    #[test]
    fn test_mixed_selection_turns_on_everywhere() {
        let doc = Document::from_runs(vec![Run::plain("abc"), bold("def"), Run::plain("ghi")]);
        let once = toggled(&doc, 1, 8);
        assert_eq!(once.runs(), &[Run::plain("a"), bold("bcdefgh"), Run::plain("i")]);

        // Second toggle: everything covered is bold now, so it all turns off.
        let twice = toggled(&once, 1, 8);
        assert_eq!(twice.runs(), &[Run::plain("abcdefghi")]);
    }

    #[test]
    fn test_all_set_turns_off_everywhere() {
        let italic_bold = AnnotationSet::from(AnnotationFlag::Bold).toggled(AnnotationFlag::Italic);
        let doc = Document::from_runs(vec![bold("abc"), Run::new("def", italic_bold)]);
        let out = toggled(&doc, 0, 6);
        assert_eq!(
            out.runs(),
            &[
                Run::plain("abc"),
                Run::new("def", AnnotationFlag::Italic.into())
            ]
        );
    }

    #[test]
    fn test_selection_starting_at_boundary_ignores_uncovered_run() {
        // Start offset 3 resolves to the end of "abc", which contributes no characters.
        let doc = Document::from_runs(vec![Run::plain("abc"), bold("def"), Run::plain("g")]);
        let out = toggled(&doc, 3, 6);
        assert_eq!(out.runs(), &[Run::plain("abcdefg")]);
    }

    #[test]
    fn test_uniform_double_toggle_restores() {
        let doc = Document::from_runs(vec![Run::plain("abc"), bold("def")]);
        let back = toggled(&toggled(&doc, 0, 3), 0, 3);
        assert_eq!(back, doc);
    }

    #[test]
    fn test_caret_and_invalid_selection() {
        let doc = Document::from_text("abc");
        assert_eq!(
            toggle(&doc, Selection::caret(1), AnnotationFlag::Bold).unwrap(),
            doc
        );
        assert_eq!(
            toggle(&doc, Selection::new(1, 5), AnnotationFlag::Bold),
            Err(EngineError::InvalidRange {
                start: 1,
                end: 5,
                len: 3
            })
        );
    }

    #[test]
    fn test_set_color_across_runs() {
        let red = Color::new("red");
        let doc = Document::from_runs(vec![Run::plain("ab"), bold("cd")]);
        let out = normalize(set_color(&doc, Selection::new(1, 3), &red).unwrap());
        assert_eq!(
            out.runs(),
            &[
                Run::plain("a"),
                Run::new("b", AnnotationSet::plain().with_color(red.clone())),
                Run::new("c", AnnotationSet::from(AnnotationFlag::Bold).with_color(red)),
                bold("d"),
            ]
        );
    }

    #[test]
    fn test_arm_and_disarm() {
        let armed = arm(None, 3, AnnotationFlag::Bold);
        assert_eq!(armed, Some(PendingToggle::new(3, AnnotationFlag::Bold)));
        assert_eq!(arm(armed, 3, AnnotationFlag::Bold), None);
        assert_eq!(
            arm(armed, 3, AnnotationFlag::Italic),
            Some(PendingToggle::new(3, AnnotationFlag::Italic))
        );
        assert_eq!(
            arm(armed, 1, AnnotationFlag::Bold),
            Some(PendingToggle::new(1, AnnotationFlag::Bold))
        );
    }

    #[test]
    fn test_flag_state() {
        let doc = Document::from_runs(vec![Run::plain("abc"), bold("def")]);
        let state = |start, end| flag_state(&doc, Selection::new(start, end), AnnotationFlag::Bold, None);
        assert_eq!(state(0, 3).unwrap(), FlagState::Off);
        assert_eq!(state(3, 6).unwrap(), FlagState::On);
        assert_eq!(state(2, 4).unwrap(), FlagState::Mixed);
        // Caret at the boundary: typing there would extend "abc".
        assert_eq!(state(3, 3).unwrap(), FlagState::Off);
        assert_eq!(state(4, 4).unwrap(), FlagState::On);

        let pending = Some(PendingToggle::new(3, AnnotationFlag::Bold));
        assert_eq!(
            flag_state(&doc, Selection::caret(3), AnnotationFlag::Bold, pending).unwrap(),
            FlagState::On
        );
    }
}
