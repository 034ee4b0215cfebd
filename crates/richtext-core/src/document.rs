//! Runs and documents.
//!
//! A [`Document`] is an ordered list of [`Run`]s. The concatenation of the runs' text is
//! the document's plain text, character for character. Public constructors always hand
//! back a canonical document (see [`crate::normalize::normalize`]):
//!
//! 1. no two adjacent runs have equal [`AnnotationSet`]s,
//! 2. no run has empty text, except the single run of an empty document.

use crate::annotations::AnnotationSet;
use crate::normalize::normalize_runs;
use crate::text::{char_len, slice_chars, split_at_char};
use std::ops::Range;

/// A text slice with one annotation set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    /// The run's text. Empty only transiently, or in an empty document.
    pub text: String,
    /// The run's style.
    pub annotations: AnnotationSet,
}

impl Run {
    /// Create a run.
    pub fn new(text: impl Into<String>, annotations: AnnotationSet) -> Self {
        Self {
            text: text.into(),
            annotations,
        }
    }

    /// Create an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, AnnotationSet::plain())
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    /// Returns `true` if the run holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Split into `[0, local)` and `[local, len)`, both keeping this run's annotations.
    pub fn split_at(&self, local: usize) -> (Run, Run) {
        let (head, tail) = split_at_char(&self.text, local);
        (
            Run::new(head, self.annotations.clone()),
            Run::new(tail, self.annotations.clone()),
        )
    }

    /// Copy of the characters in `range` (local char offsets, clamped to the run).
    pub fn slice(&self, range: Range<usize>) -> Run {
        Run::new(slice_chars(&self.text, range), self.annotations.clone())
    }
}

/// An ordered sequence of runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    runs: Vec<Run>,
}

impl Document {
    /// Empty document: a single empty run with default annotations.
    pub fn new() -> Self {
        Self {
            runs: vec![Run::default()],
        }
    }

    /// Document holding `text` as one unstyled run.
    pub fn from_text(text: &str) -> Self {
        Self {
            runs: vec![Run::plain(text)],
        }
    }

    /// Build a canonical document from arbitrary runs.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            runs: normalize_runs(runs),
        }
    }

    /// Wrap runs as-is. Used for intermediate results that the caller normalizes.
    pub(crate) fn from_raw(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// The runs, in order.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Consume the document and return its runs.
    pub fn into_runs(self) -> Vec<Run> {
        self.runs
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Total length in characters.
    pub fn char_count(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    /// Returns `true` if the document holds no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    /// Returns `true` if the run list already satisfies the canonical-form invariants.
    pub fn is_canonical(&self) -> bool {
        match self.runs.as_slice() {
            [] => false,
            [only] => !only.is_empty() || only.annotations == AnnotationSet::default(),
            runs => {
                runs.iter().all(|run| !run.is_empty())
                    && runs
                        .windows(2)
                        .all(|pair| pair[0].annotations != pair[1].annotations)
            }
        }
    }

    /// Annotations of the character at `offset`, or `None` past the end.
    pub fn annotations_at(&self, offset: usize) -> Option<&AnnotationSet> {
        self.run_ranges()
            .find(|(range, _)| range.contains(&offset))
            .map(|(_, run)| &run.annotations)
    }

    /// Iterate over runs together with their character range in the plain text.
    pub fn run_ranges(&self) -> impl Iterator<Item = (Range<usize>, &Run)> + '_ {
        self.runs.iter().scan(0usize, |consumed, run| {
            let start = *consumed;
            *consumed += run.char_len();
            Some((start..*consumed, run))
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
