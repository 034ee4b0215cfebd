//! Canonicalization of run lists.

use crate::document::{Document, Run};

/// Restore canonical form: drop empty runs and merge neighbours with equal annotations.
///
/// A document that ends up with no runs becomes a single empty run with default
/// annotations. Idempotent, and never changes the concatenated text.
pub fn normalize(document: Document) -> Document {
    Document::from_raw(normalize_runs(document.into_runs()))
}

pub(crate) fn normalize_runs(runs: Vec<Run>) -> Vec<Run> {
    let input_len = runs.len();
    let mut out: Vec<Run> = Vec::with_capacity(input_len);

    for run in runs {
        if run.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.annotations == run.annotations => last.text.push_str(&run.text),
            _ => out.push(run),
        }
    }

    if out.is_empty() {
        out.push(Run::default());
    }

    tracing::trace!(input_len, output_len = out.len(), "normalized runs");
    out
}
