//! Finding the spans a bulk restyle applies to.
//!
//! [`StyleCommand::ToggleMatches`](crate::StyleCommand::ToggleMatches) styles every occurrence
//! of a query in the host text. [`match_selections`] turns the query into [`Selection`]s in
//! char offsets, ready to hand to [`toggle`](crate::toggle::toggle) one by one.

use crate::error::{EngineError, Result};
use crate::selection::Selection;
use crate::text::CharIndex;
use regex::{Regex, RegexBuilder};

/// How a query picks out the text to restyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Letter case must match exactly.
    pub case_sensitive: bool,
    /// Skip occurrences glued to a letter, digit or `_` on either side.
    pub whole_word: bool,
    /// The query is a regex pattern rather than literal text.
    pub regex: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

fn build_matcher(query: &str, options: MatchOptions) -> Result<Regex> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|err| EngineError::InvalidPattern {
            pattern: query.to_string(),
            message: err.to_string(),
        })
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// `bytes` must lie on char boundaries of `text`.
fn stands_alone(text: &str, bytes: std::ops::Range<usize>) -> bool {
    let before = text[..bytes.start].chars().next_back();
    let after = text[bytes.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Selections covering every non-overlapping occurrence of `query` in `text`, left to right.
///
/// An empty query selects nothing, and zero-width regex matches are skipped: toggling a
/// caret would arm a pending toggle instead of restyling text.
pub fn match_selections(text: &str, query: &str, options: MatchOptions) -> Result<Vec<Selection>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let matcher = build_matcher(query, options)?;
    let index = CharIndex::new(text);

    let selections: Vec<Selection> = matcher
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .filter(|m| !options.whole_word || stands_alone(text, m.range()))
        .map(|m| Selection::new(index.byte_to_char(m.start()), index.byte_to_char(m.end())))
        .collect();

    tracing::trace!(query, count = selections.len(), "matched restyle spans");
    Ok(selections)
}
