//! Command Interface Layer
//!
//! Provides a unified command interface for host text-box integration.
//!
//! # Overview
//!
//! [`CommandExecutor`] is the editing session. It owns the run list, the last plain text
//! reported by the host (the *baseline*), the current selection and an optional
//! [`PendingToggle`]. Hosts drive it with three kinds of commands:
//!
//! - **Text**: the host reports the text it now holds, or resets it
//! - **Selection**: the host reports a new selection snapshot
//! - **Style**: toggle a flag, set a color, or restyle every match of a query
//!
//! Every command runs to completion: diff, apply, normalize. A failed command leaves the
//! session exactly as it was.
//!
//! # Example
//!
//! ```rust
//! use richtext_core::{AnnotationFlag, Command, CommandExecutor, Run, SelectionCommand, StyleCommand, TextCommand};
//!
//! let mut executor = CommandExecutor::empty();
//!
//! executor.execute(Command::Text(TextCommand::Changed { text: "Hello world".to_string() })).unwrap();
//! executor.execute(Command::Selection(SelectionCommand::Set { start: 6, end: 11 })).unwrap();
//! executor.execute(Command::Style(StyleCommand::Toggle { flag: AnnotationFlag::Bold })).unwrap();
//!
//! assert_eq!(executor.runs(), &[
//!     Run::plain("Hello "),
//!     Run::new("world", AnnotationFlag::Bold.into()),
//! ]);
//! ```

use crate::annotations::{AnnotationFlag, Color};
use crate::diff::{Diff, diff};
use crate::document::{Document, Run};
use crate::edit::{self, PendingResolution};
use crate::error::{EngineError, Result};
use crate::normalize::normalize;
use crate::offsets::OffsetEncoding;
use crate::search::{self, MatchOptions};
use crate::selection::Selection;
use crate::text::char_len;
use crate::toggle::{self, FlagState, PendingToggle};

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Unit of the offsets exchanged with the host (selections in and out).
    pub offset_encoding: OffsetEncoding,
}

impl EngineConfig {
    /// Use `encoding` for host offsets.
    pub fn with_offset_encoding(mut self, encoding: OffsetEncoding) -> Self {
        self.offset_encoding = encoding;
        self
    }
}

/// Text commands reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCommand {
    /// The host text box now holds `text`.
    Changed {
        /// Full plain text after the edit.
        text: String,
    },
    /// Replace the whole document with unstyled `text`.
    SetValue {
        /// New plain text.
        text: String,
    },
}

/// Selection commands reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCommand {
    /// The host selection is now `[start, end)` (either order, host offset encoding).
    Set {
        /// Anchor offset.
        start: usize,
        /// Active offset.
        end: usize,
    },
}

/// Formatting commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleCommand {
    /// Toggle a flag over the selection, or arm/disarm it at the caret.
    Toggle {
        /// Flag to toggle.
        flag: AnnotationFlag,
    },
    /// Same as [`StyleCommand::Toggle`], with the flag given by name.
    ToggleNamed {
        /// Flag name, e.g. `"bold"` or `"lineThrough"`.
        name: String,
    },
    /// Set the color of the selected text.
    SetColor {
        /// New color.
        color: Color,
    },
    /// Toggle a flag on every occurrence of `query` in the plain text.
    ToggleMatches {
        /// Text or regex to look for.
        query: String,
        /// Flag to toggle on each match.
        flag: AnnotationFlag,
        /// How the query matches.
        options: MatchOptions,
    },
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text commands
    Text(TextCommand),
    /// Selection commands
    Selection(SelectionCommand),
    /// Style commands
    Style(StyleCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// The run list to render after a text change.
    Runs(Vec<Run>),
    /// The run list after restyling, plus the host selection to restore so the caret
    /// does not jump.
    Styled {
        /// Runs to render.
        runs: Vec<Run>,
        /// Selection start (host encoding).
        start: usize,
        /// Selection end (host encoding).
        end: usize,
    },
    /// The pending toggle after a caret toggle.
    Pending(Option<PendingToggle>),
    /// Number of matches restyled by [`StyleCommand::ToggleMatches`].
    MatchesToggled {
        /// Match count.
        count: usize,
    },
    /// The run list no longer matched the baseline and was rebuilt, unstyled, from the
    /// host text.
    Resynchronized(Vec<Run>),
}

/// Editing session: run list, baseline text, selection and pending toggle.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    document: Document,
    /// Last plain text the host reported (or that the engine produced).
    baseline: String,
    /// Current selection in char offsets.
    selection: Selection,
    pending: Option<PendingToggle>,
    config: EngineConfig,
    /// Diff applied by the last text command (cleared on each `execute()` call).
    last_diff: Option<Diff>,
}

impl CommandExecutor {
    /// Create a session holding `text` as one unstyled run.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, EngineConfig::default())
    }

    /// Create an empty session.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(text: &str, config: EngineConfig) -> Self {
        Self {
            document: Document::from_text(text),
            baseline: text.to_string(),
            selection: Selection::caret(char_len(text)),
            pending: None,
            config,
            last_diff: None,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The current runs, for rendering.
    pub fn runs(&self) -> &[Run] {
        self.document.runs()
    }

    /// The baseline plain text.
    pub fn text(&self) -> &str {
        &self.baseline
    }

    /// Current selection in char offsets.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Current selection in the host's offset encoding.
    pub fn host_selection(&self) -> (usize, usize) {
        let encoding = self.config.offset_encoding;
        (
            encoding.from_char_offset(&self.baseline, self.selection.start),
            encoding.from_char_offset(&self.baseline, self.selection.end),
        )
    }

    /// The armed pending toggle, if any.
    pub fn pending_toggle(&self) -> Option<PendingToggle> {
        self.pending
    }

    /// Diff applied by the last command, if it was a text change.
    pub fn last_diff(&self) -> Option<&Diff> {
        self.last_diff.as_ref()
    }

    /// Take the diff applied by the last command.
    pub fn take_last_diff(&mut self) -> Option<Diff> {
        self.last_diff.take()
    }

    /// Replace the run list wholesale (e.g. runs restored by the host).
    ///
    /// The baseline is left alone: if `document` does not spell the baseline text, the
    /// next text change detects the mismatch and resynchronizes. The selection is clamped
    /// to the new document.
    pub fn replace_document(&mut self, document: Document) {
        self.document = normalize(document);
        self.selection = self.selection.clamp_to(self.document.char_count());
        self.pending = None;
    }

    /// Check that the runs still spell the baseline text.
    pub fn check_baseline(&self) -> Result<()> {
        let text = self.document.text();
        if text != self.baseline {
            return Err(EngineError::InconsistentBaseline {
                expected: char_len(&self.baseline),
                actual: char_len(&text),
            });
        }
        Ok(())
    }

    /// Whether `flag` is on, off or mixed over the current selection.
    pub fn flag_state(&self, flag: AnnotationFlag) -> Result<FlagState> {
        toggle::flag_state(&self.document, self.selection, flag, self.pending)
    }

    /// Execute command
    pub fn execute(&mut self, command: Command) -> Result<CommandResult> {
        self.last_diff = None;

        match command {
            Command::Text(TextCommand::Changed { text }) => self.execute_text_changed(text),
            Command::Text(TextCommand::SetValue { text }) => Ok(self.execute_set_value(text)),
            Command::Selection(SelectionCommand::Set { start, end }) => {
                self.execute_set_selection(start, end)
            }
            Command::Style(StyleCommand::Toggle { flag }) => self.execute_toggle(flag),
            Command::Style(StyleCommand::ToggleNamed { name }) => {
                let flag = name.parse::<AnnotationFlag>()?;
                self.execute_toggle(flag)
            }
            Command::Style(StyleCommand::SetColor { color }) => self.execute_set_color(color),
            Command::Style(StyleCommand::ToggleMatches {
                query,
                flag,
                options,
            }) => self.execute_toggle_matches(&query, flag, options),
        }
    }

    /// Execute commands in order, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<Vec<CommandResult>> {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    /// Host callback: the text box now holds `text`.
    pub fn on_text_changed(&mut self, text: &str) -> Result<&[Run]> {
        self.execute(Command::Text(TextCommand::Changed {
            text: text.to_string(),
        }))?;
        Ok(self.runs())
    }

    /// Host callback: the selection is now `[start, end)` in host offsets.
    pub fn on_selection_changed(&mut self, start: usize, end: usize) -> Result<()> {
        self.execute(Command::Selection(SelectionCommand::Set { start, end }))
            .map(|_| ())
    }

    /// Toolbar action: toggle `flag` at the current selection.
    pub fn toggle_annotation(&mut self, flag: AnnotationFlag) -> Result<CommandResult> {
        self.execute(Command::Style(StyleCommand::Toggle { flag }))
    }

    /// Toolbar action with the flag given by name.
    pub fn toggle_annotation_named(&mut self, name: &str) -> Result<CommandResult> {
        self.execute(Command::Style(StyleCommand::ToggleNamed {
            name: name.to_string(),
        }))
    }

    /// Toolbar action: set the color of the selected text.
    pub fn set_color(&mut self, color: Color) -> Result<CommandResult> {
        self.execute(Command::Style(StyleCommand::SetColor { color }))
    }

    /// Reset to a single unstyled run holding `text`.
    pub fn set_value(&mut self, text: &str) {
        self.execute_set_value(text.to_string());
    }

    fn execute_text_changed(&mut self, text: String) -> Result<CommandResult> {
        if let Err(err) = self.check_baseline() {
            tracing::error!(error = %err, "runs diverged from baseline; rebuilding from host text");
            self.resynchronize(text);
            return Ok(CommandResult::Resynchronized(self.document.runs().to_vec()));
        }

        let change = diff(&self.baseline, &text);
        if change.is_empty() {
            return Ok(CommandResult::Runs(self.document.runs().to_vec()));
        }

        let outcome = edit::apply_with_pending(&self.document, &change, self.pending)?;
        if outcome.pending.clears_pending() {
            self.pending = None;
        }
        debug_assert!(
            outcome.pending != PendingResolution::Kept,
            "non-empty edit must resolve the pending toggle"
        );

        self.document = outcome.document;
        self.baseline = text;
        self.selection = self.selection.clamp_to(self.document.char_count());
        self.last_diff = Some(change);

        Ok(CommandResult::Runs(self.document.runs().to_vec()))
    }

    fn resynchronize(&mut self, text: String) {
        self.document = Document::from_text(&text);
        self.baseline = text;
        self.selection = self.selection.clamp_to(self.document.char_count());
        self.pending = None;
    }

    fn execute_set_value(&mut self, text: String) -> CommandResult {
        self.document = Document::from_text(&text);
        self.selection = Selection::caret(self.document.char_count());
        self.baseline = text;
        self.pending = None;
        CommandResult::Runs(self.document.runs().to_vec())
    }

    fn execute_set_selection(&mut self, start: usize, end: usize) -> Result<CommandResult> {
        let encoding = self.config.offset_encoding;
        let host_len = encoding.len(&self.baseline);
        let (lo, hi) = (start.min(end), start.max(end));
        if hi > host_len {
            return Err(EngineError::invalid_range(lo, hi, host_len));
        }

        self.selection = Selection::new(
            encoding.to_char_offset(&self.baseline, lo),
            encoding.to_char_offset(&self.baseline, hi),
        );
        Ok(CommandResult::Success)
    }

    fn execute_toggle(&mut self, flag: AnnotationFlag) -> Result<CommandResult> {
        if self.selection.is_caret() {
            self.pending = toggle::arm(self.pending, self.selection.start, flag);
            return Ok(CommandResult::Pending(self.pending));
        }

        let toggled = toggle::toggle(&self.document, self.selection, flag)?;
        self.document = normalize(toggled);
        Ok(self.styled_result())
    }

    fn execute_set_color(&mut self, color: Color) -> Result<CommandResult> {
        if self.selection.is_caret() {
            return Ok(CommandResult::Success);
        }

        let colored = toggle::set_color(&self.document, self.selection, &color)?;
        self.document = normalize(colored);
        Ok(self.styled_result())
    }

    fn execute_toggle_matches(
        &mut self,
        query: &str,
        flag: AnnotationFlag,
        options: MatchOptions,
    ) -> Result<CommandResult> {
        let matches = search::match_selections(&self.baseline, query, options)?;

        let mut document = self.document.clone();
        for &selection in &matches {
            document = normalize(toggle::toggle(&document, selection, flag)?);
        }
        self.document = document;

        tracing::debug!(query, %flag, count = matches.len(), "toggled matches");
        Ok(CommandResult::MatchesToggled {
            count: matches.len(),
        })
    }

    fn styled_result(&self) -> CommandResult {
        let (start, end) = self.host_selection();
        CommandResult::Styled {
            runs: self.document.runs().to_vec(),
            start,
            end,
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::empty()
    }
}
