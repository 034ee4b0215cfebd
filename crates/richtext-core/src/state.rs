//! Editor State Interface
//!
//! Exposes the session to a frontend as immutable snapshots, with version tracking and
//! change notifications.
//!
//! # Overview
//!
//! - **State Queries**: document, selection and formatting snapshots
//! - **Version Tracking**: the version increments only when a command actually changed something
//! - **Change Notifications**: subscribers receive one [`StateChange`] per kind of change
//! - **Modification Tracking**: text and style edits mark the document modified until saved
//!
//! # Example
//!
//! ```rust
//! use richtext_core::{Command, EditorStateManager, TextCommand};
//!
//! let mut manager = EditorStateManager::new("Hello");
//!
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! manager.execute(Command::Text(TextCommand::Changed { text: "Hello!".to_string() })).unwrap();
//!
//! let doc_state = manager.get_document_state();
//! assert!(doc_state.is_modified);
//! assert_eq!(doc_state.version, 1);
//! ```

use crate::annotations::AnnotationFlag;
use crate::commands::{Command, CommandExecutor, CommandResult};
use crate::diff::Diff;
use crate::document::Document;
use crate::error::Result;
use crate::selection::Selection;
use crate::toggle::{FlagState, PendingToggle};
use std::sync::Arc;

/// Document state
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Number of runs
    pub run_count: usize,
    /// Total document character count
    pub char_count: usize,
    /// Whether document has been modified
    pub is_modified: bool,
    /// Document version number (incremented after each change)
    pub version: u64,
}

/// Selection state
#[derive(Debug, Clone)]
pub struct SelectionState {
    /// Selection in char offsets
    pub selection: Selection,
    /// Selection start in the host's offset encoding
    pub host_start: usize,
    /// Selection end in the host's offset encoding
    pub host_end: usize,
    /// Armed pending toggle, if any
    pub pending: Option<PendingToggle>,
}

/// Formatting state over the current selection, for toolbar buttons.
#[derive(Debug, Clone)]
pub struct StyleState {
    /// State of every flag, in [`AnnotationFlag::ALL`] order.
    pub flags: Vec<(AnnotationFlag, FlagState)>,
}

impl StyleState {
    /// State of `flag`, if known.
    pub fn get(&self, flag: AnnotationFlag) -> Option<FlagState> {
        self.flags
            .iter()
            .find(|(candidate, _)| *candidate == flag)
            .map(|(_, state)| *state)
    }
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Text content modified
    DocumentModified,
    /// Selection changed
    SelectionChanged,
    /// Annotations changed without a text change
    StyleChanged,
    /// Pending toggle armed, disarmed, consumed or discarded
    PendingToggleChanged,
    /// Runs were rebuilt from the host text after a baseline mismatch
    Resynchronized,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Text diff for document changes (if available).
    pub diff: Option<Arc<Diff>>,
}

impl StateChange {
    /// Create a new state change record.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            diff: None,
        }
    }

    /// Attach the text diff to this change record.
    pub fn with_diff(mut self, diff: Arc<Diff>) -> Self {
        self.diff = Some(diff);
        self
    }
}

/// Complete editor state snapshot
#[derive(Debug, Clone)]
pub struct EditorState {
    /// Document state
    pub document: DocumentState,
    /// Selection state
    pub selection: SelectionState,
    /// Style state
    pub style: StyleState,
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Editor state manager
///
/// Wraps a [`CommandExecutor`]. Commands go through [`execute()`](EditorStateManager::execute),
/// which compares the session before and after and notifies subscribers of each kind of
/// change. Code that mutates the executor directly through
/// [`executor_mut()`](EditorStateManager::executor_mut) should call
/// [`mark_modified()`](EditorStateManager::mark_modified) afterwards.
pub struct EditorStateManager {
    executor: CommandExecutor,
    /// State version number
    state_version: u64,
    /// Whether document has been modified
    is_modified: bool,
    callbacks: Vec<StateChangeCallback>,
    /// Diff produced by the last text change.
    last_diff: Option<Arc<Diff>>,
}

impl EditorStateManager {
    /// Create a new state manager
    pub fn new(text: &str) -> Self {
        Self::from_executor(CommandExecutor::new(text))
    }

    /// Create an empty state manager
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Wrap an existing executor.
    pub fn from_executor(executor: CommandExecutor) -> Self {
        Self {
            executor,
            state_version: 0,
            is_modified: false,
            callbacks: Vec::new(),
            last_diff: None,
        }
    }

    /// Get a reference to the executor
    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Get a mutable reference to the executor
    pub fn executor_mut(&mut self) -> &mut CommandExecutor {
        &mut self.executor
    }

    /// Execute a command and notify subscribers of what it changed.
    ///
    /// A command that succeeds without changing anything (an identical text snapshot, a
    /// repeated selection) does not increment the version.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult> {
        let document_before: Document = self.executor.document().clone();
        let text_before = self.executor.text().to_string();
        let selection_before = self.executor.selection();
        let pending_before = self.executor.pending_toggle();

        let result = self.executor.execute(command)?;

        let mut changes: Vec<(StateChangeType, Option<Arc<Diff>>)> = Vec::new();
        if matches!(result, CommandResult::Resynchronized(_)) {
            self.last_diff = None;
            changes.push((StateChangeType::Resynchronized, None));
        } else if self.executor.text() != text_before {
            let diff = self.executor.take_last_diff().map(Arc::new);
            self.last_diff = diff.clone();
            changes.push((StateChangeType::DocumentModified, diff));
        } else if self.executor.document() != &document_before {
            changes.push((StateChangeType::StyleChanged, None));
        }

        if self.executor.selection() != selection_before {
            changes.push((StateChangeType::SelectionChanged, None));
        }
        if self.executor.pending_toggle() != pending_before {
            changes.push((StateChangeType::PendingToggleChanged, None));
        }

        self.record_changes(changes);
        Ok(result)
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Get complete editor state snapshot
    pub fn get_full_state(&self) -> EditorState {
        EditorState {
            document: self.get_document_state(),
            selection: self.get_selection_state(),
            style: self.get_style_state(),
        }
    }

    /// Get document state
    pub fn get_document_state(&self) -> DocumentState {
        let document = self.executor.document();
        DocumentState {
            run_count: document.runs().len(),
            char_count: document.char_count(),
            is_modified: self.is_modified,
            version: self.state_version,
        }
    }

    /// Get selection state
    pub fn get_selection_state(&self) -> SelectionState {
        let (host_start, host_end) = self.executor.host_selection();
        SelectionState {
            selection: self.executor.selection(),
            host_start,
            host_end,
            pending: self.executor.pending_toggle(),
        }
    }

    /// Get style state
    pub fn get_style_state(&self) -> StyleState {
        let flags = AnnotationFlag::ALL
            .into_iter()
            .filter_map(|flag| match self.executor.flag_state(flag) {
                Ok(state) => Some((flag, state)),
                Err(err) => {
                    tracing::warn!(?flag, error = %err, "flag state unavailable");
                    None
                }
            })
            .collect();
        StyleState { flags }
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    /// Increment the version number and notify subscribers
    pub fn mark_modified(&mut self, change_type: StateChangeType) {
        self.mark_modified_internal(change_type, None);
    }

    fn mark_modified_internal(&mut self, change_type: StateChangeType, diff: Option<Arc<Diff>>) {
        self.record_changes(vec![(change_type, diff)]);
    }

    /// Bump the version once and notify each change with the same version pair.
    fn record_changes(&mut self, changes: Vec<(StateChangeType, Option<Arc<Diff>>)>) {
        if changes.is_empty() {
            return;
        }

        let old_version = self.state_version;
        self.state_version += 1;

        // Only content changes dirty the document.
        if changes.iter().any(|(change_type, _)| {
            matches!(
                change_type,
                StateChangeType::DocumentModified
                    | StateChangeType::StyleChanged
                    | StateChangeType::Resynchronized
            )
        }) {
            self.is_modified = true;
        }

        for (change_type, diff) in changes {
            let mut change = StateChange::new(change_type, old_version, self.state_version);
            if let Some(diff) = diff {
                change = change.with_diff(diff);
            }
            self.notify_callbacks(&change);
        }
    }

    /// Mark document as unmodified (e.g., after saving)
    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }

    /// Get the diff produced by the last text change, if any.
    pub fn last_diff(&self) -> Option<&Diff> {
        self.last_diff.as_deref()
    }

    /// Take the diff produced by the last text change, if any.
    pub fn take_last_diff(&mut self) -> Option<Arc<Diff>> {
        self.last_diff.take()
    }

    fn notify_callbacks(&mut self, change: &StateChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}
