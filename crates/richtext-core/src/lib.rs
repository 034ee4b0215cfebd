#![warn(missing_docs)]
//! Richtext Core - Headless Annotated-Text Run Model
//!
//! # Overview
//!
//! `richtext-core` keeps a styled run list in sync with a plain-text box that only reports
//! its full contents. The host hands over each new text snapshot; the engine works out the
//! single contiguous edit that produced it, splices that edit into the runs, and hands
//! back runs ready to render. Formatting commands restyle the current selection, or arm a
//! pending toggle at a caret so the next typed characters come out styled.
//!
//! # Core Features
//!
//! - **Snapshot Diffing**: common prefix/suffix scan, O(n) per keystroke
//! - **Edit Reconciliation**: edits inherit the style of the text they extend
//! - **All-or-Nothing Toggles**: a mixed selection turns uniformly on, then uniformly off
//! - **Pending Toggles**: formatting at a caret applies to the next insertion there
//! - **Canonical Runs**: no empty runs and no equal neighbours after every command
//! - **State Tracking**: version numbers and change notifications
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface & State Management       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Edit Applier / Annotation Toggler          │  ← Run Transformations
//! ├─────────────────────────────────────────────┤
//! │  Diff Engine / Run Locator / Normalizer     │  ← Primitives
//! ├─────────────────────────────────────────────┤
//! │  Runs & Annotation Sets                     │  ← Data Model
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using Command Interface
//!
//! ```rust
//! use richtext_core::{AnnotationFlag, CommandExecutor, Run};
//!
//! let mut executor = CommandExecutor::new("Hello");
//!
//! // Caret at the end, toggle bold, then type.
//! executor.on_selection_changed(5, 5).unwrap();
//! executor.toggle_annotation(AnnotationFlag::Bold).unwrap();
//! executor.on_text_changed("Hello world").unwrap();
//!
//! assert_eq!(executor.runs(), &[
//!     Run::plain("Hello"),
//!     Run::new(" world", AnnotationFlag::Bold.into()),
//! ]);
//! ```
//!
//! ## Using the Primitives
//!
//! ```rust
//! use richtext_core::{diff, edit, Document, Run, AnnotationFlag};
//!
//! let doc = Document::from_runs(vec![
//!     Run::plain("Hello "),
//!     Run::new("world", AnnotationFlag::Bold.into()),
//! ]);
//! let change = diff("Hello world", "Hello world!");
//! let next = edit::apply(&doc, &change).unwrap();
//! assert_eq!(next.runs()[1].text, "world!");
//! ```
//!
//! # Module Description
//!
//! - [`annotations`] - Annotation flags, colors and annotation sets
//! - [`document`] - Runs and the run list
//! - [`diff`](mod@diff) - Snapshot diffing
//! - [`locate`](mod@locate) - Offset to run resolution
//! - [`edit`] - Applying diffs to runs
//! - [`toggle`] - Toggling flags over selections, pending toggles
//! - [`normalize`](mod@normalize) - Canonical run lists
//! - [`search`] - Spans picked out for bulk restyling
//! - [`offsets`] - Host offset encodings (chars, UTF-16)
//! - [`commands`] - Unified command interface
//! - [`state`] - State management and query interface
//!
//! # Unicode Support
//!
//! - All offsets are Unicode scalar values (`char`s)
//! - Hosts that count UTF-16 code units set [`OffsetEncoding::Utf16`] in [`EngineConfig`]

pub mod annotations;
pub mod commands;
pub mod diff;
pub mod document;
pub mod edit;
pub mod error;
pub mod locate;
pub mod normalize;
pub mod offsets;
pub mod search;
mod selection;
pub mod state;
mod text;
pub mod toggle;

pub use annotations::{AnnotationFlag, AnnotationFlags, AnnotationSet, Color};
pub use commands::{
    Command, CommandExecutor, CommandResult, EngineConfig, SelectionCommand, StyleCommand,
    TextCommand,
};
pub use diff::{Diff, diff};
pub use document::{Document, Run};
pub use edit::{EditOutcome, PendingResolution};
pub use error::{EngineError, Result};
pub use locate::{BoundaryPolicy, RunPosition, locate};
pub use normalize::normalize;
pub use offsets::OffsetEncoding;
pub use search::MatchOptions;
pub use selection::Selection;
pub use state::{
    DocumentState, EditorState, EditorStateManager, SelectionState, StateChange,
    StateChangeCallback, StateChangeType, StyleState,
};
pub use toggle::{FlagState, PendingToggle};
