use richtext_core::{
    AnnotationFlag, Command, CommandExecutor, EditorStateManager, EngineConfig, FlagState,
    OffsetEncoding, SelectionCommand, StateChangeType, StyleCommand, TextCommand,
};
use std::sync::{Arc, Mutex};

#[test]
fn test_typing_session_versions_and_notifications() {
    let mut manager = EditorStateManager::empty();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    manager.subscribe(move |change| {
        sink.lock()
            .unwrap()
            .push((change.change_type, change.old_version, change.new_version));
    });

    for text in ["H", "Hi", "Hi!"] {
        manager
            .execute(Command::Text(TextCommand::Changed {
                text: text.to_string(),
            }))
            .unwrap();
    }

    assert_eq!(manager.version(), 3);
    assert_eq!(
        changes.lock().unwrap().as_slice(),
        &[
            (StateChangeType::DocumentModified, 0, 1),
            (StateChangeType::DocumentModified, 1, 2),
            (StateChangeType::DocumentModified, 2, 3),
        ]
    );
    assert_eq!(manager.get_document_state().char_count, 3);
    assert!(manager.has_changed_since(2));
}

#[test]
fn test_toolbar_state_for_utf16_host() {
    let config = EngineConfig::default().with_offset_encoding(OffsetEncoding::Utf16);
    let mut manager =
        EditorStateManager::from_executor(CommandExecutor::with_config("👋👋 ok", config));

    manager
        .execute(Command::Selection(SelectionCommand::Set { start: 5, end: 7 }))
        .unwrap();
    manager
        .execute(Command::Style(StyleCommand::Toggle {
            flag: AnnotationFlag::Italic,
        }))
        .unwrap();

    let state = manager.get_full_state();
    assert_eq!((state.selection.host_start, state.selection.host_end), (5, 7));
    assert_eq!(
        (state.selection.selection.start, state.selection.selection.end),
        (3, 5)
    );
    assert_eq!(state.style.get(AnnotationFlag::Italic), Some(FlagState::On));
    assert_eq!(state.document.run_count, 2);
    assert!(state.document.is_modified);
}

#[test]
fn test_save_then_restyle_marks_modified_again() {
    let mut manager = EditorStateManager::new("abc");
    manager
        .execute(Command::Selection(SelectionCommand::Set { start: 0, end: 1 }))
        .unwrap();
    manager.mark_saved();
    assert!(!manager.get_document_state().is_modified);

    manager
        .execute(Command::Style(StyleCommand::ToggleNamed {
            name: "comment".to_string(),
        }))
        .unwrap();
    assert!(manager.get_document_state().is_modified);
}
