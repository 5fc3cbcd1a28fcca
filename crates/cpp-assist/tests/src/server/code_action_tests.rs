use rowan::{TextRange, TextSize};
use tower_lsp::lsp_types::{Position, Range};

use super::*;

fn document(text: &str) -> Document {
    Document::new(Url::parse("file:///tmp/fix.cpp").unwrap(), text.to_string(), 3)
}

fn rename_x() -> QuickFixOperation {
    QuickFixOperation::new("Rename x to count", |changes| {
        changes.replace(TextRange::new(TextSize::from(4), TextSize::from(5)), "count");
    })
}

fn as_action(item: &CodeActionOrCommand) -> &CodeAction {
    match item {
        CodeActionOrCommand::CodeAction(action) => action,
        CodeActionOrCommand::Command(command) => panic!("unexpected command {}", command.title),
    }
}

#[test]
fn trigger_kind_maps_to_reason() {
    assert_eq!(assist_reason(None), AssistReason::Explicit);
    assert_eq!(assist_reason(Some(CodeActionTriggerKind::INVOKED)), AssistReason::Explicit);
    assert_eq!(assist_reason(Some(CodeActionTriggerKind::AUTOMATIC)), AssistReason::Automatic);
}

#[test]
fn only_filter_accepts_quickfix_and_parents() {
    assert!(accepts_quick_fixes(None));
    assert!(accepts_quick_fixes(Some([CodeActionKind::QUICKFIX].as_slice())));
    assert!(accepts_quick_fixes(Some([CodeActionKind::EMPTY].as_slice())));
    assert!(!accepts_quick_fixes(Some([CodeActionKind::REFACTOR].as_slice())));
    assert!(!accepts_quick_fixes(Some([CodeActionKind::new("quick")].as_slice())));
    assert!(!accepts_quick_fixes(Some(&[][..])));
}

#[test]
fn only_filter_matches_on_kind_prefixes() {
    let accepts = |kind: &'static str| accepts_quick_fixes(Some([CodeActionKind::new(kind)].as_slice()));
    assert!(accepts(""));
    assert!(accepts("quickfix"));
    assert!(!accepts("quickfix.x"));
    assert!(!accepts("refactor"));
    assert!(!accepts("quick"));
    assert!(accepts_quick_fixes(Some(
        [CodeActionKind::REFACTOR, CodeActionKind::new("quickfix")].as_slice()
    )));
}

#[test]
fn eager_actions_carry_edit() {
    let document = document("int x = 1;\n");
    let actions = to_code_actions(&document, &[rename_x()], 7, false);
    assert_eq!(actions.len(), 1);

    let action = as_action(&actions[0]);
    assert_eq!(action.title, "Rename x to count");
    assert_eq!(action.kind, Some(CodeActionKind::QUICKFIX));
    assert!(action.data.is_none());

    let edits = action
        .edit
        .as_ref()
        .and_then(|edit| edit.changes.as_ref())
        .and_then(|changes| changes.get(&document.uri))
        .unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_text, "count");
    assert_eq!(edits[0].range, Range::new(Position::new(0, 4), Position::new(0, 5)));
}

#[test]
fn lazy_actions_carry_data_in_order() {
    let document = document("int x = 1;\n");
    let second = QuickFixOperation::new("Insert comment", |changes| {
        changes.insert(TextSize::from(0), "// x\n");
    });
    let actions = to_code_actions(&document, &[rename_x(), second], 42, true);

    let titles: Vec<_> = actions.iter().map(|item| as_action(item).title.as_str()).collect();
    assert_eq!(titles, ["Rename x to count", "Insert comment"]);

    for (index, item) in actions.iter().enumerate() {
        let action = as_action(item);
        assert!(action.edit.is_none());
        let data: FixData = serde_json::from_value(action.data.clone().unwrap()).unwrap();
        assert_eq!(
            data,
            FixData {
                uri: document.uri.clone(),
                request_id: 42,
                index,
            }
        );
    }
}

#[test]
fn fix_data_uses_camel_case() {
    let data = FixData {
        uri: Url::parse("file:///tmp/a.cpp").unwrap(),
        request_id: 5,
        index: 1,
    };
    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value["requestId"], 5);
    assert_eq!(value["index"], 1);
}

#[test]
fn invalid_edit_drops_eager_action() {
    let document = document("int x;");
    let broken = QuickFixOperation::new("Out of range", |changes| {
        changes.delete(TextRange::new(TextSize::from(2), TextSize::from(90)));
    });
    assert!(workspace_edit(&document, &broken).is_none());
    let actions = to_code_actions(&document, &[broken, rename_x()], 1, false);
    assert_eq!(actions.len(), 1);
    assert_eq!(as_action(&actions[0]).title, "Rename x to count");
}
