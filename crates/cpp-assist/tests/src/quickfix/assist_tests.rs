use std::sync::atomic::{AtomicUsize, Ordering};

use rowan::{TextRange, TextSize};

use super::*;
use crate::quickfix::change::ChangeSet;
use crate::syntax::SyntaxTree;

fn padded_main() -> String {
    let mut source = String::from("int main() { return 40 + 2; ");
    while source.len() < 99 {
        source.push(' ');
    }
    source.push('}');
    source
}

fn uri() -> Url {
    Url::parse("file:///work/main.cpp").unwrap()
}

fn editor(
    source: &str,
    cursor: u32,
) -> EditorState {
    EditorState::new(uri(), 1, TextSize::from(cursor)).with_tree(1, SyntaxTree::parse(source))
}

fn provider_with(registry: QuickFixRegistry) -> QuickFixAssistProvider {
    QuickFixAssistProvider::new(Arc::new(registry), Arc::new(SymbolProvider::new()))
}

fn fix_a_registry() -> QuickFixRegistry {
    let mut registry = QuickFixRegistry::new();
    registry
        .register_fn("fix-a", |_| vec![QuickFixOperation::new("Fix A", |_| {})])
        .unwrap();
    registry.register_fn("nothing", |_| Vec::new()).unwrap();
    registry
}

#[test]
fn request_inside_function_returns_fixes() {
    let provider = provider_with(fix_a_registry());
    let proposal = provider.request_quick_fixes(&editor(&padded_main(), 50), AssistReason::Explicit);
    assert_eq!(proposal.provider, PROVIDER_ID);
    assert_eq!(proposal.uri, uri());
    assert_eq!(proposal.version, 1);
    assert_eq!(proposal.descriptions(), vec!["Fix A"]);
}

#[test]
fn request_past_document_end_is_empty() {
    let provider = provider_with(fix_a_registry());
    let proposal = provider.request_quick_fixes(&editor(&padded_main(), 150), AssistReason::Explicit);
    assert!(proposal.is_empty());
    assert_eq!(proposal.provider, PROVIDER_ID);
}

#[test]
fn missing_parse_yields_empty_proposal_without_dispatch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = QuickFixRegistry::new();
    registry
        .register_fn("counting", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        })
        .unwrap();
    let provider = provider_with(registry);

    let unparsed = EditorState::new(uri(), 1, TextSize::from(0));
    assert!(provider.request_quick_fixes(&unparsed, AssistReason::Explicit).is_empty());

    let stale = EditorState::new(uri(), 2, TextSize::from(0)).with_tree(1, SyntaxTree::parse("int x;"));
    assert!(provider.request_quick_fixes(&stale, AssistReason::Explicit).is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn automatic_requests_honor_options() {
    let provider = provider_with(fix_a_registry());
    let state = editor(&padded_main(), 50);
    let options = QuickFixOptions {
        automatic: false,
        ..QuickFixOptions::default()
    };
    assert!(
        provider
            .request_quick_fixes_with(&state, AssistReason::Automatic, &options)
            .is_empty()
    );
    let explicit = provider.request_quick_fixes_with(&state, AssistReason::Explicit, &options);
    assert_eq!(explicit.descriptions(), vec!["Fix A"]);
    let automatic = provider.request_quick_fixes(&state, AssistReason::Automatic);
    assert_eq!(automatic.descriptions(), vec!["Fix A"]);
}

#[test]
fn disabled_factories_are_skipped() {
    let provider = provider_with(fix_a_registry());
    let options = QuickFixOptions {
        disabled: HashSet::from(["fix-a".to_string()]),
        ..QuickFixOptions::default()
    };
    let proposal = provider.request_quick_fixes_with(&editor(&padded_main(), 50), AssistReason::Explicit, &options);
    assert!(proposal.is_empty());
}

#[test]
fn processor_runs_once() {
    let provider = provider_with(fix_a_registry());
    let state = editor(&padded_main(), 50);
    let mut processor = provider.create_processor();
    assert_eq!(processor.phase(), AssistPhase::Idle);

    let proposal = processor
        .perform(&state, AssistReason::Explicit, &QuickFixOptions::default())
        .unwrap();
    assert_eq!(proposal.descriptions(), vec!["Fix A"]);
    assert_eq!(processor.phase(), AssistPhase::Completed);
    assert!(
        processor
            .perform(&state, AssistReason::Explicit, &QuickFixOptions::default())
            .is_none()
    );
}

#[test]
fn provider_capabilities() {
    let provider = provider_with(QuickFixRegistry::new());
    assert!(!provider.is_asynchronous());
    assert_eq!(provider.id(), "cpp.quickfix");
    assert!(provider.supports_file(&Url::parse("file:///a/b.cpp").unwrap()));
    assert!(provider.supports_file(&Url::parse("file:///a/b.h").unwrap()));
    assert!(!provider.supports_file(&Url::parse("file:///a/b.rs").unwrap()));
}

#[test]
fn factories_see_indexed_symbols() {
    let symbols = Arc::new(SymbolProvider::new());
    symbols.scan_source(&Url::parse("file:///work/util.h").unwrap(), "int helper(int value);");

    let mut registry = QuickFixRegistry::new();
    registry
        .register_fn("declare", |ctx| {
            let Some(token) = ctx.cursor_token() else {
                return Vec::new();
            };
            let name = ctx.text_in(token.range).to_string();
            if ctx.lookup(&name).is_empty() {
                return Vec::new();
            }
            vec![QuickFixOperation::new(format!("Include declaration of `{name}`"), |changes: &mut ChangeSet| {
                changes.insert(TextSize::from(0), "#include \"util.h\"\n");
            })]
        })
        .unwrap();
    let provider = QuickFixAssistProvider::new(Arc::new(registry), symbols);

    let source = "int main() { return helper(1); }";
    let cursor = source.find("helper").unwrap() as u32;
    let proposal = provider.request_quick_fixes(&editor(source, cursor), AssistReason::Explicit);
    assert_eq!(proposal.descriptions(), vec!["Include declaration of `helper`"]);
    assert_eq!(
        proposal.operations[0].apply_to(source).unwrap(),
        "#include \"util.h\"\nint main() { return helper(1); }"
    );

    let selection = TextRange::new(TextSize::from(0), TextSize::from(3));
    let on_keyword = editor(source, 0).with_selection(selection);
    assert!(provider.request_quick_fixes(&on_keyword, AssistReason::Explicit).is_empty());
}
