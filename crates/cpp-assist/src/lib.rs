pub mod document;
pub mod progress;
pub mod quickfix;
pub mod server;
pub mod source_location;
pub mod symbols;
pub mod syntax;

pub use quickfix::{
    AssistProposal, AssistReason, AstPath, EditorState, QuickFixAssistProvider, QuickFixContext,
    QuickFixFactory, QuickFixOperation, QuickFixRegistry,
};
pub use server::AssistLanguageServer;
pub use source_location::SourceLocation;
pub use symbols::{SymbolLocation, SymbolProvider, SymbolSnapshot};
pub use syntax::SyntaxTree;
