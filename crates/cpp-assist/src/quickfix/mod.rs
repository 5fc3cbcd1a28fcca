//! Cursor-driven quick fixes.
//!
//! On each request the coordinator ([`QuickFixAssistProvider`]) captures a
//! [`SemanticSnapshot`], resolves the [`AstPath`] under the cursor and hands the resulting
//! [`QuickFixContext`] to every factory in the [`QuickFixRegistry`].

pub mod assist;
pub mod change;
pub mod context;
pub mod factory;
pub mod operation;
pub mod path;
pub mod registry;
pub mod snapshot;

pub use assist::{
    AssistPhase, AssistProposal, PROVIDER_ID, QuickFixAssistProcessor, QuickFixAssistProvider,
    QuickFixOptions,
};
pub use change::{ChangeError, ChangeSet, SourceEdit};
pub use context::{AssistReason, EditorState, QuickFixContext};
pub use factory::{FnFactory, QuickFixError, QuickFixFactory};
pub use operation::QuickFixOperation;
pub use path::{AstPath, resolve};
pub use registry::{QuickFixRegistry, RegistryError};
pub use snapshot::SemanticSnapshot;
