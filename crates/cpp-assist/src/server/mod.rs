pub(crate) mod code_action;
pub(crate) mod handler;
pub(crate) mod indexing;
pub mod settings;
pub(crate) mod state;

pub use settings::ServerSettings;
pub use state::AssistLanguageServer;
