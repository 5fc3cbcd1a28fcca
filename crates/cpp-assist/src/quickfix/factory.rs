use std::fmt;

use super::change::ChangeError;
use super::context::QuickFixContext;
use super::operation::QuickFixOperation;

/// A source of quick fixes.
///
/// Factories are stateless with respect to requests: everything they need comes from the
/// context, which they may only read. Returning no operations is the usual outcome.
pub trait QuickFixFactory: Send + Sync {
    /// Stable identifier, unique within a registry. Used by settings to disable a factory.
    fn id(&self) -> &str;

    fn evaluate(
        &self,
        ctx: &QuickFixContext,
    ) -> Result<Vec<QuickFixOperation>, QuickFixError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickFixError {
    /// The factory gave up on this context.
    Failed(String),
    /// The factory panicked; the payload message when one was available.
    Panicked(String),
    Change(ChangeError),
}

impl fmt::Display for QuickFixError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "quick fix failed: {reason}"),
            Self::Panicked(message) => write!(f, "quick fix panicked: {message}"),
            Self::Change(error) => write!(f, "invalid quick fix edit: {error}"),
        }
    }
}

impl std::error::Error for QuickFixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Change(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ChangeError> for QuickFixError {
    fn from(error: ChangeError) -> Self {
        Self::Change(error)
    }
}

/// Adapts a closure into a [`QuickFixFactory`].
pub struct FnFactory<F> {
    id: String,
    evaluate: F,
}

impl<F> FnFactory<F>
where
    F: Fn(&QuickFixContext) -> Vec<QuickFixOperation> + Send + Sync,
{
    pub fn new(
        id: impl Into<String>,
        evaluate: F,
    ) -> Self {
        Self {
            id: id.into(),
            evaluate,
        }
    }
}

impl<F> QuickFixFactory for FnFactory<F>
where
    F: Fn(&QuickFixContext) -> Vec<QuickFixOperation> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn evaluate(
        &self,
        ctx: &QuickFixContext,
    ) -> Result<Vec<QuickFixOperation>, QuickFixError> {
        Ok((self.evaluate)(ctx))
    }
}
