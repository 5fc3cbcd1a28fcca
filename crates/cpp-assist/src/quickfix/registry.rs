use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use super::context::QuickFixContext;
use super::factory::{FnFactory, QuickFixError, QuickFixFactory};
use super::operation::QuickFixOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateId(String),
}

impl fmt::Display for RegistryError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "a quick fix factory with id `{id}` is already registered"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Ordered set of quick-fix factories.
///
/// Factories are consulted in registration order and their results are concatenated without
/// re-sorting. A factory that fails or panics is skipped; the others still contribute.
#[derive(Default, Clone)]
pub struct QuickFixRegistry {
    factories: Vec<Arc<dyn QuickFixFactory>>,
}

impl QuickFixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        factory: impl QuickFixFactory + 'static,
    ) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(factory))
    }

    pub fn register_arc(
        &mut self,
        factory: Arc<dyn QuickFixFactory>,
    ) -> Result<(), RegistryError> {
        if self.contains(factory.id()) {
            return Err(RegistryError::DuplicateId(factory.id().to_string()));
        }
        debug!("[quickfix] registered factory `{}`", factory.id());
        self.factories.push(factory);
        Ok(())
    }

    pub fn register_fn<F>(
        &mut self,
        id: impl Into<String>,
        evaluate: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&QuickFixContext) -> Vec<QuickFixOperation> + Send + Sync + 'static,
    {
        self.register(FnFactory::new(id, evaluate))
    }

    pub fn contains(
        &self,
        id: &str,
    ) -> bool {
        self.factories.iter().any(|factory| factory.id() == id)
    }

    /// Factory ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.factories.iter().map(|factory| factory.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Ask every factory for fixes at `ctx`.
    pub fn collect_candidates(
        &self,
        ctx: &QuickFixContext,
    ) -> Vec<QuickFixOperation> {
        self.collect_candidates_where(ctx, |_| true)
    }

    /// Like [`collect_candidates`](Self::collect_candidates), consulting only factories whose id
    /// passes `enabled`.
    pub fn collect_candidates_where(
        &self,
        ctx: &QuickFixContext,
        enabled: impl Fn(&str) -> bool,
    ) -> Vec<QuickFixOperation> {
        if ctx.path().is_empty() {
            return Vec::new();
        }
        let mut candidates = Vec::new();
        for factory in &self.factories {
            let id = factory.id();
            if !enabled(id) {
                continue;
            }
            match evaluate_isolated(factory.as_ref(), ctx) {
                Ok(operations) => {
                    if !operations.is_empty() {
                        debug!("[quickfix] `{id}` proposed {} fix(es)", operations.len());
                    }
                    candidates.extend(operations);
                },
                Err(error) => warn!("[quickfix] factory `{id}` skipped: {error}"),
            }
        }
        candidates
    }
}

impl fmt::Debug for QuickFixRegistry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("QuickFixRegistry")
            .field("factories", &self.ids())
            .finish()
    }
}

fn evaluate_isolated(
    factory: &dyn QuickFixFactory,
    ctx: &QuickFixContext,
) -> Result<Vec<QuickFixOperation>, QuickFixError> {
    match panic::catch_unwind(AssertUnwindSafe(|| factory.evaluate(ctx))) {
        Ok(result) => result,
        Err(payload) => Err(QuickFixError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/src/quickfix/registry_tests.rs"]
mod tests;
