use std::fmt;

use super::change::{ChangeError, ChangeSet};

type EditAction = Box<dyn Fn(&mut ChangeSet) + Send + Sync>;

/// One proposed fix: a label for the editor and a deferred edit.
///
/// The edit runs only when the fix is chosen; it records its changes into a [`ChangeSet`]
/// against the text the fix was computed for.
pub struct QuickFixOperation {
    description: String,
    priority: Option<i32>,
    action: EditAction,
}

impl QuickFixOperation {
    pub fn new(
        description: impl Into<String>,
        action: impl Fn(&mut ChangeSet) + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            priority: None,
            action: Box::new(action),
        }
    }

    pub fn with_priority(
        mut self,
        priority: i32,
    ) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// Run the deferred edit.
    pub fn perform(&self) -> ChangeSet {
        let mut changes = ChangeSet::new();
        (self.action)(&mut changes);
        changes
    }

    /// Run the deferred edit against `text` and return the edited text.
    pub fn apply_to(
        &self,
        text: &str,
    ) -> Result<String, ChangeError> {
        self.perform().apply(text)
    }
}

impl fmt::Debug for QuickFixOperation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("QuickFixOperation")
            .field("description", &self.description)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
