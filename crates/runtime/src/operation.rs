use domqueue_core::{DomError, Node};
use std::fmt;
use std::sync::Arc;

type ApplyFn = dyn Fn(&dyn Node) -> Result<(), DomError> + Send + Sync;

/// A deferred mutation of a single node.
///
/// Operations are `Fn`, so a selection can be flushed any number of times and
/// every flush runs each operation again.
#[derive(Clone)]
pub struct Operation {
    label: String,
    apply: Arc<ApplyFn>,
}

impl Operation {
    pub fn new<F>(label: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&dyn Node) -> Result<(), DomError> + Send + Sync + 'static,
    {
        Self { label: label.into(), apply: Arc::new(apply) }
    }

    /// Human readable description used in flush reports and logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn apply(&self, node: &dyn Node) -> Result<(), DomError> {
        (self.apply)(node)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operation").field(&self.label).finish()
    }
}

/// Formats `name(arg, arg)` labels.
pub(crate) fn label<S: AsRef<str>>(name: &str, args: &[S]) -> String {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    format!("{name}({})", args.join(", "))
}
