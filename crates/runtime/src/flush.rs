use domqueue_core::{DomError, NodeId};
use std::fmt;
use thiserror::Error;

/// One operation that failed on one node during a flush.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlushFailure {
    /// Position of the node in the selection.
    pub node_index: usize,
    pub node_id: NodeId,
    /// Label of the failing operation.
    pub operation: String,
    pub error: DomError,
}

impl fmt::Display for FlushFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on node {} (index {}): {}", self.operation, self.node_id, self.node_index, self.error)
    }
}

/// Outcome of [`crate::Selection::flush`].
///
/// A failing operation skips the remaining operations of the same node; the
/// other nodes are still processed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct FlushReport {
    /// Number of (node, operation) applications that succeeded.
    pub applied: usize,
    /// Operations not attempted because an earlier one failed on that node.
    pub skipped: usize,
    pub failures: Vec<FlushFailure>,
}

impl FlushReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_result(self) -> Result<Self, FlushError> {
        if self.is_success() { Ok(self) } else { Err(FlushError { report: self }) }
    }
}

#[derive(Debug, Error)]
#[error(
    "{} operation(s) failed during flush; first: {}",
    .report.failures.len(),
    first_failure(.report)
)]
pub struct FlushError {
    pub report: FlushReport,
}

fn first_failure(report: &FlushReport) -> String {
    report.failures.first().map(ToString::to_string).unwrap_or_default()
}
