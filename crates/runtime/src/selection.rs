use crate::capability::{CapabilityError, Invocation, find_capability};
use crate::flush::{FlushFailure, FlushReport};
use crate::operation::Operation;
use domqueue_core::{Node, NodeRef};

/// A fixed set of matched nodes plus the operations queued against them.
///
/// Chained calls consume and return the selection. Nothing touches the
/// document until [`Selection::flush`] runs; accessors read immediately and
/// leave the queue alone.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    nodes: Vec<NodeRef>,
    queue: Vec<Operation>,
}

impl Selection {
    pub fn new(nodes: Vec<NodeRef>) -> Self {
        Self { nodes, queue: Vec::new() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn queue(&self) -> &[Operation] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends an operation to the queue. Nothing is applied yet.
    #[must_use]
    pub fn enqueue(mut self, operation: Operation) -> Self {
        tracing::trace!(operation = operation.label(), queued = self.queue.len() + 1, "operation queued");
        self.queue.push(operation);
        self
    }

    /// Computes one value per node right now, in selection order.
    pub fn read<R>(&self, mut read: impl FnMut(&dyn Node) -> R) -> Vec<R> {
        self.nodes.iter().map(|node| read(node.as_ref())).collect()
    }

    /// Replaces the node set with the concatenation of `expand` over every
    /// current node. The queue is kept.
    #[must_use]
    pub fn replace_nodes(mut self, mut expand: impl FnMut(&dyn Node) -> Vec<NodeRef>) -> Self {
        let nodes: Vec<NodeRef> = self.nodes.iter().flat_map(|node| expand(node.as_ref())).collect();
        tracing::trace!(before = self.nodes.len(), after = nodes.len(), "selection replaced");
        self.nodes = nodes;
        self
    }

    /// Applies every queued operation to every node: all operations on the
    /// first node in queue order, then the second node, and so on.
    ///
    /// The queue is kept, so flushing again re-applies everything.
    pub fn flush(&self) -> FlushReport {
        tracing::debug!(nodes = self.nodes.len(), operations = self.queue.len(), "flush started");
        let mut report = FlushReport::default();

        for (node_index, node) in self.nodes.iter().enumerate() {
            for (position, operation) in self.queue.iter().enumerate() {
                if let Err(error) = operation.apply(node.as_ref()) {
                    let node_id = node.node_id();
                    tracing::warn!(
                        operation = operation.label(),
                        node = %node_id,
                        node_index,
                        %error,
                        "operation failed, skipping remaining operations for node"
                    );
                    report.skipped += self.queue.len() - position - 1;
                    report.failures.push(FlushFailure {
                        node_index,
                        node_id,
                        operation: operation.label().to_owned(),
                        error,
                    });
                    break;
                }
                report.applied += 1;
            }
        }

        tracing::debug!(
            applied = report.applied,
            skipped = report.skipped,
            failures = report.failures.len(),
            "flush finished"
        );
        report
    }

    /// Runs a registered capability by name.
    pub fn invoke(self, name: &str, args: &[&str]) -> Result<Invocation, CapabilityError> {
        let capability = find_capability(name).ok_or_else(|| CapabilityError::Unknown(name.to_owned()))?;
        capability.invoke(self, args)
    }
}
