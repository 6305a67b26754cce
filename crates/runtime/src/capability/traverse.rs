//! Structural descent.

use super::{Capability, CapabilityError, Invocation, Shape};
use crate::register_capability;
use crate::selection::Selection;
use domqueue_core::{Node, NodeRef};

/// Element children of `node`, optionally only those matching `filter`.
///
/// A filter the document cannot evaluate matches nothing.
pub fn children(node: &dyn Node, filter: Option<&str>) -> Vec<NodeRef> {
    let children = node.children();
    let Some(filter) = filter else {
        return children;
    };
    children
        .into_iter()
        .filter(|child| match child.matches(filter) {
            Ok(matched) => matched,
            Err(error) => {
                tracing::debug!(filter, %error, "child filter rejected");
                false
            }
        })
        .collect()
}

pub trait TraverseExt: Sized {
    /// Replaces every node with its element children, parents in order.
    #[must_use]
    fn children(self) -> Self;

    #[must_use]
    fn children_matching(self, filter: &str) -> Self;
}

impl TraverseExt for Selection {
    fn children(self) -> Self {
        self.replace_nodes(|node| children(node, None))
    }

    fn children_matching(self, filter: &str) -> Self {
        self.replace_nodes(|node| children(node, Some(filter)))
    }
}

struct Children;

impl Capability for Children {
    fn name(&self) -> &'static str {
        "children"
    }

    fn description(&self) -> &'static str {
        "Replaces the selection with child elements, optionally filtered by a selector"
    }

    fn shapes(&self) -> &'static [Shape] {
        &[Shape::Structural]
    }

    fn invoke(&self, selection: Selection, args: &[&str]) -> Result<Invocation, CapabilityError> {
        match args {
            [] => Ok(Invocation::Chained(selection.children())),
            [filter] => Ok(Invocation::Chained(selection.children_matching(filter))),
            _ => Err(CapabilityError::arity(self.name(), "an optional filter selector", args)),
        }
    }
}

static CHILDREN: Children = Children;

register_capability!(&CHILDREN);
