use crate::element::ElementRef;
use crate::markup::{self, MarkupError};
use crate::selector::SelectorList;
use crate::tree::{self, SharedTree, Tree};
use domqueue_core::{Document, DomError, NodeId, NodeRef};
use std::sync::{Arc, RwLock};

/// A markup document held entirely in memory.
///
/// Cloning the value shares the underlying tree; use
/// [`MemoryDocument::deep_clone`] for an independent copy.
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    tree: SharedTree,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty document without any elements.
    pub fn new() -> Self {
        Self::from_tree(Tree::new())
    }

    pub fn parse(markup: &str) -> Result<Self, MarkupError> {
        let tree = markup::parse(markup)?;
        Ok(Self::from_tree(tree))
    }

    fn from_tree(tree: Tree) -> Self {
        Self { tree: Arc::new(RwLock::new(tree)) }
    }

    pub fn outer_markup(&self) -> Result<String, MarkupError> {
        markup::serialize(&tree::read(&self.tree), Tree::root())
    }

    pub fn deep_clone(&self) -> Self {
        Self::from_tree(tree::read(&self.tree).clone())
    }

    /// The first top-level element, usually `<html>`.
    pub fn document_element(&self) -> Option<ElementRef> {
        let first = tree::read(&self.tree).element_children(Tree::root()).first().copied()?;
        Some(ElementRef::new(Arc::clone(&self.tree), first))
    }

    /// Handle for an element by arena id, including detached elements.
    pub fn element(&self, id: NodeId) -> Option<ElementRef> {
        let guard = tree::read(&self.tree);
        guard.element(id)?;
        Some(ElementRef::new(Arc::clone(&self.tree), id))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<ElementRef> {
        let found = tree::read(&self.tree).find_by_id(Tree::root(), id)?;
        Some(ElementRef::new(Arc::clone(&self.tree), found))
    }
}

impl Document for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.get_element_by_id(id).map(ElementRef::into_node_ref)
    }

    fn elements_by_class_name(&self, class_names: &str) -> Vec<NodeRef> {
        let found = tree::read(&self.tree).find_by_classes(Tree::root(), class_names);
        ElementRef::node_refs(&self.tree, found)
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeRef>, DomError> {
        let list = SelectorList::parse(selector)?;
        let found = list.select(&tree::read(&self.tree), Tree::root());
        tracing::trace!(selector, matches = found.len(), "selector evaluated");
        Ok(ElementRef::node_refs(&self.tree, found))
    }
}
