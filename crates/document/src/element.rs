use crate::markup::{self, MarkupError};
use crate::selector::SelectorList;
use crate::tree::{self, SharedTree};
use domqueue_core::{Document, DomError, Node, NodeId, NodeRef};
use std::fmt;
use std::sync::Arc;

/// Live handle to one node of a [`crate::MemoryDocument`].
///
/// Handles share the document arena, so mutations through one handle are
/// visible through every other handle and through the document itself. As a
/// [`Document`] an element answers lookups scoped to its descendants.
#[derive(Clone)]
pub struct ElementRef {
    tree: SharedTree,
    id: NodeId,
}

impl ElementRef {
    pub(crate) fn new(tree: SharedTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub(crate) fn node_refs(tree: &SharedTree, ids: impl IntoIterator<Item = NodeId>) -> Vec<NodeRef> {
        ids.into_iter().map(|id| Arc::new(Self::new(Arc::clone(tree), id)) as NodeRef).collect()
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn into_node_ref(self) -> NodeRef {
        Arc::new(self)
    }

    /// Whether the node is still reachable from the document root.
    pub fn is_connected(&self) -> bool {
        tree::read(&self.tree).is_connected(self.id)
    }

    pub fn outer_markup(&self) -> Result<String, MarkupError> {
        markup::serialize(&tree::read(&self.tree), self.id)
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef {}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef").field("id", &self.id).field("tag", &self.tag_name()).finish()
    }
}

impl Node for ElementRef {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn tag_name(&self) -> String {
        tree::read(&self.tree).element(self.id).map(|element| element.tag.clone()).unwrap_or_default()
    }

    fn has_class(&self, class_name: &str) -> bool {
        tree::read(&self.tree).element(self.id).is_some_and(|element| element.has_class(class_name))
    }

    fn add_class(&self, class_name: &str) -> Result<(), DomError> {
        tree::write(&self.tree).add_class(self.id, class_name)
    }

    fn remove_class(&self, class_name: &str) -> Result<(), DomError> {
        tree::write(&self.tree).remove_class(self.id, class_name)
    }

    fn toggle_class(&self, class_name: &str) -> Result<bool, DomError> {
        tree::write(&self.tree).toggle_class(self.id, class_name)
    }

    fn text_content(&self) -> String {
        tree::read(&self.tree).text_content(self.id)
    }

    fn set_text_content(&self, text: &str) -> Result<(), DomError> {
        tree::write(&self.tree).set_text_content(self.id, text)
    }

    fn attribute_names(&self) -> Vec<String> {
        tree::read(&self.tree)
            .element(self.id)
            .map(|element| element.attributes.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        tree::read(&self.tree).element(self.id)?.attribute(&name).map(str::to_owned)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        tree::write(&self.tree).set_attribute(self.id, name, value)
    }

    fn dataset(&self) -> Vec<(String, String)> {
        tree::read(&self.tree).dataset(self.id)
    }

    fn set_data(&self, key: &str, value: &str) -> Result<(), DomError> {
        tree::write(&self.tree).set_data(self.id, key, value)
    }

    fn children(&self) -> Vec<NodeRef> {
        let children = tree::read(&self.tree).element_children(self.id);
        Self::node_refs(&self.tree, children)
    }

    fn matches(&self, selector: &str) -> Result<bool, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(list.matches(&tree::read(&self.tree), self.id))
    }
}

impl Document for ElementRef {
    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        let found = tree::read(&self.tree).find_by_id(self.id, id)?;
        Some(Arc::new(Self::new(Arc::clone(&self.tree), found)))
    }

    fn elements_by_class_name(&self, class_names: &str) -> Vec<NodeRef> {
        let found = tree::read(&self.tree).find_by_classes(self.id, class_names);
        Self::node_refs(&self.tree, found)
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeRef>, DomError> {
        let list = SelectorList::parse(selector)?;
        let found = list.select(&tree::read(&self.tree), self.id);
        Ok(Self::node_refs(&self.tree, found))
    }
}
