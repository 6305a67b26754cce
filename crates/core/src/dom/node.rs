use super::error::DomError;
use super::identifiers::NodeId;
use std::fmt;
use std::sync::Arc;

/// Shared reference to a live document node.
pub type NodeRef = Arc<dyn Node>;

/// Per-node primitives a document exposes to the selection runtime.
///
/// Nodes are live handles: every call observes and mutates the current state
/// of the owning document. Mutating methods take `&self`, implementations are
/// expected to use interior mutability.
pub trait Node: Send + Sync {
    fn node_id(&self) -> NodeId;

    /// Lowercase tag name, or an empty string for non-element nodes.
    fn tag_name(&self) -> String;

    fn has_class(&self, class_name: &str) -> bool;
    fn add_class(&self, class_name: &str) -> Result<(), DomError>;
    fn remove_class(&self, class_name: &str) -> Result<(), DomError>;

    /// Flips a class token and reports whether it is present afterwards.
    fn toggle_class(&self, class_name: &str) -> Result<bool, DomError>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self) -> String;

    /// Replaces all children with a single text node (none for empty text).
    fn set_text_content(&self, text: &str) -> Result<(), DomError>;

    /// Attribute names in declaration order.
    fn attribute_names(&self) -> Vec<String>;
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError>;

    /// Custom data entries (`data-*` attributes) as camelCase keys in
    /// declaration order.
    fn dataset(&self) -> Vec<(String, String)>;

    /// Writes a custom data entry; `key` is camelCase.
    fn set_data(&self, key: &str, value: &str) -> Result<(), DomError>;

    /// Element children in document order.
    fn children(&self) -> Vec<NodeRef>;

    fn matches(&self, selector: &str) -> Result<bool, DomError>;
}

impl fmt::Debug for dyn Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.node_id())
            .field("tag", &self.tag_name())
            .finish()
    }
}
