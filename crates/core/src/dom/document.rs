use super::error::DomError;
use super::node::NodeRef;

/// Lookup facilities of a document or of any node that can act as a query
/// root.
///
/// All collections are returned in document order.
pub trait Document: Send + Sync {
    fn element_by_id(&self, id: &str) -> Option<NodeRef>;

    /// Elements carrying every whitespace-separated class in `class_names`.
    fn elements_by_class_name(&self, class_names: &str) -> Vec<NodeRef>;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeRef>, DomError>;
}
