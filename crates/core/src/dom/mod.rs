mod document;
mod error;
mod identifiers;
mod node;

pub use document::Document;
pub use error::{DomError, DomErrorKind};
pub use identifiers::NodeId;
pub use node::{Node, NodeRef};
