//! Boundary between the selection runtime and a concrete document
//! implementation.
//!
//! The runtime only ever talks to nodes through the [`dom::Node`] and
//! [`dom::Document`] traits defined here.

pub mod dom;
pub mod value;

pub use dom::{Document, DomError, DomErrorKind, Node, NodeId, NodeRef};
pub use value::{Entries, Value};
