//! In-memory markup document used by the domqueue runtime, CLI and tests.
//!
//! Documents are loaded from XHTML-like markup, expose live [`ElementRef`]
//! handles and answer selector queries with a small CSS engine.

mod document;
mod element;
mod markup;
mod selector;
mod tree;

pub use document::MemoryDocument;
pub use element::ElementRef;
pub use markup::MarkupError;
