//! Deferred-mutation selections over a document.
//!
//! A [`Selection`] is resolved once from a query string, collects queued
//! [`Operation`]s through chained calls and applies them only when
//! [`Selection::flush`] is called. Feature modules under [`capability`] add
//! accessors, mutators and structural steps, and register themselves so they
//! can also be invoked by name.

pub mod capability;
mod flush;
mod operation;
mod resolver;
mod selection;

pub use capability::attrs::AttrsExt;
pub use capability::class::ClassExt;
pub use capability::data::DataExt;
pub use capability::text::TextExt;
pub use capability::traverse::TraverseExt;
pub use capability::{
    Capability, CapabilityError, CapabilityRegistration, Invocation, Shape, capabilities,
    find_capability,
};
pub use flush::{FlushError, FlushFailure, FlushReport};
pub use operation::Operation;
pub use resolver::{Scope, Selector, select};
pub use selection::Selection;
