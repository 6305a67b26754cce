//! Named, discoverable selection capabilities.
//!
//! Every capability module contributes free functions that build
//! [`crate::Operation`]s, an extension trait for typed chaining on
//! [`Selection`] and one or more [`Capability`] objects registered through
//! [`register_capability!`] so front ends can invoke them by name.

pub mod attrs;
pub mod class;
pub mod data;
pub mod text;
pub mod traverse;

use crate::selection::Selection;
use domqueue_core::Value;
use std::fmt;
use thiserror::Error;

/// How a capability interacts with a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Reads one value per node immediately.
    Accessor,
    /// Enqueues an operation and returns the selection.
    Mutator,
    /// Replaces the node set immediately.
    Structural,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Accessor => "accessor",
            Shape::Mutator => "mutator",
            Shape::Structural => "structural",
        })
    }
}

/// Result of invoking a capability by name.
#[derive(Debug)]
pub enum Invocation {
    Chained(Selection),
    Values(Vec<Value>),
}

impl Invocation {
    pub fn into_selection(self) -> Option<Selection> {
        match self {
            Invocation::Chained(selection) => Some(selection),
            Invocation::Values(_) => None,
        }
    }

    pub fn into_values(self) -> Option<Vec<Value>> {
        match self {
            Invocation::Values(values) => Some(values),
            Invocation::Chained(_) => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("unknown capability '{0}'")]
    Unknown(String),
    #[error("{name} expects {expected}, got {actual} argument(s)")]
    Arity { name: &'static str, expected: &'static str, actual: usize },
    #[error("invalid argument '{argument}' for {name}: {reason}")]
    InvalidArgument { name: &'static str, argument: String, reason: &'static str },
}

impl CapabilityError {
    pub(crate) fn arity(name: &'static str, expected: &'static str, args: &[&str]) -> Self {
        Self::Arity { name, expected, actual: args.len() }
    }
}

/// A selection operation that can be looked up and invoked by name.
pub trait Capability: Send + Sync {
    fn name(&self) -> &'static str;

    /// One line summary shown by front ends.
    fn description(&self) -> &'static str;

    /// Shapes this capability can take, depending on its arguments.
    fn shapes(&self) -> &'static [Shape];

    fn invoke(&self, selection: Selection, args: &[&str]) -> Result<Invocation, CapabilityError>;
}

impl fmt::Debug for dyn Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability").field("name", &self.name()).field("shapes", &self.shapes()).finish()
    }
}

pub struct CapabilityRegistration {
    pub capability: &'static dyn Capability,
}

inventory::collect!(CapabilityRegistration);

pub fn capabilities() -> impl Iterator<Item = &'static dyn Capability> {
    inventory::iter::<CapabilityRegistration>.into_iter().map(|entry| entry.capability)
}

pub fn find_capability(name: &str) -> Option<&'static dyn Capability> {
    capabilities().find(|capability| capability.name() == name)
}

#[macro_export]
macro_rules! register_capability {
    ($capability:expr) => {
        inventory::submit! {
            $crate::capability::CapabilityRegistration { capability: $capability }
        }
    };
}

pub use register_capability;

/// Splits `key=value` arguments, rejecting a missing `=` or an empty key.
pub(crate) fn assignments<'a>(
    name: &'static str,
    args: &[&'a str],
) -> Result<Vec<(&'a str, &'a str)>, CapabilityError> {
    args.iter()
        .map(|argument| match argument.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key, value)),
            _ => Err(CapabilityError::InvalidArgument {
                name,
                argument: (*argument).to_owned(),
                reason: "expected key=value",
            }),
        })
        .collect()
}
