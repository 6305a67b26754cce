//! Attribute access.

use super::{Capability, CapabilityError, Invocation, Shape, assignments};
use crate::operation::{Operation, label};
use crate::register_capability;
use crate::selection::Selection;
use domqueue_core::{Entries, Node, Value};

/// Name/value pairs of a node in declaration order.
pub fn attributes(node: &dyn Node) -> Entries {
    node.attribute_names()
        .into_iter()
        .filter_map(|name| {
            let value = node.attribute(&name)?;
            Some((name, value))
        })
        .collect()
}

/// Sets each attribute in order; stops at the first rejected name.
pub fn set_attrs<I, K, V>(pairs: I) -> Operation
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let pairs: Vec<(String, String)> = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    let rendered: Vec<String> = pairs.iter().map(|(name, value)| format!("{name}={value}")).collect();
    Operation::new(label("attrs", &rendered), move |node| {
        pairs.iter().try_for_each(|(name, value)| node.set_attribute(name, value))
    })
}

pub trait AttrsExt: Sized {
    fn attrs(&self) -> Vec<Entries>;

    #[must_use]
    fn set_attrs<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;

    #[must_use]
    fn set_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let pair: (String, String) = (name.into(), value.into());
        self.set_attrs([pair])
    }
}

impl AttrsExt for Selection {
    fn attrs(&self) -> Vec<Entries> {
        self.read(attributes)
    }

    fn set_attrs<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.enqueue(set_attrs(pairs))
    }
}

struct Attrs;

impl Capability for Attrs {
    fn name(&self) -> &'static str {
        "attrs"
    }

    fn description(&self) -> &'static str {
        "Lists attributes, or sets name=value pairs"
    }

    fn shapes(&self) -> &'static [Shape] {
        &[Shape::Accessor, Shape::Mutator]
    }

    fn invoke(&self, selection: Selection, args: &[&str]) -> Result<Invocation, CapabilityError> {
        if args.is_empty() {
            let values = selection.attrs().into_iter().map(Value::Entries).collect();
            return Ok(Invocation::Values(values));
        }
        let pairs = assignments(self.name(), args)?;
        Ok(Invocation::Chained(selection.set_attrs(pairs)))
    }
}

static ATTRS: Attrs = Attrs;

register_capability!(&ATTRS);
