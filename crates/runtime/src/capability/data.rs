//! Custom data entries stored as `data-*` attributes.
//!
//! Keys are camelCase on this side (`userId`) and kebab-case in markup
//! (`data-user-id`); the document performs the conversion.

use super::{Capability, CapabilityError, Invocation, Shape, assignments};
use crate::operation::{Operation, label};
use crate::register_capability;
use crate::selection::Selection;
use domqueue_core::{Entries, Value};

pub fn set_data<I, K, V>(entries: I) -> Operation
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let entries: Vec<(String, String)> = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    let rendered: Vec<String> = entries.iter().map(|(key, value)| format!("{key}={value}")).collect();
    Operation::new(label("data", &rendered), move |node| {
        entries.iter().try_for_each(|(key, value)| node.set_data(key, value))
    })
}

pub trait DataExt: Sized {
    fn data(&self) -> Vec<Entries>;

    #[must_use]
    fn set_data<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;
}

impl DataExt for Selection {
    fn data(&self) -> Vec<Entries> {
        self.read(|node| Entries::from(node.dataset()))
    }

    fn set_data<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.enqueue(set_data(entries))
    }
}

struct Data;

impl Capability for Data {
    fn name(&self) -> &'static str {
        "data"
    }

    fn description(&self) -> &'static str {
        "Lists data-* entries with camelCase keys, or sets key=value pairs"
    }

    fn shapes(&self) -> &'static [Shape] {
        &[Shape::Accessor, Shape::Mutator]
    }

    fn invoke(&self, selection: Selection, args: &[&str]) -> Result<Invocation, CapabilityError> {
        if args.is_empty() {
            let values = selection.data().into_iter().map(Value::Entries).collect();
            return Ok(Invocation::Values(values));
        }
        let entries = assignments(self.name(), args)?;
        Ok(Invocation::Chained(selection.set_data(entries)))
    }
}

static DATA: Data = Data;

register_capability!(&DATA);
