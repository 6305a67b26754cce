//! Class list manipulation.

use super::{Capability, CapabilityError, Invocation, Shape};
use crate::operation::{Operation, label};
use crate::register_capability;
use crate::selection::Selection;
use domqueue_core::Value;

fn collect_names<I, S>(class_names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    class_names.into_iter().map(Into::into).collect()
}

/// Adds every class in order; stops at the first rejected token.
pub fn add_class<I, S>(class_names: I) -> Operation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names = collect_names(class_names);
    Operation::new(label("add_class", &names), move |node| {
        names.iter().try_for_each(|name| node.add_class(name))
    })
}

pub fn remove_class<I, S>(class_names: I) -> Operation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names = collect_names(class_names);
    Operation::new(label("remove_class", &names), move |node| {
        names.iter().try_for_each(|name| node.remove_class(name))
    })
}

/// Toggles each class in turn, so a repeated name cancels itself out.
pub fn toggle_class<I, S>(class_names: I) -> Operation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names = collect_names(class_names);
    Operation::new(label("toggle_class", &names), move |node| {
        names.iter().try_for_each(|name| node.toggle_class(name).map(drop))
    })
}

pub trait ClassExt: Sized {
    #[must_use]
    fn add_class<I, S>(self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    #[must_use]
    fn remove_class<I, S>(self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    #[must_use]
    fn toggle_class<I, S>(self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    fn has_class(&self, class_name: &str) -> Vec<bool>;
}

impl ClassExt for Selection {
    fn add_class<I, S>(self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enqueue(add_class(class_names))
    }

    fn remove_class<I, S>(self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enqueue(remove_class(class_names))
    }

    fn toggle_class<I, S>(self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enqueue(toggle_class(class_names))
    }

    fn has_class(&self, class_name: &str) -> Vec<bool> {
        self.read(|node| node.has_class(class_name))
    }
}

struct ClassMutator {
    name: &'static str,
    description: &'static str,
    build: fn(Vec<String>) -> Operation,
}

impl Capability for ClassMutator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn shapes(&self) -> &'static [Shape] {
        &[Shape::Mutator]
    }

    fn invoke(&self, selection: Selection, args: &[&str]) -> Result<Invocation, CapabilityError> {
        if args.is_empty() {
            return Err(CapabilityError::arity(self.name, "at least one class name", args));
        }
        let names = args.iter().map(|arg| (*arg).to_owned()).collect();
        Ok(Invocation::Chained(selection.enqueue((self.build)(names))))
    }
}

struct HasClass;

impl Capability for HasClass {
    fn name(&self) -> &'static str {
        "has_class"
    }

    fn description(&self) -> &'static str {
        "Reports whether each node carries the class"
    }

    fn shapes(&self) -> &'static [Shape] {
        &[Shape::Accessor]
    }

    fn invoke(&self, selection: Selection, args: &[&str]) -> Result<Invocation, CapabilityError> {
        let [class_name] = args else {
            return Err(CapabilityError::arity(self.name(), "exactly one class name", args));
        };
        let values = selection.has_class(class_name).into_iter().map(Value::Bool).collect();
        Ok(Invocation::Values(values))
    }
}

static ADD_CLASS: ClassMutator = ClassMutator {
    name: "add_class",
    description: "Adds the classes to every node",
    build: add_class::<Vec<String>, String>,
};

static REMOVE_CLASS: ClassMutator = ClassMutator {
    name: "remove_class",
    description: "Removes the classes from every node",
    build: remove_class::<Vec<String>, String>,
};

static TOGGLE_CLASS: ClassMutator = ClassMutator {
    name: "toggle_class",
    description: "Toggles the classes on every node, one after another",
    build: toggle_class::<Vec<String>, String>,
};

static HAS_CLASS: HasClass = HasClass;

register_capability!(&ADD_CLASS);
register_capability!(&REMOVE_CLASS);
register_capability!(&TOGGLE_CLASS);
register_capability!(&HAS_CLASS);
