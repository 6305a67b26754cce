//! Text content.

use super::{Capability, CapabilityError, Invocation, Shape};
use crate::operation::{Operation, label};
use crate::register_capability;
use crate::selection::Selection;
use domqueue_core::Value;

pub fn set_text(text: impl Into<String>) -> Operation {
    let text = text.into();
    Operation::new(label("text", &[text.as_str()]), move |node| node.set_text_content(&text))
}

pub trait TextExt: Sized {
    /// Text content of every node at call time.
    fn text(&self) -> Vec<String>;

    #[must_use]
    fn set_text(self, text: impl Into<String>) -> Self;
}

impl TextExt for Selection {
    fn text(&self) -> Vec<String> {
        self.read(|node| node.text_content())
    }

    fn set_text(self, text: impl Into<String>) -> Self {
        self.enqueue(set_text(text))
    }
}

struct Text;

impl Capability for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn description(&self) -> &'static str {
        "Reads the text content, or replaces it when given one argument"
    }

    fn shapes(&self) -> &'static [Shape] {
        &[Shape::Accessor, Shape::Mutator]
    }

    fn invoke(&self, selection: Selection, args: &[&str]) -> Result<Invocation, CapabilityError> {
        match args {
            [] => Ok(Invocation::Values(selection.text().into_iter().map(Value::Text).collect())),
            [text] => Ok(Invocation::Chained(selection.set_text(*text))),
            _ => Err(CapabilityError::arity(self.name(), "zero or one argument", args)),
        }
    }
}

static TEXT: Text = Text;

register_capability!(&TEXT);
