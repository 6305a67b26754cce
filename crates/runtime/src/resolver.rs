use crate::selection::Selection;
use domqueue_core::Document;
use std::fmt;

/// Classified selection query.
///
/// The first character picks the lookup: `#` for identifiers, `.` for class
/// names and `*` for a general selector. Anything else selects nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
    Query(&'a str),
    Unrecognized(&'a str),
}

impl<'a> Selector<'a> {
    pub fn parse(query: &'a str) -> Self {
        if let Some(id) = query.strip_prefix('#') {
            Self::Id(id)
        } else if let Some(class_names) = query.strip_prefix('.') {
            Self::Class(class_names)
        } else if let Some(selector) = query.strip_prefix('*') {
            Self::Query(selector)
        } else {
            Self::Unrecognized(query)
        }
    }

    /// Resolves against `context`. Misses and malformed queries yield an empty
    /// selection.
    pub fn resolve(&self, context: &dyn Document) -> Selection {
        let nodes = match *self {
            Self::Id(id) => context.element_by_id(id).into_iter().collect(),
            Self::Class(class_names) => context.elements_by_class_name(class_names),
            Self::Query(selector) => match context.query_selector_all(selector) {
                Ok(nodes) => nodes,
                Err(error) => {
                    tracing::debug!(selector, %error, "selector rejected, selecting nothing");
                    Vec::new()
                }
            },
            Self::Unrecognized(query) => {
                tracing::debug!(query, "unrecognized query prefix, selecting nothing");
                Vec::new()
            }
        };
        tracing::trace!(query = %self, matches = nodes.len(), "selection resolved");
        Selection::new(nodes)
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class_names) => write!(f, ".{class_names}"),
            Self::Query(selector) => write!(f, "*{selector}"),
            Self::Unrecognized(query) => f.write_str(query),
        }
    }
}

/// Resolves `query` against an explicit document or element.
pub fn select(query: &str, context: &dyn Document) -> Selection {
    Selector::parse(query).resolve(context)
}

/// Binds a default document for repeated selections.
#[derive(Clone, Copy)]
pub struct Scope<'d> {
    document: &'d dyn Document,
}

impl<'d> Scope<'d> {
    pub fn new(document: &'d dyn Document) -> Self {
        Self { document }
    }

    pub fn select(&self, query: &str) -> Selection {
        select(query, self.document)
    }

    /// Like [`Scope::select`], but resolves against `context` when given.
    pub fn select_within(&self, query: &str, context: Option<&dyn Document>) -> Selection {
        select(query, context.unwrap_or(self.document))
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope").finish_non_exhaustive()
    }
}
