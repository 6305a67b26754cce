use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error reported by a document implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomError {
    pub kind: DomErrorKind,
    pub message: Option<String>,
}

impl DomError {
    pub fn new(kind: DomErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: Some(message.into()) }
    }

    pub fn simple(kind: DomErrorKind) -> Self {
        Self { kind, message: None }
    }

    pub fn invalid_token(token: &str) -> Self {
        Self::new(DomErrorKind::InvalidToken, format!("invalid class token '{token}'"))
    }

    pub fn invalid_name(name: &str) -> Self {
        Self::new(DomErrorKind::InvalidName, format!("invalid attribute name '{name}'"))
    }

    pub fn unsupported_selector(selector: &str) -> Self {
        Self::new(DomErrorKind::UnsupportedSelector, format!("unsupported selector '{selector}'"))
    }
}

impl Display for DomError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "{:#?}", self.kind),
        }
    }
}

impl Error for DomError {}

/// Categorises document failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomErrorKind {
    /// A class token was empty or contained whitespace.
    InvalidToken,
    /// An attribute or data key is not a valid name.
    InvalidName,
    /// The selector uses syntax the document cannot evaluate.
    UnsupportedSelector,
    /// The node is not an element (text, comment or document root).
    NotAnElement,
    /// Any other rejection by the underlying implementation.
    Rejected,
}
