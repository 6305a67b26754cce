use anyhow::Context;
use domqueue_core::Value;
use domqueue_document::MemoryDocument;
use std::fs;
use std::path::Path;

pub type CliResult<T> = anyhow::Result<T>;

pub fn load_document(path: &Path) -> CliResult<MemoryDocument> {
    let markup =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document = MemoryDocument::parse(&markup)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "document loaded");
    Ok(document)
}

pub fn write_file(path: &Path, contents: &str) -> CliResult<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Plain rendering of an accessor value, one line per node.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(flag) => flag.to_string(),
        Value::Text(text) => text.clone(),
        Value::Entries(entries) => entries
            .iter()
            .map(|(key, value)| {
                let quoted = serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""));
                format!("{key}={quoted}")
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Splits `name` or `name:arg,arg` into the capability name and its arguments.
///
/// Inside arguments `\,` stands for a literal comma and `\\` for a backslash.
pub fn parse_operation(operation: &str) -> (&str, Vec<String>) {
    let Some((name, raw)) = operation.split_once(':') else {
        return (operation, Vec::new());
    };
    if raw.is_empty() {
        return (name, Vec::new());
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped @ (',' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ',' => args.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    args.push(current);
    (name, args)
}
