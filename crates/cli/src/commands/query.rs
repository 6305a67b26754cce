use crate::OutputFormat;
use crate::util::{CliResult, format_value, load_document};
use anyhow::bail;
use clap::Args;
use domqueue_core::{Node, Value};
use domqueue_runtime::{Invocation, Selection, select};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// `#id`, `.class` or `*css-selector`.
    #[arg(value_name = "SELECTOR")]
    pub selector: String,
    /// Accessor or structural capability; omit to list the selected nodes.
    #[arg(value_name = "CAPABILITY")]
    pub capability: Option<String>,
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct NodeSummary {
    id: String,
    tag: String,
    element_id: Option<String>,
    classes: Vec<String>,
}

impl NodeSummary {
    fn from_node(node: &dyn Node) -> Self {
        Self {
            id: node.node_id().to_string(),
            tag: node.tag_name(),
            element_id: node.attribute("id"),
            classes: node
                .attribute("class")
                .map(|classes| classes.split_ascii_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
        }
    }

    fn label(&self) -> String {
        let mut label = self.tag.clone();
        if let Some(id) = &self.element_id {
            let _ = write!(&mut label, "#{id}");
        }
        for class in &self.classes {
            let _ = write!(&mut label, ".{class}");
        }
        label
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum QueryOutput {
    Nodes(Vec<NodeSummary>),
    Values(Vec<(NodeSummary, Value)>),
}

pub fn run(args: &QueryArgs) -> CliResult<String> {
    let document = load_document(&args.file)?;
    let selection = select(&args.selector, &document);
    let output = evaluate(selection, args.capability.as_deref(), &args.args)?;

    match args.format {
        OutputFormat::Text => Ok(render_query_text(&output)),
        OutputFormat::Json => render_query_json(&output),
    }
}

pub(crate) fn evaluate(
    selection: Selection,
    capability: Option<&str>,
    args: &[String],
) -> CliResult<QueryOutput> {
    let Some(name) = capability else {
        return Ok(QueryOutput::Nodes(summarize(&selection)));
    };

    let owners = summarize(&selection);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match selection.invoke(name, &args)? {
        Invocation::Values(values) => Ok(QueryOutput::Values(owners.into_iter().zip(values).collect())),
        Invocation::Chained(selection) if selection.queue().is_empty() => {
            Ok(QueryOutput::Nodes(summarize(&selection)))
        }
        Invocation::Chained(_) => {
            bail!("'{name}' queues changes; use `domqueue apply` to write them")
        }
    }
}

fn summarize(selection: &Selection) -> Vec<NodeSummary> {
    selection.read(NodeSummary::from_node)
}

fn colorize_node_label(label: &str) -> String {
    label
        .if_supports_color(Stream::Stdout, |text| text.bold().fg_rgb::<79, 166, 255>().to_string())
        .to_string()
}

fn colorize_value(value: &str) -> String {
    value
        .if_supports_color(Stream::Stdout, |text| text.fg_rgb::<136, 192, 74>().to_string())
        .to_string()
}

pub(crate) fn render_query_text(output: &QueryOutput) -> String {
    let mut rendered = String::new();
    match output {
        QueryOutput::Nodes(nodes) => {
            for node in nodes {
                let _ = writeln!(&mut rendered, "{}", colorize_node_label(&node.label()));
            }
        }
        QueryOutput::Values(values) => {
            for (node, value) in values {
                let label = colorize_node_label(&node.label());
                let value = colorize_value(&format_value(value));
                let _ = writeln!(&mut rendered, "{label}: {value}");
            }
        }
    }
    rendered.trim_end().to_owned()
}

#[derive(Serialize)]
struct ValueItem<'a> {
    node: &'a NodeSummary,
    value: &'a Value,
}

pub(crate) fn render_query_json(output: &QueryOutput) -> CliResult<String> {
    let rendered = match output {
        QueryOutput::Nodes(nodes) => serde_json::to_string_pretty(nodes)?,
        QueryOutput::Values(values) => {
            let items: Vec<ValueItem<'_>> =
                values.iter().map(|(node, value)| ValueItem { node, value }).collect();
            serde_json::to_string_pretty(&items)?
        }
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page_file, strip_ansi};
    use rstest::rstest;

    fn query_args(file: &std::path::Path, selector: &str, rest: &[&str], format: OutputFormat) -> QueryArgs {
        QueryArgs {
            file: file.to_path_buf(),
            selector: selector.to_owned(),
            capability: rest.first().map(|name| (*name).to_owned()),
            args: rest.iter().skip(1).map(|arg| (*arg).to_owned()).collect(),
            format,
        }
    }

    #[rstest]
    fn text_accessor_prints_one_line_per_node() {
        let file = page_file();
        let output = run(&query_args(file.path(), ".class-1", &["text"], OutputFormat::Text)).unwrap();
        let plain = strip_ansi(&output);
        assert_eq!(plain, "div#id-1.class-1: text-A\ndiv#id-2.class-1: text-B");
    }

    #[rstest]
    fn selection_without_capability_lists_nodes() {
        let file = page_file();
        let output = run(&query_args(file.path(), "*li", &[], OutputFormat::Text)).unwrap();
        assert_eq!(strip_ansi(&output), "li\nli.mid");
    }

    #[rstest]
    fn structural_steps_list_the_new_selection() {
        let file = page_file();
        let output =
            run(&query_args(file.path(), "#list", &["children", ".mid"], OutputFormat::Text)).unwrap();
        assert_eq!(strip_ansi(&output), "li.mid");
    }

    #[rstest]
    fn json_output_pairs_nodes_with_values() {
        let file = page_file();
        let output = run(&query_args(file.path(), "#id-2", &["data"], OutputFormat::Json)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["node"]["tag"], "div");
        assert_eq!(parsed[0]["node"]["element_id"], "id-2");
        assert_eq!(parsed[0]["value"]["id"], "data-id-2");
    }

    #[rstest]
    fn mutators_are_refused() {
        let file = page_file();
        let err = run(&query_args(file.path(), ".class-1", &["add_class", "x"], OutputFormat::Text))
            .unwrap_err();
        assert!(err.to_string().contains("domqueue apply"));
    }

    #[rstest]
    fn missing_nodes_print_nothing() {
        let file = page_file();
        let output = run(&query_args(file.path(), "#nope", &["text"], OutputFormat::Text)).unwrap();
        assert!(output.is_empty());
    }
}
