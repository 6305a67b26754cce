use crate::util::{CliResult, load_document, parse_operation, write_file};
use anyhow::{Context, bail};
use clap::Args;
use domqueue_runtime::{FlushReport, Invocation, Selection, select};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    #[arg(value_name = "SELECTOR")]
    pub selector: String,
    /// `name` or `name:arg,arg`, applied left to right. Write `\,` for a comma
    /// inside an argument.
    #[arg(value_name = "OP", required = true, allow_hyphen_values = true)]
    pub operations: Vec<String>,
    /// Write the result here instead of printing it.
    #[arg(long = "output", short = 'o', conflicts_with = "in_place")]
    pub output: Option<PathBuf>,
    /// Overwrite FILE with the result.
    #[arg(long = "in-place")]
    pub in_place: bool,
    /// Fail without writing anything when an operation fails on any node.
    #[arg(long = "strict")]
    pub strict: bool,
}

pub fn run(args: &ApplyArgs) -> CliResult<String> {
    let document = load_document(&args.file)?;
    let selection = build(select(&args.selector, &document), &args.operations)?;

    let report = if args.strict {
        selection.flush().into_result().context("refusing to write a partially applied document")?
    } else {
        selection.flush()
    };
    tracing::info!(
        nodes = selection.len(),
        applied = report.applied,
        failures = report.failures.len(),
        "operations flushed"
    );

    let markup = document.outer_markup()?;
    let target = if args.in_place { Some(&args.file) } else { args.output.as_ref() };
    match target {
        Some(path) => {
            write_file(path, &markup)?;
            Ok(summary(&report))
        }
        None => Ok(markup),
    }
}

/// Replays the operation list against `selection` without flushing.
pub(crate) fn build(mut selection: Selection, operations: &[String]) -> CliResult<Selection> {
    for operation in operations {
        let (name, args) = parse_operation(operation);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        selection = match selection.invoke(name, &args)? {
            Invocation::Chained(next) => next,
            Invocation::Values(_) => {
                bail!("'{name}' only reads values; use `domqueue query` instead")
            }
        };
    }
    Ok(selection)
}

fn summary(report: &FlushReport) -> String {
    format!(
        "applied {} operation(s), skipped {}, {} failure(s)",
        report.applied,
        report.skipped,
        report.failures.len()
    )
}
