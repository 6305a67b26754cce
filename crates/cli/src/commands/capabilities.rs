use crate::OutputFormat;
use crate::util::CliResult;
use clap::Args;
use domqueue_runtime::{Capability, capabilities};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use std::fmt::Write;

#[derive(Args, Debug, Clone)]
pub struct CapabilitiesArgs {
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, PartialEq)]
struct CapabilitySummary {
    name: &'static str,
    shapes: Vec<String>,
    description: &'static str,
}

impl CapabilitySummary {
    fn from_capability(capability: &dyn Capability) -> Self {
        Self {
            name: capability.name(),
            shapes: capability.shapes().iter().map(ToString::to_string).collect(),
            description: capability.description(),
        }
    }
}

pub fn run(args: &CapabilitiesArgs) -> CliResult<String> {
    let mut summaries: Vec<CapabilitySummary> =
        capabilities().map(CapabilitySummary::from_capability).collect();
    summaries.sort_by(|a, b| a.name.cmp(b.name));

    match args.format {
        OutputFormat::Text => Ok(render_text(&summaries)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&summaries)?),
    }
}

fn render_text(summaries: &[CapabilitySummary]) -> String {
    let width = summaries.iter().map(|summary| summary.name.len()).max().unwrap_or_default();
    let mut output = String::new();
    for summary in summaries {
        let name = format!("{:width$}", summary.name);
        let name = name.if_supports_color(Stream::Stdout, |text| text.bold().to_string()).to_string();
        let shapes = summary.shapes.join("/");
        let _ = writeln!(&mut output, "{name}  [{shapes}] {}", summary.description);
    }
    output.trim_end().to_owned()
}
