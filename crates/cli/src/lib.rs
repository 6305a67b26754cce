mod commands;
mod logging;
mod util;

#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand, ValueEnum};
use commands::apply::ApplyArgs;
use commands::capabilities::CapabilitiesArgs;
use commands::query::QueryArgs;
use logging::LogLevel;
use util::CliResult;

#[derive(Parser, Debug)]
#[command(name = "domqueue", version, about = "Select nodes in markup files and queue changes against them")]
struct Cli {
    /// Log level used when DOMQUEUE_LOG is not set.
    #[arg(long = "log-level", global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an accessor or structural step and print the results.
    Query(QueryArgs),
    /// Queue mutators, flush once and emit the resulting markup.
    Apply(ApplyArgs),
    /// List registered capabilities.
    Capabilities(CapabilitiesArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let output = match &cli.command {
        Command::Query(args) => commands::query::run(args)?,
        Command::Apply(args) => commands::apply::run(args)?,
        Command::Capabilities(args) => commands::capabilities::run(args)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
