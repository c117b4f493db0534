//! Sift - search, filter and paginate a rendered catalog listing
//!
//! Loads a saved listing page, replays the given inputs through the same
//! page context a browser front end would drive, and prints what ends up
//! visible.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod listing_cli;

/// Trace modules for structured tracing
#[derive(Debug, Clone, ValueEnum)]
enum TraceModule {
    Extract,
    Filter,
    Paginate,
    All,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "sift",
    about = "Search, filter and paginate a rendered plugin or guide listing",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: listing_cli::Command,

    /// Enable structured tracing (comma-separated: extract,filter,paginate,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Configuration file (defaults to sift.yaml in the user config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,
}

/// Initialize tracing with CLI flags
///
/// Logs always go to stderr so stdout stays parseable. When --trace is set,
/// output switches to JSON.
fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule]) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        let directives: &[&str] = match module {
            TraceModule::Extract => &["sift_core::catalog=trace", "sift_core::markup=trace"],
            TraceModule::Filter => &["sift_core::filter=trace", "sift_core::page=trace"],
            TraceModule::Paginate => &["sift_core::paginate=trace", "sift_core::view=trace"],
            TraceModule::All => &["sift_core=trace"],
        };

        for directive in directives {
            if let Ok(parsed) = directive.parse() {
                filter = filter.add_directive(parsed);
            }
        }
    }

    if !trace_modules.is_empty() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(trace_modules = ?trace_modules, "Sift tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace);

    let config = listing_cli::load_config(cli.config.as_deref())?;
    cli.command.execute(&config)
}
