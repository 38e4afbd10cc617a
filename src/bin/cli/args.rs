//! CLI Argument Structures
//!
//! Command-line definitions for the todo-md binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use todo_md::ReportFormat;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract TODO/FIXME comments into a Markdown report
#[derive(Parser)]
#[command(name = "todo-md")]
#[command(version = VERSION)]
#[command(about = "TODO-MD: extract TODO/FIXME comments into a Markdown report")]
#[command(long_about = "TODO-MD: extract TODO/FIXME comments into a Markdown report

Scan a source tree for TODO/FIXME markers in comments and write them to a
Markdown table, together with the function or class each one sits in.

Common Usage:

  # Scan ./src and write report_v2.md
  todo-md scan ./src

  # First-generation behaviour: raw lines, upper-case markers, no context
  todo-md scan --legacy ./src -o report.md

  # Extra markers and a JSON report
  todo-md scan ./src --marker HACK --marker XXX --format json -o todos.json
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and write a report
    Scan(ScanArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// List supported languages, comment syntaxes and scope strategies
    #[command(name = "list-languages")]
    ListLanguages,
}

/// Arguments for `todo-md scan`
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root folder to scan
    pub directory: PathBuf,

    /// Report file to write [default: report_v2.md, or report.md with --legacy]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to .todo-md.yml / .todo-md.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use the first-generation line scanner (case-sensitive initial, no context)
    #[arg(long)]
    pub legacy: bool,

    /// Skip enclosing-scope resolution
    #[arg(long)]
    pub no_context: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// Additional marker keyword (repeatable)
    #[arg(long = "marker", value_name = "KEYWORD")]
    pub markers: Vec<String>,

    /// Additional file extension to scan (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Glob pattern for paths to skip (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
}

impl ScanArgs {
    /// Report path, honoring the legacy default name.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            if self.legacy {
                PathBuf::from("report.md")
            } else {
                PathBuf::from("report_v2.md")
            }
        })
    }
}

/// Output format for reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table
    #[value(alias = "md")]
    Markdown,
    /// JSON document
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}
