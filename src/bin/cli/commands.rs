//! Command Execution Logic
//!
//! Runs the scan pipeline for `scan` and serves the informational commands.

use anyhow::Context;
use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};
use tracing::{debug, info};

use todo_md::lang::registry::registered_languages;
use todo_md::{ReportFormat, ReportWriter, ScanConfig, ScanOutcome, ScanPipeline};

use crate::cli::args::ScanArgs;
use crate::cli::config_layer::build_scan_config;

/// Scan a directory and write the report.
pub fn scan_command(args: ScanArgs) -> anyhow::Result<()> {
    let config = build_scan_config(&args)?;
    debug!("Effective configuration: {:?}", config);

    let with_context = config.resolve_scopes;
    let mut pipeline = ScanPipeline::new(config).context("Failed to initialize scan pipeline")?;

    let outcome = pipeline
        .scan(&args.directory)
        .with_context(|| format!("Failed to scan {}", args.directory.display()))?;

    let items = match outcome {
        ScanOutcome::NoItems => {
            println!("No TODOs/FIXMEs found.");
            return Ok(());
        }
        ScanOutcome::Items(items) => items,
    };

    let format = ReportFormat::from(args.format);
    let output_path = args.output_path();
    let scanned_root = args.directory.display().to_string();

    ReportWriter::new(format, with_context)
        .write_report(&items, &scanned_root, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Reported {} items", items.len());
    println!(
        "Wrote {} report to {}",
        format.display_name(),
        output_path.display()
    );

    Ok(())
}

/// Print default configuration in YAML format
pub fn print_default_config() -> anyhow::Result<()> {
    println!("# Default todo-md configuration");
    println!("# Save this as .todo-md.yml or pass it with: todo-md scan --config <file>");
    println!();

    let config = ScanConfig::default();
    let yaml_output = serde_yaml::to_string(&config)?;
    println!("{}", yaml_output);

    Ok(())
}

/// List supported languages
pub fn list_languages() -> anyhow::Result<()> {
    let languages = registered_languages();
    println!("{}", "Supported Languages".bright_blue().bold());
    println!("   Found {} supported languages", languages.len());
    println!();

    #[derive(Tabled)]
    struct LanguageRow {
        language: String,
        extension: String,
        comments: String,
        scope: String,
        notes: String,
    }

    let rows: Vec<LanguageRow> = languages
        .iter()
        .map(|info| LanguageRow {
            language: info.name.to_string(),
            extension: info
                .extensions
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(", "),
            comments: info
                .comment_styles
                .iter()
                .map(|style| style.opener())
                .collect::<Vec<_>>()
                .join(" "),
            scope: info.scope.label().to_string(),
            notes: info.notes.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    println!();
    println!(
        "{}",
        "Files with other extensions are scanned when added via --ext or the config file."
            .dimmed()
    );

    Ok(())
}
