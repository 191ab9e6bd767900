use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use koola_tables::{
    ExtractError, ExtractOptions, ExtractionReport, HeaderMode, OutputFormat, PageSelection,
    extract_pdf_to_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2xlsx",
    version,
    about = "Extract tables from text PDFs into one spreadsheet"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract tables and write the combined sheet.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path (.xlsx or .csv).
    #[arg(short, long)]
    output: PathBuf,

    /// Output format; inferred from the output extension when omitted.
    #[arg(long)]
    format: Option<String>,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Never promote a first row to column names.
    #[arg(long)]
    no_header: bool,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Worksheet name for xlsx output.
    #[arg(long, default_value = koola_tables::DEFAULT_SHEET_NAME)]
    sheet_name: String,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn infer_format(args: &ExtractArgs) -> Result<OutputFormat> {
    if let Some(format) = args.format.as_deref() {
        return OutputFormat::from_str(format).map_err(|error| anyhow!(error));
    }

    match extension_of(&args.output).as_deref() {
        Some("csv") => Ok(OutputFormat::Csv),
        Some("xlsx") | None => Ok(OutputFormat::Xlsx),
        Some(other) => anyhow::bail!("cannot infer output format from extension '.{other}'"),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ExtractOptions {
        pages,
        header_mode: if args.no_header {
            HeaderMode::NoHeader
        } else {
            HeaderMode::AutoDetect
        },
        min_cols: args.min_cols,
        delimiter: args.delimiter as u8,
        sheet_name: args.sheet_name.clone(),
    })
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    eprintln!(
        "wrote {} row(s) from {} table(s) across {} page(s)",
        report.row_count, report.table_count, report.page_count
    );
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} page={:?} table_id={:?}: {}",
                warning.code, warning.page, warning.table_id, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let options = parse_options(args)?;
    let format = infer_format(args)?;
    extract_pdf_to_file(&args.input, &args.output, format, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("koola_tables=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                let no_tables = matches!(
                    error.downcast_ref::<ExtractError>(),
                    Some(ExtractError::NoTablesFound)
                );
                if no_tables {
                    ExitCode::from(2)
                } else {
                    ExitCode::from(1)
                }
            }
        },
    }
}
