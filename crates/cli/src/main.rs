// cargos CLI - price uniform requests and generate their documents

mod batch;
mod context;
mod exit_codes;
mod price;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cargos_config::{ConfigSnapshot, ConfigStore, Settings};
use cargos_engine::record::RecordStatus;
use cargos_engine::{BatchReport, Pipeline};
use cargos_io::{combine, PlaceholderRenderer};

use batch::OutputPlan;
use context::TemplateKind;
use exit_codes::{
    merge_exit_code, EXIT_CATALOG_INVALID, EXIT_ERROR, EXIT_ISSUES, EXIT_SUCCESS, EXIT_USAGE,
};
use settings::SettingsCommands;

#[derive(Parser)]
#[command(name = "cargos")]
#[command(about = "Price uniform requests and generate AUTORIZACION / CARGO documents")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Debug logging (overrides CARGOS_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Settings file to use instead of the one in the user config directory
    #[arg(long, global = true, env = "CARGOS_SETTINGS", value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a request workbook and write its documents
    #[command(after_help = "\
Examples:
  cargos generate pedido.xlsx
  cargos generate pedido.xlsx --catalog catalog.json --cargo CARGO.docx --out salida
  cargos generate pedido.xlsx --no-combine --json")]
    Generate {
        /// Request workbook (.xlsx, .xls, .ods)
        workbook: PathBuf,

        /// Catalog file (defaults to catalog.path)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// AUTORIZACION template (defaults to templates.autorizacion)
        #[arg(long)]
        autorizacion: Option<PathBuf>,

        /// CARGO template (defaults to templates.cargo)
        #[arg(long)]
        cargo: Option<PathBuf>,

        /// Output directory (defaults to output.directory)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Skip the per-store combined documents
        #[arg(long)]
        no_combine: bool,

        /// Document date as YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Print the batch report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Price a request workbook without writing documents
    #[command(after_help = "\
Examples:
  cargos check pedido.xlsx
  cargos check pedido.xlsx --catalog catalog.toml --json")]
    Check {
        /// Request workbook (.xlsx, .xls, .ods)
        workbook: PathBuf,

        /// Catalog file (defaults to catalog.path)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print records and report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show catalog prices
    #[command(after_help = "\
Examples:
  cargos price --matrix
  cargos price --occupation 'MOZO(A)' --garment POLO --size XL --store 'TARAPOTO PLAZA'")]
    Price {
        /// Catalog file (defaults to catalog.path)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print the whole occupation x garment x size x locality grid
        #[arg(long, conflicts_with_all = ["occupation", "garment"])]
        matrix: bool,

        /// Occupation label as written on a request
        #[arg(long, required_unless_present = "matrix", requires = "garment")]
        occupation: Option<String>,

        /// Garment column identifier (e.g. CAMISA_H, POLO)
        #[arg(long, requires = "occupation")]
        garment: Option<String>,

        /// Size as written on a request
        #[arg(long, default_value = "M")]
        size: String,

        /// Store name; its locality picks the price column
        #[arg(long)]
        store: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Combine Word documents into one, each starting on a new page
    #[command(after_help = "\
Examples:
  cargos combine -o TODOS.docx a.docx b.docx c.docx")]
    Combine {
        /// Documents to combine, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Combined document
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CARGOS_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings_path = cli.settings.as_deref();

    let result = match cli.command {
        Commands::Generate {
            workbook,
            catalog,
            autorizacion,
            cargo,
            out,
            no_combine,
            date,
            json,
        } => cmd_generate(
            settings_path,
            workbook,
            catalog,
            [autorizacion, cargo],
            out,
            no_combine,
            date,
            json,
        ),
        Commands::Check {
            workbook,
            catalog,
            json,
        } => cmd_check(settings_path, workbook, catalog, json),
        Commands::Price {
            catalog,
            matrix,
            occupation,
            garment,
            size,
            store,
            json,
        } => cmd_price(settings_path, catalog, matrix, occupation, garment, size, store, json),
        Commands::Combine { inputs, output } => cmd_combine(inputs, output),
        Commands::Settings { command } => settings::cmd_settings(command, settings_path),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// shared helpers
// ============================================================================

fn open_catalog(flag: Option<PathBuf>, settings: &Settings) -> Result<Arc<ConfigSnapshot>, CliError> {
    let path = flag
        .or_else(|| settings.catalog_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| {
            CliError::usage("no catalog given")
                .with_hint("pass --catalog or run `cargos settings set catalog.path <file>`")
        })?;
    let store = ConfigStore::open(&path).map_err(|e| CliError {
        code: EXIT_CATALOG_INVALID,
        message: format!("{}: {e}", path.display()),
        hint: None,
    })?;
    Ok(store.snapshot())
}

fn build_pipeline(snapshot: &ConfigSnapshot) -> Result<Pipeline<'_>, CliError> {
    Pipeline::new(snapshot).map_err(|e| CliError {
        code: EXIT_CATALOG_INVALID,
        message: e.to_string(),
        hint: None,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;
    println!("{json}");
    Ok(())
}

/// Human summary on stderr.
fn print_report(report: &BatchReport) {
    let s = &report.summary;
    eprintln!(
        "{} people: {} fully priced, {} with missing prices, {} for review ({} unrecognized occupations); total {}",
        s.records,
        s.fully_priced,
        s.partially_priced,
        s.review,
        s.unrecognized_occupations,
        s.total_amount.soles(),
    );
    for skipped in &report.skipped_sheets {
        eprintln!("  skipped sheet '{}': {}", skipped.sheet, skipped.message);
    }
    for warning in &report.sheet_warnings {
        eprintln!("  sheet '{}': {}", warning.sheet, warning.message);
    }
    for issue in &report.issues {
        eprintln!(
            "  {} row {} {}: {}",
            issue.store, issue.row_number, issue.full_name, issue.kind
        );
    }
    for failure in &report.failed_outputs {
        eprintln!("  {} {} output failed: {}", failure.store, failure.kind, failure.message);
    }
}

fn issues_error(report: &BatchReport) -> Result<(), CliError> {
    if report.has_issues() {
        return Err(CliError {
            code: EXIT_ISSUES,
            message: "completed with issues".to_string(),
            hint: Some("fix the catalog prices or request rows listed above and run again".to_string()),
        });
    }
    Ok(())
}

// ============================================================================
// generate
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    settings_path: Option<&Path>,
    workbook: PathBuf,
    catalog: Option<PathBuf>,
    [autorizacion, cargo]: [Option<PathBuf>; 2],
    out: Option<PathBuf>,
    no_combine: bool,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<(), CliError> {
    let (settings, _) = settings::load(settings_path);

    let configured = [
        (TemplateKind::Autorizacion, autorizacion.or_else(|| settings.autorizacion_template.as_ref().map(PathBuf::from))),
        (TemplateKind::Cargo, cargo.or_else(|| settings.cargo_template.as_ref().map(PathBuf::from))),
    ];
    let mut templates = Vec::new();
    for (kind, path) in configured {
        let Some(path) = path else { continue };
        if !path.is_file() {
            return Err(CliError::usage(format!(
                "{} template not found: {}",
                kind.name(),
                path.display()
            )));
        }
        templates.push((kind, path));
    }
    if templates.is_empty() {
        return Err(CliError::usage("no document templates configured").with_hint(
            "pass --autorizacion / --cargo or set templates.autorizacion / templates.cargo",
        ));
    }

    let snapshot = open_catalog(catalog, &settings)?;
    let pipeline = build_pipeline(&snapshot)?;
    let mut priced = batch::price_request(&pipeline, &workbook)?;

    let plan = OutputPlan {
        directory: out.unwrap_or_else(|| PathBuf::from(&settings.output_directory)),
        templates,
        combine: settings.combine_per_store && !no_combine,
        date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
    };
    let renderer = PlaceholderRenderer::new().map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })?;
    batch::write_documents(&mut priced, &plan, &renderer);

    if json {
        print_json(&priced.report)?;
    }
    print_report(&priced.report);
    eprintln!(
        "wrote {} document(s) and {} combined document(s) to {}",
        priced.report.documents_written,
        priced.report.combined_written,
        plan.directory.display()
    );
    issues_error(&priced.report)
}

// ============================================================================
// check
// ============================================================================

fn cmd_check(
    settings_path: Option<&Path>,
    workbook: PathBuf,
    catalog: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let (settings, _) = settings::load(settings_path);
    let snapshot = open_catalog(catalog, &settings)?;
    let pipeline = build_pipeline(&snapshot)?;
    let priced = batch::price_request(&pipeline, &workbook)?;

    if json {
        let records: Vec<_> = priced.records().collect();
        print_json(&serde_json::json!({
            "records": records,
            "report": &priced.report,
        }))?;
    } else {
        for record in priced.records() {
            let status = match record.status() {
                RecordStatus::FullyPriced => "",
                RecordStatus::PartiallyPriced => "  [missing prices]",
                RecordStatus::Review => "  [review]",
            };
            println!(
                "{:<14} {:>4}  {:<32} {:<24} {:>12}  juegos {}{}",
                record.store,
                record.row_number,
                record.full_name,
                record.occupation_display,
                record.total.amount.soles(),
                record.juegos,
                status
            );
        }
    }
    print_report(&priced.report);
    issues_error(&priced.report)
}

// ============================================================================
// price
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_price(
    settings_path: Option<&Path>,
    catalog: Option<PathBuf>,
    matrix: bool,
    occupation: Option<String>,
    garment: Option<String>,
    size: String,
    store: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let (settings, _) = settings::load(settings_path);
    let snapshot = open_catalog(catalog, &settings)?;
    let pipeline = build_pipeline(&snapshot)?;

    if matrix {
        return price::cmd_matrix(&pipeline, json);
    }
    match (occupation, garment) {
        (Some(occupation), Some(garment)) => {
            price::cmd_single(&pipeline, &occupation, &garment, &size, store.as_deref(), json)
        }
        _ => Err(CliError::usage("--occupation and --garment are required without --matrix")),
    }
}

// ============================================================================
// combine
// ============================================================================

fn cmd_combine(inputs: Vec<PathBuf>, output: PathBuf) -> Result<(), CliError> {
    combine(&inputs, &output).map_err(|e| CliError {
        code: merge_exit_code(&e),
        message: e.to_string(),
        hint: None,
    })?;
    eprintln!("combined {} document(s) into {}", inputs.len(), output.display());
    Ok(())
}
