//! CLI entry point for the data sweeper.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use sweeper_processing::{
    ChartData, ChartKind, ChartSpec, ColumnFences, ExportFormat, PipelineState, ScalingMethod,
    SessionSummary, SweeperConfig, UploadedFile,
};
use tracing::{error, info};

/// CLI-compatible scaling method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliScaling {
    /// Leave values untouched
    None,
    /// Map each numeric column onto [0, 1]
    MinMax,
    /// Subtract the mean, divide by the standard deviation
    ZScore,
}

impl From<CliScaling> for ScalingMethod {
    fn from(cli: CliScaling) -> Self {
        match cli {
            CliScaling::None => ScalingMethod::None,
            CliScaling::MinMax => ScalingMethod::MinMax,
            CliScaling::ZScore => ScalingMethod::ZScore,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliChart {
    Line,
    Bar,
    Scatter,
    Pie,
}

impl From<CliChart> for ChartKind {
    fn from(cli: CliChart) -> Self {
        match cli {
            CliChart::Line => ChartKind::Line,
            CliChart::Bar => ChartKind::Bar,
            CliChart::Scatter => ChartKind::Scatter,
            CliChart::Pie => ChartKind::Pie,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Csv,
    Excel,
    /// Newline-delimited JSON records
    Json,
    Parquet,
}

impl From<CliFormat> for ExportFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Csv => ExportFormat::Csv,
            CliFormat::Excel => ExportFormat::Excel,
            CliFormat::Json => ExportFormat::Json,
            CliFormat::Parquet => ExportFormat::Parquet,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Merge, clean, transform and export tabular data files",
    long_about = "Merge CSV and spreadsheet files, clean and transform the result, \
                  and export it as CSV, Excel, JSON lines or Parquet.\n\n\
                  Stages run in a fixed order: dedupe, impute, columns, scale, \
                  outliers, chart, export.\n\n\
                  EXAMPLES:\n  \
                  # Merge two files and export as Excel\n  \
                  data-sweeper -i jan.csv -i feb.xlsx --format excel\n\n  \
                  # Clean, standardize and report outliers as JSON\n  \
                  data-sweeper -i sales.csv --dedupe --impute --scale z-score --outliers --json\n\n  \
                  # Pie chart data of revenue per region\n  \
                  data-sweeper -i sales.csv --chart pie --x region --y revenue --json"
)]
struct Args {
    /// Input file (.csv, .xlsx, .xlsm, .xls, .ods); repeat to merge several
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Remove exact duplicate rows
    #[arg(long)]
    dedupe: bool,

    /// Fill missing numeric values with the column mean
    #[arg(long)]
    impute: bool,

    /// Keep only these columns, in this order
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Scaling applied to numeric columns
    #[arg(long, value_enum, default_value = "none")]
    scale: CliScaling,

    /// Report rows outside the IQR fences
    #[arg(long)]
    outliers: bool,

    /// Outlier fence width in multiples of the IQR
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Fail on constant or all-missing columns instead of mapping them to 0
    #[arg(long)]
    strict: bool,

    /// Build chart data (requires --x and --y)
    #[arg(long, value_enum, requires_all = ["x", "y"])]
    chart: Option<CliChart>,

    /// Chart x axis (pie: slice names)
    #[arg(long)]
    x: Option<String>,

    /// Chart y axis (pie: slice values); must be numeric
    #[arg(long)]
    y: Option<String>,

    /// Export format
    #[arg(long, value_enum)]
    format: Option<CliFormat>,

    /// Output directory for the exported file
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Exported file name (without extension)
    #[arg(long, default_value = "processed_data")]
    output_name: String,

    /// Rows shown in the preview
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output a JSON session report to stdout instead of a human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,
}

/// Everything one invocation produced, for `--json`.
#[derive(Debug, Serialize)]
struct CliReport {
    session: SessionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    outliers: Option<OutlierSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct OutlierSummary {
    count: usize,
    row_indices: Vec<usize>,
    fences: Vec<ColumnFences>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = SweeperConfig::builder()
        .iqr_multiplier(args.iqr_multiplier)
        .strict_statistics(args.strict)
        .output_file_stem(&args.output_name)
        .preview_rows(args.preview_rows)
        .build()?;

    match run(&args, config) {
        Ok(report) => print_report(&report, &args),
        Err(e) => {
            error!("Sweep failed: {}", e);
            Err(e)
        }
    }
}

fn run(args: &Args, config: SweeperConfig) -> Result<CliReport> {
    let files = args
        .inputs
        .iter()
        .map(|path| {
            UploadedFile::from_path(path)
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loading {} file(s)", files.len());
    let mut state = PipelineState::from_uploads(&files, config)?;
    if !args.quiet && !args.json {
        println!("Merged Data Preview\n{}", state.preview());
    }

    if args.dedupe {
        state.deduplicate()?;
    }
    if args.impute {
        state.impute_numeric_means()?;
    }
    if !args.columns.is_empty() {
        state.select_columns(&args.columns)?;
    }
    if !matches!(args.scale, CliScaling::None) {
        state.scale(args.scale.into())?;
    }

    let outliers = if args.outliers {
        let report = state.detect_outliers()?;
        if !args.quiet && !args.json && !report.is_empty() {
            println!("Outliers\n{}", report.rows);
        }
        Some(OutlierSummary {
            count: report.count(),
            row_indices: report.row_indices,
            fences: report.fences,
        })
    } else {
        None
    };

    let chart = match (args.chart, &args.x, &args.y) {
        (Some(kind), Some(x), Some(y)) => {
            Some(state.chart(&ChartSpec::new(kind.into(), x.as_str(), y.as_str()))?)
        }
        _ => None,
    };

    let export = match args.format {
        Some(format) => Some(state.export(format.into())?.write_to_dir(&args.output)?),
        None => None,
    };

    Ok(CliReport {
        session: state.summary(),
        outliers,
        chart,
        export,
    })
}

/// Print the final report.
///
/// Uses `println!` on purpose: this is the command's output, not logging.
fn print_report(report: &CliReport, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let session = &report.session;
    println!();
    println!("{}", "=".repeat(60));
    println!("SWEEP COMPLETE");
    println!("{}", "=".repeat(60));
    println!(
        "Table: {} rows x {} columns ({} missing cells)",
        session.rows,
        session.columns.len(),
        session.missing_cells
    );
    println!("Numeric columns: {}", session.numeric_columns.join(", "));

    if !session.history.is_empty() {
        println!();
        println!("Stages:");
        for record in &session.history {
            println!(
                "  - {} ({}x{} -> {}x{})",
                record.description,
                record.rows_before,
                record.columns_before,
                record.rows_after,
                record.columns_after
            );
        }
    }

    if let Some(ref outliers) = report.outliers {
        println!();
        println!("Outliers: {} row(s)", outliers.count);
        for fences in &outliers.fences {
            println!(
                "  {}: [{:.4}, {:.4}] ({} outside)",
                fences.column, fences.lower, fences.upper, fences.outlier_count
            );
        }
    }

    if let Some(ref chart) = report.chart {
        println!();
        println!(
            "{}: {} vs {} ({} points)",
            chart.title,
            chart.x_label,
            chart.y_label,
            chart.points.len()
        );
    }

    if let Some(ref path) = report.export {
        println!();
        println!("Exported: {}", path.display());
    }

    println!();
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(60));
    Ok(())
}
