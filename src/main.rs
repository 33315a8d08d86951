//! CLI entry point for flatsheet.
//!
//! Reads a spreadsheet export, applies the configured filters, computes the
//! daily decay score series, and publishes CSV/JSON/JSONP flat files.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::Local;
use clap::Parser;
use flatsheet::score::build_series;
use flatsheet::source::{CsvFile, RowSource};
use flatsheet::{filter, output, process::process};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flatsheet")]
#[command(about = "Filters a spreadsheet export and republishes it as flat files", long_about = None)]
struct Cli {
    /// Spreadsheet export to publish (first row = header)
    #[arg(value_name = "INPUT_CSV")]
    input: PathBuf,

    /// CSV of filter rules (key,value columns); omit to publish everything
    #[arg(short, long)]
    filters: Option<String>,

    /// Directory for the published artifacts
    #[arg(short, long, default_value = "output")]
    out_dir: PathBuf,

    /// Basename for the record artifacts; defaults to the input file stem
    #[arg(short, long)]
    name: Option<String>,

    /// Callback name wrapping the records JSONP artifact
    #[arg(long, default_value = "records_callback")]
    records_callback: String,

    /// Callback name wrapping the scores JSONP artifact
    #[arg(long, default_value = "scores_callback")]
    scores_callback: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/flatsheet.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flatsheet.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    publish(&cli)
}

fn publish(cli: &Cli) -> Result<()> {
    let rows = CsvFile::new(&cli.input).fetch_rows()?;
    let Some((header, data_rows)) = rows.split_first() else {
        bail!("input {} has no header row", cli.input.display());
    };

    let rules = match &cli.filters {
        Some(path) => {
            let rules = filter::load_rules(path)?;
            info!(path = %path, rules = rules.len(), "filter rules loaded");
            rules
        }
        None => Vec::new(),
    };

    let today = Local::now().date_naive();
    let processed = process(header, data_rows, &rules, today)?;

    std::fs::create_dir_all(&cli.out_dir)?;

    let name = match &cli.name {
        Some(name) => name.clone(),
        None => cli
            .input
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("records")
            .to_string(),
    };

    // The CSV artifact is always written, header included, even when every
    // row was filtered out.
    let csv_path = cli.out_dir.join(format!("{}.csv", name));
    output::write_rows(&csv_path, header, &processed.raw_rows)?;

    if processed.accepted.is_empty() {
        info!("no records accepted, skipping JSON artifacts");
    } else {
        output::write_json(&cli.out_dir.join(format!("{}.json", name)), &processed.accepted)?;
        output::write_jsonp(
            &cli.out_dir.join(format!("{}.jsonp", name)),
            &cli.records_callback,
            &processed.accepted,
        )?;
    }

    match build_series(&processed.observations, today)? {
        Some(series) => {
            output::write_json(&cli.out_dir.join("scores.json"), &series)?;
            output::write_jsonp(
                &cli.out_dir.join("scores.jsonp"),
                &cli.scores_callback,
                &series,
            )?;
            info!(days = series.len(), "score series published");
        }
        None => info!("no observations, skipping score artifacts"),
    }

    info!(
        accepted = processed.accepted.len(),
        out_dir = %cli.out_dir.display(),
        "publish complete"
    );
    Ok(())
}
