//! Pulse CLI - Command-line interface for BetterMe Pulse
//!
//! Commands:
//! - report: Score an export and print the dashboard summary
//! - export: Write the recent-days table as CSV
//! - inspect: Show how many rows parsed and how many were usable

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use betterme_pulse::encoder::ReportEncoder;
use betterme_pulse::normalizer::Normalizer;
use betterme_pulse::parser::parse_table;
use betterme_pulse::source::{source_for, FetchError};
use betterme_pulse::{telemetry, PipelineOutcome, PulseConfig, PulseError, PulseProcessor};
use betterme_pulse::{PRODUCER_NAME, PULSE_VERSION};

/// Pulse - Four-pillar wellbeing dashboard from a daily-log export
#[derive(Parser)]
#[command(name = "pulse")]
#[command(version = PULSE_VERSION)]
#[command(about = "Score a daily-log sheet export", long_about = None)]
struct Cli {
    /// Export location: file path, - for stdin, or http(s) URL
    /// (defaults to PULSE_SOURCE)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log filter (RUST_LOG wins when set)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the export and print the dashboard summary
    Report {
        /// Output format
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Rolling average window in entries
        #[arg(long)]
        rolling_window: Option<usize>,

        /// Warning aggregation window in entries
        #[arg(long)]
        warning_window: Option<usize>,

        /// Rows in the recent-days table
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Write the recent-days table as CSV (newest first)
    Export {
        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Number of rows to export
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Show parse and normalization counts without scoring
    Inspect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum ReportFormat {
    /// Plain-text status panel
    Text,
    /// Single-line JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PulseCliError> {
    let mut config = PulseConfig::from_env().map_err(PulseError::from)?;
    if let Some(input) = cli.input {
        config.source = Some(input);
    }
    if let Some(secs) = cli.timeout {
        config.fetch_timeout = Duration::from_secs(secs.max(1));
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    telemetry::init(&config.log_level).map_err(|e| PulseCliError::Telemetry(e.to_string()))?;

    match cli.command {
        Commands::Report {
            format,
            rolling_window,
            warning_window,
            rows,
        } => {
            if let Some(window) = rolling_window {
                config.rolling_window = window;
            }
            if let Some(window) = warning_window {
                config.warning_window = window;
            }
            if let Some(rows) = rows {
                config.table_rows = rows;
            }
            cmd_report(&config, format)
        }

        Commands::Export { output, rows } => {
            if let Some(rows) = rows {
                config.table_rows = rows;
            }
            cmd_export(&config, &output)
        }

        Commands::Inspect { json } => cmd_inspect(&config, json),
    }
}

fn cmd_report(config: &PulseConfig, format: ReportFormat) -> Result<(), PulseCliError> {
    let outcome = load_outcome(config)?;
    let encoder = ReportEncoder::new().table_rows(config.table_rows);

    match format {
        ReportFormat::Text => print!("{}", encoder.encode_text(&outcome)),
        ReportFormat::Json => println!("{}", encoder.encode_to_json(&outcome, false)?),
        ReportFormat::JsonPretty => println!("{}", encoder.encode_to_json(&outcome, true)?),
    }

    Ok(())
}

fn cmd_export(config: &PulseConfig, output: &PathBuf) -> Result<(), PulseCliError> {
    let outcome = load_outcome(config)?;
    let encoder = ReportEncoder::new().table_rows(config.table_rows);

    let Some(snapshot) = outcome.snapshot() else {
        // an empty dashboard is not a failure
        eprint!("{}", encoder.encode_text(&outcome));
        return Ok(());
    };

    let csv = encoder.encode_csv(snapshot)?;
    if output.to_string_lossy() == "-" {
        print!("{csv}");
    } else {
        fs::write(output, csv)?;
    }

    Ok(())
}

fn cmd_inspect(config: &PulseConfig, json: bool) -> Result<(), PulseCliError> {
    let text = fetch_text(config)?;
    let table = parse_table(&text);
    let entries = Normalizer::normalize(&table.rows);

    let report = InspectReport {
        producer: PRODUCER_NAME.to_string(),
        version: PULSE_VERSION.to_string(),
        headers: table.headers.clone(),
        parsed_rows: table.rows.len(),
        usable_rows: entries.len(),
        dropped_rows: table.rows.len() - entries.len(),
        first_date: entries.first().map(|e| e.date.clone()),
        last_date: entries.last().map(|e| e.date.clone()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Export Inspection");
        println!("=================");
        println!("Headers:      {}", report.headers.join(", "));
        println!("Parsed rows:  {}", report.parsed_rows);
        println!("Usable rows:  {}", report.usable_rows);
        println!("Dropped rows: {}", report.dropped_rows);
        if let (Some(first), Some(last)) = (&report.first_date, &report.last_date) {
            println!("Date range:   {first} .. {last}");
        }
    }

    Ok(())
}

// Helper functions

fn fetch_text(config: &PulseConfig) -> Result<String, PulseCliError> {
    let location = config.source.as_deref().ok_or(PulseCliError::NoSource)?;
    if location.trim() == "-" && atty::is(atty::Stream::Stdin) {
        return Err(PulseCliError::InteractiveStdin);
    }

    let source = source_for(location).map_err(PulseError::from)?;
    let text = source
        .fetch(config.fetch_timeout)
        .map_err(PulseError::from)?;
    Ok(text)
}

fn load_outcome(config: &PulseConfig) -> Result<PipelineOutcome, PulseCliError> {
    let text = fetch_text(config)?;
    Ok(PulseProcessor::from_config(config).process(&text))
}

// Error types

#[derive(Debug)]
enum PulseCliError {
    Pulse(PulseError),
    Telemetry(String),
    NoSource,
    InteractiveStdin,
}

impl From<PulseError> for PulseCliError {
    fn from(e: PulseError) -> Self {
        PulseCliError::Pulse(e)
    }
}

impl From<io::Error> for PulseCliError {
    fn from(e: io::Error) -> Self {
        PulseCliError::Pulse(PulseError::Io(e))
    }
}

impl From<serde_json::Error> for PulseCliError {
    fn from(e: serde_json::Error) -> Self {
        PulseCliError::Pulse(PulseError::JsonError(e))
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PulseCliError> for CliError {
    fn from(e: PulseCliError) -> Self {
        match e {
            PulseCliError::Pulse(PulseError::Fetch(e @ FetchError::Timeout { .. })) => CliError {
                code: "FETCH_TIMEOUT".to_string(),
                message: format!("Error: {e}."),
                hint: Some("Retry later or raise --timeout".to_string()),
            },
            PulseCliError::Pulse(PulseError::Fetch(e)) => CliError {
                code: "FETCH_FAILED".to_string(),
                message: format!("Error: {e}"),
                hint: Some("Check the export location and sharing settings".to_string()),
            },
            PulseCliError::Pulse(PulseError::Config(e)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Fix the PULSE_* environment variables".to_string()),
            },
            PulseCliError::Pulse(e) => CliError {
                code: "PULSE_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            PulseCliError::Telemetry(msg) => CliError {
                code: "LOG_CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Use a valid tracing filter such as 'info' or 'betterme_pulse=debug'".to_string()),
            },
            PulseCliError::NoSource => CliError {
                code: "NO_SOURCE".to_string(),
                message: "No export location given".to_string(),
                hint: Some("Pass --input or set PULSE_SOURCE".to_string()),
            },
            PulseCliError::InteractiveStdin => CliError {
                code: "NO_INPUT".to_string(),
                message: "stdin is a terminal, nothing to read".to_string(),
                hint: Some("Pipe the export in, e.g. 'pulse report -i - < log.csv'".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct InspectReport {
    producer: String,
    version: String,
    headers: Vec<String>,
    parsed_rows: usize,
    usable_rows: usize,
    dropped_rows: usize,
    first_date: Option<String>,
    last_date: Option<String>,
}
