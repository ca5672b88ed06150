//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report::HtmlReportAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::dates::parse_date;
use crate::domain::direction::{parse_predictions, Direction};
use crate::domain::error::EvaluatorError;
use crate::domain::evaluation::{
    evaluate, EvaluationConfig, EvaluationRequest, DEFAULT_BENCHMARK, DEFAULT_COMMISSION,
};
use crate::domain::metrics::TRADING_PERIODS_PER_YEAR;
use crate::domain::report::{display_optional, percent_or_na, EvaluationReport};
use crate::domain::simulation::{INITIAL_CAPITAL, SHORT_MARGIN};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_FREQUENCY: &str = "d";
pub const DEFAULT_CSV_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(
    name = "predeval",
    about = "Backtest next-interval up/down predictions against historical prices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a prediction sequence for one symbol
    Evaluate {
        #[arg(long)]
        symbol: String,
        /// YYYY-MM-DD or MM/DD/YYYY; falls back to [evaluation] start_date
        #[arg(long)]
        start: Option<String>,
        /// YYYY-MM-DD or MM/DD/YYYY; falls back to [evaluation] end_date
        #[arg(long)]
        end: Option<String>,
        /// File of 0/1 labels, or an inline list such as "1,0,0,1"
        #[arg(short, long)]
        predictions: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        benchmark: Option<String>,
        /// Report destination; `-` writes to stdout
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        format: Option<String>,
    },
    /// Show the stored data range for a symbol
    Info {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Evaluate {
            symbol,
            start,
            end,
            predictions,
            config,
            frequency,
            benchmark,
            output,
            format,
        } => run_evaluate(&EvaluateArgs {
            symbol,
            start,
            end,
            predictions,
            config,
            frequency,
            benchmark,
            output,
            format,
        }),
        Command::Info { symbol, config } => run_info(&symbol, config.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Flags of the `evaluate` subcommand.
#[derive(Debug, Clone, Default)]
pub struct EvaluateArgs {
    pub symbol: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub predictions: String,
    pub config: Option<PathBuf>,
    pub frequency: Option<String>,
    pub benchmark: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, EvaluatorError> {
    FileConfigAdapter::from_file(path).map_err(|e| EvaluatorError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load and validate the config file, or fall back to an empty one.
fn load_validated(path: Option<&Path>) -> Result<FileConfigAdapter, EvaluatorError> {
    let config = match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            load_config(p)?
        }
        None => FileConfigAdapter::from_string("").map_err(|reason| EvaluatorError::ConfigParse {
            file: "<defaults>".into(),
            reason,
        })?,
    };
    validate_config(&config)?;
    Ok(config)
}

pub fn build_evaluation_config(config: &dyn ConfigPort) -> Result<EvaluationConfig, EvaluatorError> {
    let benchmark_symbol = config
        .get_string("evaluation", "benchmark_symbol")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string());

    Ok(EvaluationConfig {
        initial_capital: config.get_double("evaluation", "initial_capital", INITIAL_CAPITAL),
        short_margin: config.get_double("evaluation", "short_margin", SHORT_MARGIN),
        commission_per_trade: config.get_double(
            "evaluation",
            "commission_per_trade",
            DEFAULT_COMMISSION,
        ),
        benchmark_symbol,
        periods_per_year: config.get_double(
            "evaluation",
            "periods_per_year",
            TRADING_PERIODS_PER_YEAR,
        ),
    })
}

/// Builds the price port named by `[data] source`.
pub fn open_price_port(config: &dyn ConfigPort) -> Result<Box<dyn PricePort>, EvaluatorError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();
    debug!(source = %source, "opening price source");

    match source.as_str() {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .unwrap_or_else(|| DEFAULT_CSV_DIR.to_string());
            Ok(Box::new(CsvPriceAdapter::new(PathBuf::from(dir))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use crate::adapters::sqlite_adapter::SqlitePriceAdapter;
            Ok(Box::new(SqlitePriceAdapter::from_config(config)?))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            use crate::adapters::postgres_adapter::PostgresPriceAdapter;
            Ok(Box::new(PostgresPriceAdapter::from_config(config)?))
        }
        other => Err(EvaluatorError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("source {other:?} is not available in this build"),
        }),
    }
}

/// `arg` is a path to a predictions file if one exists there, otherwise an
/// inline list of labels.
pub fn load_predictions(arg: &str) -> Result<Vec<Direction>, EvaluatorError> {
    let path = Path::new(arg);
    if path.is_file() {
        debug!(path = %path.display(), "reading predictions file");
        let content = fs::read_to_string(path)?;
        parse_predictions(&content)
    } else {
        parse_predictions(arg)
    }
}

fn resolve_date(
    flag: Option<&str>,
    config: &dyn ConfigPort,
    key: &str,
) -> Result<NaiveDate, EvaluatorError> {
    match flag {
        Some(raw) => parse_date(raw),
        None => config
            .get_date("evaluation", key)?
            .ok_or_else(|| EvaluatorError::ConfigMissing {
                section: "evaluation".into(),
                key: key.into(),
            }),
    }
}

pub fn build_request(
    args: &EvaluateArgs,
    config: &dyn ConfigPort,
) -> Result<EvaluationRequest, EvaluatorError> {
    let start_date = resolve_date(args.start.as_deref(), config, "start_date")?;
    let end_date = resolve_date(args.end.as_deref(), config, "end_date")?;
    if start_date > end_date {
        return Err(EvaluatorError::ConfigInvalid {
            section: "evaluation".into(),
            key: "start_date".into(),
            reason: format!("start {start_date} is after end {end_date}"),
        });
    }

    let frequency = args
        .frequency
        .clone()
        .or_else(|| config.get_string("evaluation", "frequency"))
        .unwrap_or_else(|| DEFAULT_FREQUENCY.to_string());

    Ok(EvaluationRequest {
        frequency,
        start_date,
        end_date,
        symbol: args.symbol.trim().to_string(),
        predicted_moves: load_predictions(&args.predictions)?,
    })
}

fn report_adapter(
    format: &str,
    config: &dyn ConfigPort,
) -> Result<Box<dyn ReportPort>, EvaluatorError> {
    match format.to_lowercase().as_str() {
        "json" => Ok(Box::new(JsonReportAdapter::new())),
        "html" => Ok(Box::new(HtmlReportAdapter::from_config(config)?)),
        other => Err(EvaluatorError::ConfigInvalid {
            section: "report".into(),
            key: "format".into(),
            reason: format!("unknown report format {other:?}"),
        }),
    }
}

fn print_summary(report: &EvaluationReport) {
    eprintln!("\n=== Evaluation: {} vs {} ===", report.ticker_symbol, report.benchmark_symbol);
    eprintln!(
        "Period:           {} to {} ({} intervals)",
        report.start_date,
        report.end_date,
        report.date_labels.len()
    );
    eprintln!("Success Rate:     {:.2}%", report.success_rate * 100.0);
    eprintln!("Inclusion Error:  {:.2}%", report.inclusion_error * 100.0);
    eprintln!("Exclusion Error:  {:.2}%", report.exclusion_error * 100.0);
    eprintln!("Cumulative:       {:.2}%", report.cummu_return);
    eprintln!("Average Return:   {}", percent_or_na(report.avg_return));
    eprintln!("Return Std Dev:   {}", display_optional(report.return_std));
    eprintln!("Sharpe Ratio:     {}", display_optional(report.sharpe_ratio));
    eprintln!("Buy and Hold:     {:.2}%", report.benchmark_return_self);
    eprintln!("Market:           {:.2}%", report.benchmark_return_market);
    eprintln!(
        "Trades:           {} (est. commission {:.2})",
        report.trade_count, report.estimated_commission
    );
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<(), EvaluatorError> {
    let config = load_validated(args.config.as_deref())?;

    let mut eval_config = build_evaluation_config(&config)?;
    if let Some(benchmark) = args.benchmark.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        eval_config.benchmark_symbol = benchmark.to_string();
    }

    let request = build_request(args, &config)?;
    let format = args
        .format
        .clone()
        .or_else(|| config.get_string("report", "format"))
        .unwrap_or_else(|| "json".to_string());
    let reporter = report_adapter(&format, &config)?;
    let output = args
        .output
        .clone()
        .or_else(|| config.get_string("report", "output"))
        .unwrap_or_else(|| "-".to_string());

    let port = open_price_port(&config)?;

    eprintln!(
        "Evaluating {} predictions for {} ({} to {})",
        request.predicted_moves.len(),
        request.symbol,
        request.start_date,
        request.end_date
    );
    let report = evaluate(port.as_ref(), &eval_config, &request)?;

    print_summary(&report);

    reporter.write(&report, &output)?;
    if output != "-" {
        eprintln!("\nReport written to: {output}");
    }
    info!(output = %output, format = %format, "report written");
    Ok(())
}

pub fn run_info(symbol: &str, config_path: Option<&Path>) -> Result<(), EvaluatorError> {
    let config = load_validated(config_path)?;
    let port = open_price_port(&config)?;

    match port.get_data_range(symbol)? {
        Some((first, last, count)) => {
            println!("{symbol}: {count} bars, {first} to {last}");
        }
        None => {
            eprintln!("{symbol}: no data found");
            let symbols = port.list_symbols()?;
            if !symbols.is_empty() {
                eprintln!("available: {}", symbols.join(", "));
            }
        }
    }
    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), EvaluatorError> {
    let config = load_validated(Some(config_path))?;
    let eval_config = build_evaluation_config(&config)?;

    eprintln!("\nEvaluation:");
    eprintln!("  initial_capital:      {:.2}", eval_config.initial_capital);
    eprintln!("  short_margin:         {}", eval_config.short_margin);
    eprintln!("  commission_per_trade: {:.2}", eval_config.commission_per_trade);
    eprintln!("  benchmark_symbol:     {}", eval_config.benchmark_symbol);
    eprintln!("  periods_per_year:     {}", eval_config.periods_per_year);
    eprintln!(
        "  data source:          {}",
        config
            .get_string("data", "source")
            .unwrap_or_else(|| "csv".to_string())
    );

    eprintln!("\nConfiguration is valid.");
    Ok(())
}
