//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_trade_log_adapter::CsvTradeLogAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, DEFAULT_WARMUP_PERIOD};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::BacktestError;
use crate::domain::execution::{DEFAULT_CURRENCY, DEFAULT_RISK_FRACTION, ExecutionConfig};
use crate::domain::metrics::{DEFAULT_RISK_FREE_RATE, RunReport};
use crate::domain::sma_trend::SmaTrend;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::BarSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "barsim", about = "Historical bar-replay backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <SYMBOL>.csv files; overrides [data] dir
        #[arg(long)]
        data: Option<PathBuf>,
        /// JSON report path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// CSV trade log path
        #[arg(long)]
        trades: Option<PathBuf>,
    },
    /// Validate a configuration file without running
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            output,
            trades,
        } => run_backtest(&config, data.as_deref(), output.as_deref(), trades.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data } => run_list_symbols(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BacktestError> {
    FileConfigAdapter::from_file(path)
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, BacktestError> {
    let start_date = parse_date(
        config.get_string("backtest", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        config.get_string("backtest", "end_date").as_deref(),
        "end_date",
    )?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        interval: config.get_string_or("backtest", "interval", "1d"),
        initial_capital: config.get_double("backtest", "initial_capital", 100_000.0),
        risk_free_rate: config.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
        warmup_period: config.get_usize("backtest", "warmup_period", DEFAULT_WARMUP_PERIOD),
        execution: ExecutionConfig {
            currency: config.get_string_or("backtest", "currency", DEFAULT_CURRENCY),
            risk_fraction: config.get_double("backtest", "risk_fraction", DEFAULT_RISK_FRACTION),
            single_position_per_symbol: config.get_bool(
                "backtest",
                "single_position_per_symbol",
                true,
            ),
        },
    })
}

pub fn build_strategy(config: &dyn ConfigPort) -> Result<Box<dyn Strategy>, BacktestError> {
    let name = config.get_string_or("strategy", "name", "sma_trend");
    match name.as_str() {
        "sma_trend" => Ok(Box::new(SmaTrend::new(
            config.get_usize("strategy", "period", 10),
        ))),
        other => Err(BacktestError::ConfigInvalid {
            section: "strategy".into(),
            key: "name".into(),
            reason: format!("unknown strategy '{other}'"),
        }),
    }
}

fn resolve_data_dir(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, BacktestError> {
    if let Some(dir) = data_override {
        return Ok(dir.to_path_buf());
    }
    config
        .get_string("data", "dir")
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| BacktestError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    output_path: Option<&Path>,
    trades_path: Option<&Path>,
) -> Result<(), BacktestError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let strategy = build_strategy(&adapter)?;
    let symbol = adapter.get_string_or("backtest", "symbol", "");
    let source = CsvAdapter::new(resolve_data_dir(data_override, &adapter)?);

    let report = run_backtest_pipeline(&source, &symbol, strategy.as_ref(), &bt_config)?;
    print_summary(&report);

    let output = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("report.json"));
    JsonReportAdapter::new().write(&report, &output)?;
    eprintln!("\nReport written to: {}", output.display());

    if let Some(trades) = trades_path {
        CsvTradeLogAdapter::new().write(&report, trades)?;
        eprintln!("Trade log written to: {}", trades.display());
    }

    Ok(())
}

/// Fetch bars, replay them, and return the report. Persistence is left to
/// the caller.
pub fn run_backtest_pipeline(
    source: &dyn BarSource,
    symbol: &str,
    strategy: &dyn Strategy,
    bt_config: &BacktestConfig,
) -> Result<RunReport, BacktestError> {
    let series = source.fetch_bars(
        symbol,
        bt_config.start_date,
        bt_config.end_date,
        &bt_config.interval,
    )?;
    info!(
        "loaded {} {} bars for {} ({} to {})",
        series.len(),
        bt_config.interval,
        symbol,
        bt_config.start_date,
        bt_config.end_date
    );

    eprintln!(
        "Running backtest: {} with {}, {} bars",
        symbol,
        strategy.name(),
        series.len()
    );

    let run = backtest_engine::run_backtest(&series, strategy, bt_config)?;
    Ok(run.report)
}

pub fn print_summary(report: &RunReport) {
    eprintln!("\n=== Results: {} ({}) ===", report.symbol, report.interval);
    eprintln!("Period:           {} to {}", report.start_date, report.end_date);
    eprintln!("Total Trades:     {}", report.total_trades);
    eprintln!("Profitable:       {}", report.profitable_trades);
    eprintln!("Unprofitable:     {}", report.unprofitable_trades);
    eprintln!("Total Profit:     {:.2}", report.total_profit);
    match report.average_profit {
        Some(avg) => eprintln!("Average Profit:   {:.2}", avg),
        None => eprintln!("Average Profit:   n/a (no trades)"),
    }
    eprintln!("Max Drawdown:     -{:.2}%", report.max_drawdown);
    eprintln!("Risk Ratio:       {:.4}", report.risk_ratio);
    eprintln!("Final Cash:       {:.2}", report.final_cash);
    if report.skipped_bars > 0 || report.rejected_signals > 0 || report.ignored_sells > 0 {
        eprintln!(
            "Skipped bars: {}, rejected signals: {}, ignored sells: {}",
            report.skipped_bars, report.rejected_signals, report.ignored_sells
        );
    }
}

fn run_validate(config_path: &Path) -> Result<(), BacktestError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let strategy = build_strategy(&adapter)?;
    eprintln!("  symbol:        {}", adapter.get_string_or("backtest", "symbol", ""));
    eprintln!("  period:        {} to {}", bt_config.start_date, bt_config.end_date);
    eprintln!("  strategy:      {}", strategy.name());
    eprintln!("  warmup:        {} bars", bt_config.warmup_period);
    eprintln!("  risk fraction: {}", bt_config.execution.risk_fraction);
    eprintln!("\nConfiguration is valid");
    Ok(())
}

fn run_list_symbols(data_dir: &Path) -> Result<(), BacktestError> {
    let symbols = CsvAdapter::new(data_dir.to_path_buf()).list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir.display());
        return Ok(());
    }
    for symbol in &symbols {
        println!("{}", symbol);
    }
    eprintln!("{} symbols found", symbols.len());
    Ok(())
}
