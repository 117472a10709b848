use anyhow::{Context, Result};
use backtester::Backtester;
use clap::{Args, Parser, Subcommand, ValueEnum};
use configuration::{Config, EmaCrossoverParams, RsiMeanReversionParams, StrategyParams};
use core_types::{Candle, TradeRecord};
use regime::RegimeAnalyzer;
use risk::RiskAnalyzer;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod output;

/// The main entry point for the Quantscope strategy analysis tool.
fn main() -> Result<()> {
    // Optional: QUANTSCOPE__* overrides may live in a .env file.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    init_tracing(&config.logging.level)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Backtest(args) => handle_backtest(args, &config),
        Commands::Compare(args) => handle_compare(args, &config),
        Commands::Regime(args) => handle_regime(args),
        Commands::Risk(args) => handle_risk(args, &config),
    }
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("Invalid log level '{default_level}'"))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")?;
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backtests rule-based trading strategies against historical candles.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single strategy and report performance and risk.
    Backtest(BacktestArgs),
    /// Run several strategy configurations on the same data and rank them.
    Compare(CompareArgs),
    /// Classify the market regime of a candle series.
    Regime(RegimeArgs),
    /// Analyze the risk profile of an externally produced trade list.
    Risk(RiskArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    Ema,
    Rsi,
}

#[derive(Args)]
struct BacktestArgs {
    /// JSON file holding an array of candles, oldest first.
    #[arg(long)]
    data: PathBuf,

    #[arg(long, value_enum, default_value_t = StrategyKind::Ema)]
    strategy: StrategyKind,

    /// Short EMA period (EMA strategy).
    #[arg(long)]
    short: Option<usize>,

    /// Long EMA period (EMA strategy).
    #[arg(long)]
    long: Option<usize>,

    /// RSI period (RSI strategy).
    #[arg(long)]
    period: Option<usize>,

    /// Oversold RSI level (RSI strategy).
    #[arg(long)]
    oversold: Option<Decimal>,

    /// Overbought RSI level (RSI strategy).
    #[arg(long)]
    overbought: Option<Decimal>,

    /// Starting capital; defaults to `backtest.initial_capital`.
    #[arg(long)]
    capital: Option<Decimal>,

    /// Print the full outcome, including every trade, as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompareArgs {
    #[arg(long)]
    data: PathBuf,

    /// JSON file holding an array of `{"strategy": ..., "parameters": {...}}` objects.
    /// Defaults to the two strategies as configured.
    #[arg(long)]
    strategies: Option<PathBuf>,

    #[arg(long)]
    capital: Option<Decimal>,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RegimeArgs {
    #[arg(long)]
    data: PathBuf,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RiskArgs {
    /// JSON file holding an array of trades, either full trade records or `{"return": x}` objects.
    #[arg(long)]
    trades: PathBuf,

    #[arg(long)]
    capital: Option<Decimal>,

    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_backtest(args: BacktestArgs, config: &Config) -> Result<()> {
    let candles: Vec<Candle> = read_json(&args.data)?;
    let capital = args.capital.unwrap_or(config.backtest.initial_capital);
    let params = backtest_params(&args, config);

    tracing::info!(strategy = %params.label(), candles = candles.len(), "Starting backtest");
    let outcome = Backtester::new().run(&candles, &params, capital)?;

    if args.json {
        return print_json(&outcome);
    }
    println!("{}", output::backtest_table(&outcome));
    Ok(())
}

/// Starts from the configured parameters and applies any command-line overrides.
fn backtest_params(args: &BacktestArgs, config: &Config) -> StrategyParams {
    match args.strategy {
        StrategyKind::Ema => {
            let defaults = &config.strategies.ema_crossover;
            StrategyParams::EmaCrossover(EmaCrossoverParams {
                short_period: args.short.unwrap_or(defaults.short_period),
                long_period: args.long.unwrap_or(defaults.long_period),
            })
        }
        StrategyKind::Rsi => {
            let defaults = &config.strategies.rsi_mean_reversion;
            StrategyParams::RsiMeanReversion(RsiMeanReversionParams {
                period: args.period.unwrap_or(defaults.period),
                oversold: args.oversold.unwrap_or(defaults.oversold),
                overbought: args.overbought.unwrap_or(defaults.overbought),
            })
        }
    }
}

fn handle_compare(args: CompareArgs, config: &Config) -> Result<()> {
    let candles: Vec<Candle> = read_json(&args.data)?;
    let capital = args.capital.unwrap_or(config.backtest.initial_capital);
    let candidates: Vec<StrategyParams> = match &args.strategies {
        Some(path) => read_json(path)?,
        None => vec![
            config.strategies.ema_crossover.clone().into(),
            config.strategies.rsi_mean_reversion.clone().into(),
        ],
    };

    let ranked = Backtester::new().compare(&candles, &candidates, capital)?;

    if args.json {
        return print_json(&ranked);
    }
    println!("{}", output::comparison_table(&ranked));
    println!("Best strategy: {}", ranked.best_strategy);
    Ok(())
}

fn handle_regime(args: RegimeArgs) -> Result<()> {
    let candles: Vec<Candle> = read_json(&args.data)?;
    let report = RegimeAnalyzer::new().analyze(&candles)?;

    if args.json {
        return print_json(&report);
    }
    println!("{}", output::regime_table(&report));
    Ok(())
}

fn handle_risk(args: RiskArgs, config: &Config) -> Result<()> {
    let records: Vec<TradeRecord> = read_json(&args.trades)?;
    let capital = args.capital.unwrap_or(config.backtest.initial_capital);
    let report = RiskAnalyzer::new().analyze_records(&records, capital)?;

    if args.json {
        return print_json(&report);
    }
    println!("{}", output::risk_table(&report));
    Ok(())
}

// ==============================================================================
// I/O Helpers
// ==============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
