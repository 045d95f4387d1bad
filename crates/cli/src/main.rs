//! Equity analysis CLI
//!
//! Command-line interface for CAPM risk estimation, technical indicators,
//! GBM Monte Carlo simulation and regression forecasting over CSV price files.

mod commands;
mod io;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use financial::{Frequency, ReturnKind, SimulationConfig};
use forecast::SeasonalityMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::ForecastArgs;

pub(crate) type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "equity")]
#[command(author, version, about = "Equity analysis toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate CAPM beta and expected return of an asset against a market index
    Capm {
        /// Asset price CSV (date, close)
        #[arg(short, long)]
        asset: PathBuf,

        /// Market index price CSV (date, close)
        #[arg(short, long)]
        market: PathBuf,

        /// Return frequency: daily or monthly
        #[arg(short, long, default_value = "monthly")]
        frequency: Frequency,

        /// Return kind: simple or log
        #[arg(short, long, default_value = "simple")]
        kind: ReturnKind,

        /// Annual risk-free rate as a fraction; falls back to the default when unset
        #[arg(long, env = "RISK_FREE_RATE")]
        risk_free_rate: Option<f64>,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute Bollinger bands
    Bands {
        /// Price CSV (date, close)
        #[arg(short, long)]
        input: PathBuf,

        /// Rolling window length
        #[arg(short, long, default_value = "30")]
        window: usize,

        /// Band width in standard deviations
        #[arg(short, long, default_value = "2.0")]
        num_std: f64,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SMA/EMA crossover signals
    Signals {
        /// Price CSV (date, close)
        #[arg(short, long)]
        input: PathBuf,

        /// Short SMA window
        #[arg(short, long, default_value = "30")]
        short: usize,

        /// Long EMA span
        #[arg(short, long, default_value = "90")]
        long: usize,

        /// Only emit buy/sell events
        #[arg(long)]
        events_only: bool,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate one GBM price path over US business days
    Simulate {
        /// Price CSV (date, close) used for calibration
        #[arg(short, long)]
        input: PathBuf,

        /// First simulated date (defaults to the day after the last close)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last simulated date (defaults to the end of the start year)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate the GBM terminal return distribution
    Distribution {
        /// Price CSV (date, close) used for calibration
        #[arg(short, long)]
        input: PathBuf,

        /// Number of simulated draws
        #[arg(short = 'n', long, default_value = "10000")]
        simulations: usize,

        /// Periods between start and terminal price
        #[arg(long, default_value = "1")]
        horizon: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Include every simulated return in the output
        #[arg(long)]
        include_draws: bool,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit the regression forecast model and predict
    Forecast {
        /// Price CSV (date, close)
        #[arg(short, long)]
        input: PathBuf,

        /// Forecast horizon in calendar days
        #[arg(long, default_value = "365")]
        horizon: usize,

        /// Forecast configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seasonality mode override: additive or multiplicative
        #[arg(short, long)]
        mode: Option<SeasonalityMode>,

        /// Uncertainty interval width override
        #[arg(long)]
        interval_width: Option<f64>,

        /// Forecast daily returns of this kind (simple or log) instead of prices
        #[arg(short, long)]
        returns: Option<ReturnKind>,

        /// Add US federal holidays
        #[arg(long)]
        us_holidays: bool,

        /// Add NYSE closures and early-close sessions
        #[arg(long)]
        market_calendar: bool,

        /// Event CSV (date, label, lower_window, upper_window, prior_scale)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "equity=info,financial_core=info,forecast_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Capm {
            asset,
            market,
            frequency,
            kind,
            risk_free_rate,
            output,
        } => commands::run_capm(asset, market, frequency, kind, risk_free_rate, output),
        Commands::Bands {
            input,
            window,
            num_std,
            output,
        } => commands::run_bands(input, window, num_std, output),
        Commands::Signals {
            input,
            short,
            long,
            events_only,
            output,
        } => commands::run_signals(input, short, long, events_only, output),
        Commands::Simulate {
            input,
            start,
            end,
            seed,
            output,
        } => commands::run_simulate(input, start, end, seed, output),
        Commands::Distribution {
            input,
            simulations,
            horizon,
            seed,
            include_draws,
            output,
        } => commands::run_distribution(
            input,
            SimulationConfig {
                seed,
                simulations,
                horizon_steps: horizon,
            },
            include_draws,
            output,
        ),
        Commands::Forecast {
            input,
            horizon,
            config,
            mode,
            interval_width,
            returns,
            us_holidays,
            market_calendar,
            events,
            output,
        } => commands::run_forecast(ForecastArgs {
            input,
            horizon_days: horizon,
            config,
            seasonality_mode: mode,
            interval_width,
            returns,
            us_holidays,
            market_calendar,
            events,
            output,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
