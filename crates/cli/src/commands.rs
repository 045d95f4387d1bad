//! Subcommand implementations.

use std::path::PathBuf;

use chrono::{Datelike, Duration, NaiveDate};
use financial::{
    align_prices, build_returns, calibrate_prices, crossover_signal, rolling_bands, seeded_rng,
    simulate_path, us_business_days, CapmModel, Frequency, GbmSimulator, PathSimulator,
    PriceSeries, ReturnKind, RiskConfig, RiskModel, SimulationConfig,
};
use forecast::{
    FittedForecast, ForecastConfig, ForecastModel, HolidayCalendarBuilder, RegressionForecaster,
    SeasonalityMode,
};

use crate::io::{load_events, load_forecast_config, load_prices, write_json};
use crate::CliResult;

fn last_close(prices: &PriceSeries) -> CliResult<(NaiveDate, f64)> {
    prices
        .last()
        .map(|p| (p.date, p.price))
        .ok_or_else(|| "Price series is empty".to_string())
}

/// Run CAPM command
pub fn run_capm(
    asset: PathBuf,
    market: PathBuf,
    frequency: Frequency,
    kind: ReturnKind,
    risk_free_rate: Option<f64>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let (asset_prices, market_prices) =
        align_prices(&load_prices(&asset)?, &load_prices(&market)?).map_err(|e| e.to_string())?;

    let mut config = match frequency {
        Frequency::Daily => RiskConfig::daily(),
        Frequency::Monthly => RiskConfig::monthly(),
    }
    .with_observed_rate(risk_free_rate);
    config.return_kind = kind;
    let model = CapmModel::from_config(&config).map_err(|e| e.to_string())?;

    let asset_returns =
        build_returns(&asset_prices, config.frequency, config.return_kind).map_err(|e| e.to_string())?;
    let market_returns =
        build_returns(&market_prices, config.frequency, config.return_kind).map_err(|e| e.to_string())?;
    let estimate = model
        .estimate(&asset_returns, &market_returns)
        .map_err(|e| e.to_string())?;

    tracing::info!(
        beta = estimate.beta,
        expected_return = estimate.expected_return,
        observations = estimate.observations,
        "CAPM estimate"
    );
    write_json(&estimate, output.as_deref())
}

/// Run Bollinger bands command
pub fn run_bands(
    input: PathBuf,
    window: usize,
    num_std_dev: f64,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let prices = load_prices(&input)?;
    let frame = rolling_bands(&prices, window, num_std_dev).map_err(|e| e.to_string())?;
    write_json(&frame, output.as_deref())
}

/// Run crossover signals command
pub fn run_signals(
    input: PathBuf,
    short_window: usize,
    long_window: usize,
    events_only: bool,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let prices = load_prices(&input)?;
    let series = crossover_signal(&prices, short_window, long_window).map_err(|e| e.to_string())?;
    let events = series.events();
    tracing::info!(
        rows = series.len(),
        events = events.len(),
        latest = ?series.latest(),
        "crossover signals"
    );
    if events_only {
        write_json(&events, output.as_deref())
    } else {
        write_json(&series, output.as_deref())
    }
}

/// Run GBM path simulation command
pub fn run_simulate(
    input: PathBuf,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    seed: u64,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let prices = load_prices(&input)?;
    let calibration = calibrate_prices(&prices).map_err(|e| e.to_string())?;
    let (last_date, start_price) = last_close(&prices)?;

    let start = start.unwrap_or(last_date + Duration::days(1));
    let end = match end {
        Some(end) => end,
        None => NaiveDate::from_ymd_opt(start.year(), 12, 31)
            .ok_or_else(|| format!("No year end for {}", start))?,
    };
    let days = us_business_days(start, end).map_err(|e| e.to_string())?;
    let path = simulate_path(&calibration, start_price, &days, &mut seeded_rng(seed))
        .map_err(|e| e.to_string())?;

    tracing::info!(
        days = path.len(),
        start_price,
        terminal_price = ?path.terminal_price(),
        "simulated price path"
    );
    write_json(
        &serde_json::json!({
            "seed": seed,
            "calibration": calibration,
            "path": path,
        }),
        output.as_deref(),
    )
}

/// Run terminal distribution command
pub fn run_distribution(
    input: PathBuf,
    config: SimulationConfig,
    include_draws: bool,
    output: Option<PathBuf>,
) -> CliResult<()> {
    config.validate().map_err(|e| e.to_string())?;
    let prices = load_prices(&input)?;
    let (_, start_price) = last_close(&prices)?;
    let simulator = GbmSimulator::from_prices(&prices).map_err(|e| e.to_string())?;
    let distribution = simulator
        .terminal_distribution(
            start_price,
            config.simulations,
            config.horizon_steps,
            &mut seeded_rng(config.seed),
        )
        .map_err(|e| e.to_string())?;

    if include_draws {
        write_json(&distribution, output.as_deref())
    } else {
        write_json(
            &serde_json::json!({
                "seed": config.seed,
                "start_price": distribution.start_price,
                "simulations": distribution.simulations,
                "horizon_steps": distribution.horizon_steps,
                "mean_return": distribution.mean_return,
                "std_return": distribution.std_return,
                "percentile_5": distribution.percentile_5,
                "median": distribution.median,
                "percentile_95": distribution.percentile_95,
            }),
            output.as_deref(),
        )
    }
}

/// Forecast command options.
pub struct ForecastArgs {
    pub input: PathBuf,
    pub horizon_days: usize,
    pub config: Option<PathBuf>,
    pub seasonality_mode: Option<SeasonalityMode>,
    pub interval_width: Option<f64>,
    pub returns: Option<ReturnKind>,
    pub us_holidays: bool,
    pub market_calendar: bool,
    pub events: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Run forecast command
pub fn run_forecast(args: ForecastArgs) -> CliResult<()> {
    let history = load_prices(&args.input)?;
    let (last_date, _) = last_close(&history)?;
    let first_year = history
        .first()
        .map(|p| p.date.year())
        .unwrap_or(last_date.year());
    let last_year = (last_date + Duration::days(args.horizon_days as i64)).year();

    let mut config = match &args.config {
        Some(path) => load_forecast_config(path)?,
        None => ForecastConfig::default(),
    };
    if let Some(mode) = args.seasonality_mode {
        config.seasonality_mode = mode;
    }
    if let Some(width) = args.interval_width {
        config.interval_width = width;
    }

    let mut builder = HolidayCalendarBuilder::new().with_calendar(&config.holidays);
    if args.us_holidays {
        builder = builder
            .with_us_federal(first_year..=last_year)
            .map_err(|e| e.to_string())?;
    }
    if args.market_calendar {
        builder = builder
            .with_nyse_closures(first_year..=last_year)
            .map_err(|e| e.to_string())?
            .with_nyse_early_closes(first_year..=last_year)
            .map_err(|e| e.to_string())?;
    }
    if let Some(path) = &args.events {
        for entry in load_events(path)? {
            builder = builder.with_entry(entry);
        }
    }
    config.holidays = builder.build().map_err(|e| e.to_string())?;

    let model = RegressionForecaster::new(config).map_err(|e| e.to_string())?;
    let fitted = match args.returns {
        Some(kind) => {
            let returns =
                build_returns(&history, Frequency::Daily, kind).map_err(|e| e.to_string())?;
            model.fit_returns(&returns)
        }
        None => model.fit_prices(&history),
    }
    .map_err(|e| e.to_string())?;
    let result = fitted.predict(args.horizon_days).map_err(|e| e.to_string())?;

    if let Some(last) = result.rows.last() {
        tracing::info!(
            date = %last.date,
            yhat = last.yhat,
            lower = last.yhat_lower,
            upper = last.yhat_upper,
            "forecast horizon end"
        );
    }
    write_json(&result, args.output.as_deref())
}
