//! Evaluation pipeline: fetch prices, simulate, score, assemble the report.
//!
//! EvaluationConfig carries the tunable simulation and scoring parameters.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::direction::Direction;
use super::error::EvaluatorError;
use super::metrics::{
    trade_actions, trade_count, ClassificationRates, ReturnStats, TRADING_PERIODS_PER_YEAR,
};
use super::price::{
    buy_and_hold_return, buy_and_hold_values, closes, ensure_positive, realized_moves, PriceBar,
};
use super::report::EvaluationReport;
use super::rounding::{round_optional, round_optional_series, round_scalar, round_series};
use super::simulation::{simulate, SimulationConfig, INITIAL_CAPITAL, SHORT_MARGIN};
use crate::ports::price_port::PricePort;

/// Fewest price bars that still yield one period return.
pub const MIN_PRICE_BARS: usize = 3;

pub const DEFAULT_BENCHMARK: &str = "SPY";
pub const DEFAULT_COMMISSION: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub initial_capital: f64,
    pub short_margin: f64,
    pub commission_per_trade: f64,
    pub benchmark_symbol: String,
    pub periods_per_year: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            initial_capital: INITIAL_CAPITAL,
            short_margin: SHORT_MARGIN,
            commission_per_trade: DEFAULT_COMMISSION,
            benchmark_symbol: DEFAULT_BENCHMARK.to_string(),
            periods_per_year: TRADING_PERIODS_PER_YEAR,
        }
    }
}

impl EvaluationConfig {
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            initial_capital: self.initial_capital,
            short_margin: self.short_margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    /// Opaque interval label ("d", "h", "m"), echoed into the report.
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub symbol: String,
    /// One call per price interval except the last.
    pub predicted_moves: Vec<Direction>,
}

fn fetch_series(
    port: &dyn PricePort,
    symbol: &str,
    request: &EvaluationRequest,
) -> Result<Vec<PriceBar>, EvaluatorError> {
    let bars = port.fetch_prices(symbol, request.start_date, request.end_date)?;
    debug!(symbol, bars = bars.len(), "fetched price series");

    if bars.is_empty() {
        return Err(EvaluatorError::NoData {
            symbol: symbol.to_string(),
        });
    }
    if bars.len() < MIN_PRICE_BARS {
        return Err(EvaluatorError::InsufficientData {
            symbol: symbol.to_string(),
            bars: bars.len(),
            minimum: MIN_PRICE_BARS,
        });
    }
    ensure_positive(&closes(&bars))?;
    Ok(bars)
}

/// Both series must cover exactly the same trading dates.
fn check_alignment(
    market: &[PriceBar],
    target: &[PriceBar],
    benchmark: &str,
    symbol: &str,
) -> Result<(), EvaluatorError> {
    let misaligned = |reason: String| EvaluatorError::MisalignedSeries {
        symbol: symbol.to_string(),
        benchmark: benchmark.to_string(),
        reason,
    };

    if market.len() != target.len() {
        return Err(misaligned(format!(
            "{} bars vs {} bars",
            target.len(),
            market.len()
        )));
    }
    if let Some((m, t)) = market.iter().zip(target).find(|(m, t)| m.date != t.date) {
        return Err(misaligned(format!("{} vs {}", t.date, m.date)));
    }
    Ok(())
}

/// Run one evaluation. Either the whole report is produced or an error is returned.
pub fn evaluate(
    port: &dyn PricePort,
    config: &EvaluationConfig,
    request: &EvaluationRequest,
) -> Result<EvaluationReport, EvaluatorError> {
    info!(
        symbol = %request.symbol,
        benchmark = %config.benchmark_symbol,
        start = %request.start_date,
        end = %request.end_date,
        predictions = request.predicted_moves.len(),
        "starting evaluation"
    );

    let market = fetch_series(port, &config.benchmark_symbol, request)?;
    let market_prices = closes(&market);
    let benchmark_return_market = buy_and_hold_return(&market_prices);

    let target = fetch_series(port, &request.symbol, request)?;
    check_alignment(&market, &target, &config.benchmark_symbol, &request.symbol)?;
    let prices = closes(&target);
    let benchmark_return_self = buy_and_hold_return(&prices);

    let actual_moves = realized_moves(&prices);
    let values_self = buy_and_hold_values(&prices, config.initial_capital);
    let values_market = buy_and_hold_values(&market_prices, config.initial_capital);

    let rates = ClassificationRates::classify(&request.predicted_moves, &actual_moves)?;

    let traded_prices = &prices[..request.predicted_moves.len()];
    let states = simulate(traded_prices, &request.predicted_moves, &config.simulation())?;

    let total_values: Vec<f64> = states.iter().map(|s| s.total_value).collect();
    let cash: Vec<f64> = states.iter().map(|s| s.cash).collect();
    let shares: Vec<f64> = states.iter().map(|s| s.shares).collect();

    let stats = ReturnStats::compute(&total_values, config.periods_per_year);
    let actions = trade_actions(&states);
    let trades = trade_count(&actions);

    info!(
        symbol = %request.symbol,
        success_rate = rates.success_rate,
        cummu_return = stats.cummu_return,
        trades,
        "evaluation complete"
    );

    Ok(EvaluationReport {
        frequency: request.frequency.clone(),
        start_date: request.start_date,
        end_date: request.end_date,
        ticker_symbol: request.symbol.clone(),
        success_rate: round_scalar(rates.success_rate),
        inclusion_error: round_scalar(rates.inclusion_error),
        exclusion_error: round_scalar(rates.exclusion_error),
        avg_return: round_optional(stats.avg_return),
        cummu_return: round_scalar(stats.cummu_return),
        return_std: round_optional(stats.return_std),
        sharpe_ratio: round_optional(stats.sharpe_ratio),
        benchmark_return_self: round_scalar(benchmark_return_self),
        benchmark_return_market: round_scalar(benchmark_return_market),
        predicted_moves: request.predicted_moves.clone(),
        actual_moves,
        returns: round_optional_series(&stats.returns),
        total_asset_values: round_series(&total_values),
        benchmark_asset_values_self: round_series(&values_self),
        benchmark_asset_values_market: round_series(&values_market),
        cash_position: round_series(&cash),
        stock_shares_owned: round_series(&shares),
        buy_or_sell: actions,
        date_labels: market.iter().map(|b| b.date).collect(),
        benchmark_symbol: config.benchmark_symbol.clone(),
        trade_count: trades,
        estimated_commission: round_scalar(trades as f64 * config.commission_per_trade),
    })
}
