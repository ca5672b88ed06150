//! Final evaluation report.

use chrono::NaiveDate;
use serde::Serialize;

use super::direction::Direction;
use super::metrics::TradeAction;

/// Immutable result of one evaluation. Every figure is rounded to two decimals.
///
/// `avg_return`, `return_std` and `sharpe_ratio` are `None` when undefined
/// (too few period returns, a return out of a zero value, or zero dispersion)
/// and serialize as `null`. So does an undefined entry of `returns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub ticker_symbol: String,
    pub success_rate: f64,
    pub inclusion_error: f64,
    pub exclusion_error: f64,
    pub avg_return: Option<f64>,
    pub cummu_return: f64,
    pub return_std: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub benchmark_return_self: f64,
    pub benchmark_return_market: f64,
    pub predicted_moves: Vec<Direction>,
    pub actual_moves: Vec<Direction>,
    pub returns: Vec<Option<f64>>,
    pub total_asset_values: Vec<f64>,
    pub benchmark_asset_values_self: Vec<f64>,
    pub benchmark_asset_values_market: Vec<f64>,
    pub cash_position: Vec<f64>,
    pub stock_shares_owned: Vec<f64>,
    pub buy_or_sell: Vec<TradeAction>,
    pub date_labels: Vec<NaiveDate>,
    #[serde(skip)]
    pub benchmark_symbol: String,
    #[serde(skip)]
    pub trade_count: usize,
    /// Flat per-trade commission times `trade_count`; not deducted from values.
    #[serde(skip)]
    pub estimated_commission: f64,
}

impl EvaluationReport {
    pub fn final_value(&self) -> Option<f64> {
        self.total_asset_values.last().copied()
    }
}

/// Render an optional figure for humans; undefined values print as `n/a`.
pub fn display_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Like [`display_optional`], with a percent sign on defined values.
pub fn percent_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "n/a".to_string(),
    }
}
