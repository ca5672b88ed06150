//! HTML tables for the evaluation report:
//! - summary of scalar metrics
//! - per-interval ledger (moves, action, positions, values)

use crate::domain::dates::format_date;
use crate::domain::direction::Direction;
use crate::domain::metrics::TradeAction;
use crate::domain::report::{display_optional, percent_or_na, EvaluationReport};

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn fmt_pct(value: f64) -> String {
    format!("{value:.2}%")
}

fn fmt_rate(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn fmt_opt<T: Copy>(value: Option<&T>, f: impl Fn(T) -> String) -> String {
    value.copied().map(f).unwrap_or_else(|| "-".to_string())
}

fn move_label(direction: Direction) -> String {
    match direction {
        Direction::Up => "up".to_string(),
        Direction::Down => "down".to_string(),
    }
}

fn action_label(action: TradeAction) -> String {
    match action {
        TradeAction::Buy => "Buy".to_string(),
        TradeAction::Sell => "Sell".to_string(),
        TradeAction::Hold => "Hold".to_string(),
    }
}

fn value_class(value: f64) -> &'static str {
    if value > 0.0 {
        "pos"
    } else if value < 0.0 {
        "neg"
    } else {
        ""
    }
}

pub fn format_summary_table(report: &EvaluationReport) -> String {
    let rows: Vec<(&str, String, &str)> = vec![
        ("Success Rate", fmt_rate(report.success_rate), ""),
        ("Inclusion Error", fmt_rate(report.inclusion_error), ""),
        ("Exclusion Error", fmt_rate(report.exclusion_error), ""),
        (
            "Cumulative Return",
            fmt_pct(report.cummu_return),
            value_class(report.cummu_return),
        ),
        (
            "Average Return",
            percent_or_na(report.avg_return),
            value_class(report.avg_return.unwrap_or(0.0)),
        ),
        ("Return Std Dev", percent_or_na(report.return_std), ""),
        ("Sharpe Ratio", display_optional(report.sharpe_ratio), ""),
        (
            "Buy and Hold Return",
            fmt_pct(report.benchmark_return_self),
            value_class(report.benchmark_return_self),
        ),
        (
            "Market Return",
            fmt_pct(report.benchmark_return_market),
            value_class(report.benchmark_return_market),
        ),
        ("Trades", report.trade_count.to_string(), ""),
        (
            "Est. Commission",
            format!("{:.2}", report.estimated_commission),
            "",
        ),
    ];

    let mut html = String::from("<table class=\"summary\">\n<tbody>\n");
    for (label, value, class) in rows {
        html.push_str(&format!(
            "<tr><th>{label}</th><td class=\"{class}\">{value}</td></tr>\n"
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// One row per price date. Columns that only exist for traded intervals
/// show `-` on the final date.
pub fn format_interval_table(report: &EvaluationReport) -> String {
    let mut html = String::from(
        "<table class=\"ledger\">\n<thead><tr>\
         <th>Date</th><th>Predicted</th><th>Actual</th><th>Action</th>\
         <th>Cash</th><th>Shares</th><th>Value</th><th>Return</th>\
         <th>Buy and Hold</th><th>Market</th></tr></thead>\n<tbody>\n",
    );

    for (i, date) in report.date_labels.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            format_date(*date),
            fmt_opt(report.predicted_moves.get(i), move_label),
            fmt_opt(report.actual_moves.get(i), move_label),
            fmt_opt(report.buy_or_sell.get(i), action_label),
            fmt_opt(report.cash_position.get(i), |v| format!("{v:.2}")),
            fmt_opt(report.stock_shares_owned.get(i), |v| format!("{v:.2}")),
            fmt_opt(report.total_asset_values.get(i), |v| format!("{v:.2}")),
            fmt_opt(report.returns.get(i), percent_or_na),
            fmt_opt(report.benchmark_asset_values_self.get(i), |v| format!("{v:.2}")),
            fmt_opt(report.benchmark_asset_values_market.get(i), |v| format!("{v:.2}")),
        ));
    }

    html.push_str("</tbody>\n</table>\n");
    html
}
