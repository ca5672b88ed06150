//! Standalone HTML report.
//!
//! Reads an HTML template (the built-in default or a custom file from
//! `[report] template_path`), resolves every `{{PLACEHOLDER}}` marker with
//! output from `chart_svg` and `tables`, and returns the finished page.

pub mod chart_svg;
pub mod tables;

use std::fs;

use crate::domain::dates::format_date;
use crate::domain::error::EvaluatorError;
use crate::domain::report::EvaluationReport;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

use chart_svg::{value_chart_svg, Series};
use tables::{escape_html, format_interval_table, format_summary_table};

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<style>
body { font-family: sans-serif; margin: 2em auto; max-width: 960px; color: #222; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ddd; padding: 4px 10px; text-align: right; }
th { background: #f5f5f5; text-align: left; }
.pos { color: #15803d; }
.neg { color: #b91c1c; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
<p>{{PERIOD}}</p>
<h2>Summary</h2>
{{SUMMARY_TABLE}}
<h2>Asset Values</h2>
{{VALUE_CHART_SVG}}
<h2>Per-Interval Ledger</h2>
{{INTERVAL_TABLE}}
</body>
</html>
"#;

const STRATEGY_COLOR: &str = "#2563eb";
const SELF_COLOR: &str = "#16a34a";
const MARKET_COLOR: &str = "#9333ea";

/// Resolve all placeholders in `template` for `report`.
pub fn resolve(template: &str, report: &EvaluationReport) -> String {
    let ticker = escape_html(&report.ticker_symbol);
    let benchmark = escape_html(&report.benchmark_symbol);

    let title = format!("Prediction Evaluation: {ticker}");
    let period = format!(
        "{} to {} ({} intervals, frequency {}), benchmark {}",
        format_date(report.start_date),
        format_date(report.end_date),
        report.date_labels.len(),
        escape_html(&report.frequency),
        benchmark
    );

    let self_label = format!("{ticker} buy and hold");
    let market_label = format!("{benchmark} buy and hold");
    let chart = value_chart_svg(
        &[
            Series {
                label: "Strategy",
                color: STRATEGY_COLOR,
                values: &report.total_asset_values,
            },
            Series {
                label: &self_label,
                color: SELF_COLOR,
                values: &report.benchmark_asset_values_self,
            },
            Series {
                label: &market_label,
                color: MARKET_COLOR,
                values: &report.benchmark_asset_values_market,
            },
        ],
        &report.date_labels,
    );
    let chart = if chart.is_empty() {
        "<p><em>No value data.</em></p>".to_string()
    } else {
        chart
    };

    template
        .replace("{{TITLE}}", &title)
        .replace("{{PERIOD}}", &period)
        .replace("{{SUMMARY_TABLE}}", &format_summary_table(report))
        .replace("{{VALUE_CHART_SVG}}", &chart)
        .replace("{{INTERVAL_TABLE}}", &format_interval_table(report))
}

#[derive(Debug, Default)]
pub struct HtmlReportAdapter {
    template: Option<String>,
}

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }

    /// Loads `[report] template_path` when set, otherwise uses the default page.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, EvaluatorError> {
        match config.get_string("report", "template_path") {
            Some(path) => {
                let template = fs::read_to_string(&path).map_err(|e| EvaluatorError::Report {
                    reason: format!("failed to read template {path}: {e}"),
                })?;
                Ok(Self::with_template(template))
            }
            None => Ok(Self::new()),
        }
    }
}

impl ReportPort for HtmlReportAdapter {
    fn render(&self, report: &EvaluationReport) -> Result<String, EvaluatorError> {
        let template = self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        Ok(resolve(template, report))
    }
}
