//! Configuration validation.
//!
//! Validates every config field before an evaluation runs.

use crate::domain::error::EvaluatorError;
use crate::ports::config_port::ConfigPort;

pub const DATA_SOURCES: [&str; 3] = ["csv", "sqlite", "postgres"];
pub const REPORT_FORMATS: [&str; 2] = ["json", "html"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    validate_initial_capital(config)?;
    validate_short_margin(config)?;
    validate_commission(config)?;
    validate_periods_per_year(config)?;
    validate_benchmark_symbol(config)?;
    validate_dates(config)?;
    validate_data_source(config)?;
    validate_pool_size(config)?;
    validate_report_format(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> EvaluatorError {
    EvaluatorError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    let value = config.get_double("evaluation", "initial_capital", 1000.0);
    if !(value > 0.0) || !value.is_finite() {
        return Err(invalid(
            "evaluation",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_short_margin(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    let value = config.get_double("evaluation", "short_margin", 0.5);
    if value <= 0.0 || value > 1.0 {
        return Err(invalid(
            "evaluation",
            "short_margin",
            "short_margin must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    let value = config.get_double("evaluation", "commission_per_trade", 0.0);
    if value < 0.0 {
        return Err(invalid(
            "evaluation",
            "commission_per_trade",
            "commission_per_trade must be non-negative",
        ));
    }
    Ok(())
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    let value = config.get_double("evaluation", "periods_per_year", 252.0);
    if value <= 0.0 {
        return Err(invalid(
            "evaluation",
            "periods_per_year",
            "periods_per_year must be positive",
        ));
    }
    Ok(())
}

fn validate_benchmark_symbol(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    if let Some(symbol) = config.get_string("evaluation", "benchmark_symbol") {
        if symbol.trim().is_empty() {
            return Err(invalid(
                "evaluation",
                "benchmark_symbol",
                "benchmark_symbol must not be empty",
            ));
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    let start = config.get_date("evaluation", "start_date")?;
    let end = config.get_date("evaluation", "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "evaluation",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());
    if !DATA_SOURCES.contains(&source.to_lowercase().as_str()) {
        return Err(invalid(
            "data",
            "source",
            "source must be one of csv, sqlite, postgres",
        ));
    }
    Ok(())
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    let value = config.get_int("sqlite", "pool_size", 4);
    if value < 1 || u32::try_from(value).is_err() {
        return Err(invalid("sqlite", "pool_size", "pool_size must be at least 1"));
    }
    Ok(())
}

fn validate_report_format(config: &dyn ConfigPort) -> Result<(), EvaluatorError> {
    if let Some(format) = config.get_string("report", "format") {
        if !REPORT_FORMATS.contains(&format.to_lowercase().as_str()) {
            return Err(invalid("report", "format", "format must be json or html"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid_key(content: &str, expected_key: &str) {
        match validate_config(&config(content)) {
            Err(EvaluatorError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            Err(other) => panic!("expected ConfigInvalid, got: {other}"),
            Ok(()) => panic!("expected {expected_key} to be rejected"),
        }
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_config(&config("")).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let content = r#"
[evaluation]
initial_capital = 1000
short_margin = 0.5
commission_per_trade = 5
periods_per_year = 252
benchmark_symbol = SPY
start_date = 2016-11-14
end_date = 11/18/2016

[data]
source = sqlite

[report]
format = HTML
"#;
        assert!(validate_config(&config(content)).is_ok());
    }

    #[test]
    fn rejects_non_positive_capital() {
        assert_invalid_key("[evaluation]\ninitial_capital = 0\n", "initial_capital");
    }

    #[test]
    fn rejects_margin_out_of_range() {
        assert_invalid_key("[evaluation]\nshort_margin = 1.5\n", "short_margin");
        assert_invalid_key("[evaluation]\nshort_margin = 0\n", "short_margin");
    }

    #[test]
    fn rejects_negative_commission() {
        assert_invalid_key(
            "[evaluation]\ncommission_per_trade = -1\n",
            "commission_per_trade",
        );
    }

    #[test]
    fn rejects_zero_periods() {
        assert_invalid_key("[evaluation]\nperiods_per_year = 0\n", "periods_per_year");
    }

    #[test]
    fn rejects_bad_date() {
        assert_invalid_key("[evaluation]\nstart_date = yesterday\n", "start_date");
    }

    #[test]
    fn rejects_reversed_dates() {
        assert_invalid_key(
            "[evaluation]\nstart_date = 2020-01-02\nend_date = 2020-01-01\n",
            "start_date",
        );
    }

    #[test]
    fn rejects_unknown_source() {
        assert_invalid_key("[data]\nsource = yahoo\n", "source");
    }

    #[test]
    fn rejects_zero_pool_size() {
        assert_invalid_key("[sqlite]\npool_size = 0\n", "pool_size");
        assert_invalid_key("[sqlite]\npool_size = -3\n", "pool_size");
    }

    #[test]
    fn rejects_non_finite_capital() {
        assert_invalid_key("[evaluation]\ninitial_capital = nan\n", "initial_capital");
        assert_invalid_key("[evaluation]\ninitial_capital = inf\n", "initial_capital");
    }

    #[test]
    fn rejects_unknown_format() {
        assert_invalid_key("[report]\nformat = pdf\n", "format");
    }
}
