//! Calendar date parsing for evaluation ranges.

use chrono::NaiveDate;

use super::error::EvaluatorError;

const ACCEPTED_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

pub fn parse_date(input: &str) -> Result<NaiveDate, EvaluatorError> {
    let trimmed = input.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| EvaluatorError::InvalidDate {
            input: input.to_string(),
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
