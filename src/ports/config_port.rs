//! Configuration access port trait.

use crate::domain::dates::parse_date;
use crate::domain::error::EvaluatorError;
use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Optional date value; present but unparseable is an error.
    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, EvaluatorError> {
        match self.get_string(section, key) {
            Some(raw) => parse_date(&raw).map(Some).map_err(|_| EvaluatorError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid date {raw:?}"),
            }),
            None => Ok(None),
        }
    }
}
