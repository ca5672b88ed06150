//! Historical price access port trait.

use crate::domain::error::EvaluatorError;
use crate::domain::price::PriceBar;
use chrono::NaiveDate;

pub trait PricePort {
    /// Adjusted closes for `symbol` in `[start_date, end_date]`, ascending by date.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, EvaluatorError>;

    fn list_symbols(&self) -> Result<Vec<String>, EvaluatorError>;

    /// First date, last date and bar count stored for `symbol`, if any.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EvaluatorError>;
}
