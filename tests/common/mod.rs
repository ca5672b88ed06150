#![allow(dead_code)]

use chrono::NaiveDate;
use predeval::domain::direction::{from_labels, Direction};
use predeval::domain::error::EvaluatorError;
pub use predeval::domain::price::PriceBar;
use predeval::domain::evaluation::EvaluationRequest;
use predeval::ports::price_port::PricePort;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory price port. Records every symbol it was asked for.
pub struct MockPricePort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub fetched: RefCell<Vec<String>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetched: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    /// Closes on consecutive days starting at 2016-11-14.
    pub fn with_closes(self, symbol: &str, closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                symbol: symbol.to_string(),
                date: day(i),
                adj_close: c,
            })
            .collect();
        self.with_bars(symbol, bars)
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, EvaluatorError> {
        self.fetched.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(EvaluatorError::Database {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, EvaluatorError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EvaluatorError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `i` days after 2016-11-14.
pub fn day(i: usize) -> NaiveDate {
    date(2016, 11, 14) + chrono::Days::new(i as u64)
}

pub fn make_bar(symbol: &str, date: &str, adj_close: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        adj_close,
    }
}

pub fn moves(labels: &[u8]) -> Vec<Direction> {
    from_labels(labels).unwrap()
}

/// Request covering `days` consecutive days from 2016-11-14.
pub fn request(symbol: &str, days: usize, labels: &[u8]) -> EvaluationRequest {
    EvaluationRequest {
        frequency: "d".to_string(),
        start_date: day(0),
        end_date: day(days.saturating_sub(1)),
        symbol: symbol.to_string(),
        predicted_moves: moves(labels),
    }
}
