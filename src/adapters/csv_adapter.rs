//! CSV file price adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row. Yahoo-style
//! exports (`Date,Open,High,Low,Close,Adj Close,Volume`) work as-is; any file
//! with a date column and an adjusted-close or close column is accepted.

use crate::domain::dates::parse_date;
use crate::domain::error::EvaluatorError;
use crate::domain::price::PriceBar;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const DATE_HEADERS: [&str; 2] = ["date", "timestamp"];
const ADJ_CLOSE_HEADERS: [&str; 3] = ["adj close", "adj_close", "adjclose"];
const CLOSE_HEADERS: [&str; 1] = ["close"];

/// Calendar part of a date or timestamp cell (`2016-11-14 00:00:00`, `2016-11-14T09:30:00Z`).
fn date_prefix(cell: &str) -> &str {
    cell.trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default()
}

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PriceBar>, EvaluatorError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| EvaluatorError::Database {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| EvaluatorError::Database {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();

        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        let date_col = find(&DATE_HEADERS[..]).ok_or_else(|| EvaluatorError::Database {
            reason: format!("missing date column in {}", path.display()),
        })?;
        let price_col = find(&ADJ_CLOSE_HEADERS[..])
            .or_else(|| find(&CLOSE_HEADERS[..]))
            .ok_or_else(|| EvaluatorError::Database {
                reason: format!("missing adjusted close column in {}", path.display()),
            })?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| EvaluatorError::Database {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).ok_or_else(|| EvaluatorError::Database {
                reason: "missing date value".into(),
            })?;
            let date = parse_date(date_prefix(date_str)).map_err(|e| EvaluatorError::Database {
                reason: format!("invalid date format: {}", e),
            })?;

            let adj_close: f64 = record
                .get(price_col)
                .ok_or_else(|| EvaluatorError::Database {
                    reason: "missing adjusted close value".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| EvaluatorError::Database {
                    reason: format!("invalid adjusted close value: {}", e),
                })?;

            bars.push(PriceBar {
                symbol: symbol.to_string(),
                date,
                adj_close,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl PricePort for CsvPriceAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, EvaluatorError> {
        let bars = self.read_all(symbol)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, EvaluatorError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| EvaluatorError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| EvaluatorError::Database {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EvaluatorError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let bars = self.read_all(symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
