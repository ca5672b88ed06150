//! PostgreSQL price adapter over `public.prices (symbol, date, adj_close)`.

use crate::domain::error::EvaluatorError;
use crate::domain::price::PriceBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use postgres::types::ToSql;
use postgres::{Client, NoTls};
use std::cell::RefCell;

pub struct PostgresPriceAdapter {
    client: RefCell<Client>,
}

fn query_error(e: postgres::Error) -> EvaluatorError {
    EvaluatorError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl PostgresPriceAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, EvaluatorError> {
        let connection_string = config
            .get_string("postgres", "connection_string")
            .ok_or_else(|| EvaluatorError::ConfigMissing {
                section: "postgres".into(),
                key: "connection_string".into(),
            })?;

        let client =
            Client::connect(&connection_string, NoTls).map_err(|e| EvaluatorError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client: RefCell::new(client),
        })
    }
}

impl PricePort for PostgresPriceAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, EvaluatorError> {
        let query = "SELECT date, adj_close::double precision \
                     FROM public.prices \
                     WHERE symbol = $1 AND date >= $2 AND date <= $3 \
                     ORDER BY date ASC";

        let params: &[&(dyn ToSql + Sync)] = &[&symbol, &start_date, &end_date];
        let rows = self
            .client
            .borrow_mut()
            .query(query, params)
            .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|row| PriceBar {
                symbol: symbol.to_string(),
                date: row.get(0),
                adj_close: row.get(1),
            })
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, EvaluatorError> {
        let rows = self
            .client
            .borrow_mut()
            .query("SELECT DISTINCT symbol FROM public.prices ORDER BY symbol", &[])
            .map_err(query_error)?;

        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, EvaluatorError> {
        let rows = self
            .client
            .borrow_mut()
            .query(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM public.prices WHERE symbol = $1",
                &[&symbol],
            )
            .map_err(query_error)?;

        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let min: Option<NaiveDate> = row.get(0);
        let max: Option<NaiveDate> = row.get(1);
        let count: i64 = row.get(2);

        match (min, max) {
            (Some(min), Some(max)) if count > 0 => Ok(Some((min, max, count as usize))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    #[test]
    fn from_config_missing_connection_string() {
        match PostgresPriceAdapter::from_config(&EmptyConfig) {
            Err(EvaluatorError::ConfigMissing { section, key }) => {
                assert_eq!(section, "postgres");
                assert_eq!(key, "connection_string");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }
}
