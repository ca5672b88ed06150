//! Adjusted-close price records and series checks.

use chrono::NaiveDate;

use super::direction::Direction;
use super::error::EvaluatorError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub adj_close: f64,
}

/// Extract the adjusted closes of a date-ascending series.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.adj_close).collect()
}

/// Reject the first price that is not a finite, strictly positive number.
pub fn ensure_positive(prices: &[f64]) -> Result<(), EvaluatorError> {
    match prices.iter().position(|&p| !(p > 0.0) || !p.is_finite()) {
        Some(index) => Err(EvaluatorError::NonPositivePrice {
            index,
            price: prices[index],
        }),
        None => Ok(()),
    }
}

/// Up if the price rose from interval i to i+1. An unchanged price counts as down.
pub fn realized_moves(prices: &[f64]) -> Vec<Direction> {
    prices
        .windows(2)
        .map(|w| {
            if w[1] / w[0] - 1.0 > 0.0 {
                Direction::Up
            } else {
                Direction::Down
            }
        })
        .collect()
}

/// (last - first) / first * 100 over a raw price series.
pub fn buy_and_hold_return(prices: &[f64]) -> f64 {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

/// Asset value of buying `initial_capital` worth at the first price and holding.
pub fn buy_and_hold_values(prices: &[f64], initial_capital: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return values;
    }
    values.push(initial_capital);
    for w in prices.windows(2) {
        let prev = values[values.len() - 1];
        values.push(prev * w[1] / w[0]);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn realized_moves_flat_is_down() {
        let moves = realized_moves(&[100.0, 110.0, 99.0, 99.0, 108.0]);
        let labels: Vec<u8> = moves.iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec![1, 0, 0, 1]);
    }

    #[test]
    fn realized_moves_single_price_is_empty() {
        assert!(realized_moves(&[100.0]).is_empty());
    }

    #[test]
    fn buy_and_hold_return_percent() {
        assert_relative_eq!(buy_and_hold_return(&[100.0, 90.0, 108.0]), 8.0);
        assert_relative_eq!(buy_and_hold_return(&[]), 0.0);
    }

    #[test]
    fn buy_and_hold_values_track_price_ratio() {
        let values = buy_and_hold_values(&[100.0, 110.0, 99.0], 1000.0);
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[0], 1000.0);
        assert_relative_eq!(values[1], 1100.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 990.0, epsilon = 1e-9);
    }

    #[test]
    fn ensure_positive_reports_index() {
        let err = ensure_positive(&[1.0, 2.0, 0.0, -1.0]).unwrap_err();
        match err {
            EvaluatorError::NonPositivePrice { index, price } => {
                assert_eq!(index, 2);
                assert_eq!(price, 0.0);
            }
            other => panic!("expected NonPositivePrice, got: {other}"),
        }
    }

    #[test]
    fn ensure_positive_rejects_nan() {
        assert!(ensure_positive(&[1.0, f64::NAN]).is_err());
        assert!(ensure_positive(&[f64::INFINITY, 1.0]).is_err());
        assert!(ensure_positive(&[1.0, 2.5]).is_ok());
    }

    #[test]
    fn closes_preserves_order() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = vec![
            PriceBar { symbol: "IBM".into(), date: d, adj_close: 1.5 },
            PriceBar { symbol: "IBM".into(), date: d.succ_opt().unwrap(), adj_close: 2.5 },
        ];
        assert_eq!(closes(&bars), vec![1.5, 2.5]);
    }
}
