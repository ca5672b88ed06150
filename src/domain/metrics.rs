//! Prediction accuracy and strategy performance statistics.

use serde::Serialize;

use super::direction::Direction;
use super::error::EvaluatorError;
use super::simulation::PortfolioState;

pub const TRADING_PERIODS_PER_YEAR: f64 = 252.0;

/// Share of predictions that were right, false positives and missed upswings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRates {
    pub success_rate: f64,
    /// Predicted up, price did not rise.
    pub inclusion_error: f64,
    /// Predicted down, price rose.
    pub exclusion_error: f64,
    pub classified: usize,
}

#[derive(Default)]
struct Tally {
    success: usize,
    inclusion: usize,
    exclusion: usize,
}

impl ClassificationRates {
    pub fn classify(
        predicted: &[Direction],
        actual: &[Direction],
    ) -> Result<Self, EvaluatorError> {
        if predicted.len() != actual.len() {
            return Err(EvaluatorError::LengthMismatch {
                what: "predicted moves".into(),
                expected: actual.len(),
                actual: predicted.len(),
            });
        }

        let tally = predicted
            .iter()
            .zip(actual)
            .fold(Tally::default(), |mut t, pair| {
                match pair {
                    (Direction::Down, Direction::Up) => t.exclusion += 1,
                    (Direction::Up, Direction::Down) => t.inclusion += 1,
                    _ => t.success += 1,
                }
                t
            });

        let classified = tally.success + tally.inclusion + tally.exclusion;
        let rate = |count: usize| {
            if classified > 0 {
                count as f64 / classified as f64
            } else {
                0.0
            }
        };

        Ok(ClassificationRates {
            success_rate: rate(tally.success),
            inclusion_error: rate(tally.inclusion),
            exclusion_error: rate(tally.exclusion),
            classified,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

/// Label each interval by how the share count moved relative to the previous one.
pub fn trade_actions(states: &[PortfolioState]) -> Vec<TradeAction> {
    let Some(first) = states.first() else {
        return Vec::new();
    };

    let opening = if first.shares > 0.0 {
        TradeAction::Buy
    } else {
        TradeAction::Sell
    };

    std::iter::once(opening)
        .chain(states.windows(2).map(|w| {
            if w[1].shares > w[0].shares {
                TradeAction::Buy
            } else if w[1].shares < w[0].shares {
                TradeAction::Sell
            } else {
                TradeAction::Hold
            }
        }))
        .collect()
}

/// Number of intervals where the position changed.
pub fn trade_count(actions: &[TradeAction]) -> usize {
    actions.iter().filter(|&&a| a != TradeAction::Hold).count()
}

/// Percentage change between consecutive values, with a leading 0.
///
/// The return out of a zero value is undefined (`None`).
pub fn period_returns(values: &[f64]) -> Vec<Option<f64>> {
    if values.is_empty() {
        return Vec::new();
    }
    std::iter::once(Some(0.0))
        .chain(values.windows(2).map(|w| {
            if w[0] != 0.0 {
                Some((w[1] - w[0]) / w[0] * 100.0)
            } else {
                None
            }
        }))
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Summary return statistics of a portfolio-value trajectory, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStats {
    pub returns: Vec<Option<f64>>,
    /// `None` when there are no period returns or one of them is undefined.
    pub avg_return: Option<f64>,
    pub cummu_return: f64,
    /// `None` with fewer than two period returns or an undefined one.
    pub return_std: Option<f64>,
    /// `None` when the standard deviation is zero or undefined.
    pub sharpe_ratio: Option<f64>,
}

impl ReturnStats {
    pub fn compute(values: &[f64], periods_per_year: f64) -> Self {
        let returns = period_returns(values);
        let tail: Option<Vec<f64>> = returns.iter().skip(1).copied().collect();

        let avg_return = tail.as_deref().and_then(mean);

        let cummu_return = match (values.first(), values.last()) {
            (Some(&first), Some(&last)) if first != 0.0 => (last - first) / first * 100.0,
            _ => 0.0,
        };

        let return_std = tail.as_deref().and_then(sample_std);
        let sharpe_ratio = avg_return
            .zip(return_std.filter(|&std| std > 0.0))
            .map(|(avg, std)| avg / std * periods_per_year.sqrt())
            .filter(|s| s.is_finite());

        ReturnStats {
            returns,
            avg_return,
            cummu_return,
            return_std,
            sharpe_ratio,
        }
    }
}
