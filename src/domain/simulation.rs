//! Long/short position simulation driven by direction predictions.
//!
//! Each interval either holds, flips from short to long, or flips from long to
//! short. A bullish call deploys all cash into a long position; a bearish call
//! sells short using half the available cash as margin. Once the total asset
//! value reaches zero or below, the portfolio is frozen for the remainder of the
//! run.

use tracing::{debug, warn};

use super::direction::Direction;
use super::error::EvaluatorError;
use super::price::ensure_positive;

pub const INITIAL_CAPITAL: f64 = 1000.0;
pub const SHORT_MARGIN: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// Fraction of cash posted as margin when opening a short.
    pub short_margin: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_capital: INITIAL_CAPITAL,
            short_margin: SHORT_MARGIN,
        }
    }
}

/// Portfolio snapshot at the close of one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    /// Signed; negative is a short position.
    pub shares: f64,
    pub total_value: f64,
}

impl PortfolioState {
    fn valued(cash: f64, shares: f64, price: f64) -> Self {
        PortfolioState {
            cash,
            shares,
            total_value: cash + shares * price,
        }
    }
}

/// Put all cash into shares. Returns (cash, shares).
fn go_long(cash: f64, price: f64) -> (f64, f64) {
    (0.0, cash / price)
}

/// Short `cash * margin` worth of shares and add the sale proceeds to cash.
fn go_short(cash: f64, price: f64, margin: f64) -> (f64, f64) {
    let shares = -(cash * margin) / price;
    (cash + shares.abs() * price, shares)
}

/// Simulate the strategy over `prices` and `predictions`, one state per interval.
///
/// Fails fast on mismatched lengths or non-positive prices. Running out of
/// capital is not an error: the portfolio simply stops trading.
pub fn simulate(
    prices: &[f64],
    predictions: &[Direction],
    config: &SimulationConfig,
) -> Result<Vec<PortfolioState>, EvaluatorError> {
    if prices.len() != predictions.len() {
        return Err(EvaluatorError::LengthMismatch {
            what: "simulation prices".into(),
            expected: predictions.len(),
            actual: prices.len(),
        });
    }
    ensure_positive(prices)?;

    let mut states = Vec::with_capacity(prices.len());
    let (Some(&first_price), Some(&first_call)) = (prices.first(), predictions.first()) else {
        return Ok(states);
    };

    let (cash, shares) = match first_call {
        Direction::Up => go_long(config.initial_capital, first_price),
        Direction::Down => go_short(config.initial_capital, first_price, config.short_margin),
    };
    states.push(PortfolioState::valued(cash, shares, first_price));

    let mut frozen = states[0].total_value <= 0.0;

    for i in 1..prices.len() {
        let prev = states[i - 1];
        let price = prices[i];

        let (cash, shares) = if frozen {
            (prev.cash, prev.shares)
        } else {
            match (predictions[i - 1], predictions[i]) {
                (Direction::Up, Direction::Up) | (Direction::Down, Direction::Down) => {
                    (prev.cash, prev.shares)
                }
                (Direction::Down, Direction::Up) => {
                    let cash = prev.cash - prev.shares.abs() * price;
                    if cash > 0.0 {
                        go_long(cash, price)
                    } else {
                        (cash, 0.0)
                    }
                }
                (Direction::Up, Direction::Down) => {
                    let cash = prev.cash + prev.shares * price;
                    if cash > 0.0 {
                        go_short(cash, price, config.short_margin)
                    } else {
                        (cash, 0.0)
                    }
                }
            }
        };

        let state = PortfolioState::valued(cash, shares, price);
        if !frozen && state.total_value <= 0.0 {
            warn!(
                interval = i,
                total_value = state.total_value,
                "capital exhausted, freezing portfolio"
            );
            frozen = true;
        }
        states.push(state);
    }

    debug!(
        intervals = states.len(),
        final_value = states.last().map(|s| s.total_value),
        "simulation complete"
    );
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use Direction::{Down, Up};

    fn run(prices: &[f64], predictions: &[Direction]) -> Vec<PortfolioState> {
        simulate(prices, predictions, &SimulationConfig::default()).unwrap()
    }

    #[test]
    fn bullish_start_goes_fully_long() {
        let states = run(&[100.0], &[Up]);
        assert_relative_eq!(states[0].shares, 10.0);
        assert_relative_eq!(states[0].cash, 0.0);
        assert_relative_eq!(states[0].total_value, 1000.0);
    }

    #[test]
    fn bearish_start_shorts_half_the_cash() {
        let states = run(&[100.0], &[Down]);
        assert_relative_eq!(states[0].shares, -5.0);
        assert_relative_eq!(states[0].cash, 1500.0);
        assert_relative_eq!(states[0].total_value, 1000.0);
    }

    #[test]
    fn flip_sequence_matches_hand_computed_values() {
        let states = run(&[100.0, 110.0, 99.0, 99.0], &[Up, Down, Down, Up]);

        let shares: Vec<f64> = states.iter().map(|s| s.shares).collect();
        let cash: Vec<f64> = states.iter().map(|s| s.cash).collect();
        let values: Vec<f64> = states.iter().map(|s| s.total_value).collect();

        // long 10 @100; sell @110 -> 1100, short 5 -> cash 1650; hold; cover @99 -> 1155, long
        assert_relative_eq!(shares[0], 10.0);
        assert_relative_eq!(shares[1], -5.0, epsilon = 1e-9);
        assert_relative_eq!(shares[2], -5.0, epsilon = 1e-9);
        assert_relative_eq!(shares[3], 1155.0 / 99.0, epsilon = 1e-9);

        assert_relative_eq!(cash[0], 0.0);
        assert_relative_eq!(cash[1], 1650.0, epsilon = 1e-9);
        assert_relative_eq!(cash[2], 1650.0, epsilon = 1e-9);
        assert_relative_eq!(cash[3], 0.0);

        assert_relative_eq!(values[0], 1000.0);
        assert_relative_eq!(values[1], 1100.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 1155.0, epsilon = 1e-9);
        assert_relative_eq!(values[3], 1155.0, epsilon = 1e-9);
    }

    #[test]
    fn constant_predictions_only_trade_once() {
        let states = run(&[100.0, 105.0, 95.0, 120.0, 80.0], &[Up; 5]);
        for s in &states[1..] {
            assert_eq!(s.shares, states[0].shares);
            assert_eq!(s.cash, states[0].cash);
        }
        assert_relative_eq!(states[4].total_value, 800.0);
    }

    #[test]
    fn ruin_freezes_all_later_intervals() {
        // short 5 @100 with 1500 cash; value hits 0 at 300
        let states = run(&[100.0, 300.0, 400.0, 50.0, 20.0], &[Down, Down, Up, Down, Up]);

        assert_relative_eq!(states[1].total_value, 0.0);
        for s in &states[2..] {
            assert_eq!(s.cash, states[1].cash);
            assert_eq!(s.shares, states[1].shares);
        }
        assert_relative_eq!(states[2].total_value, -500.0);
        // value recovers above zero but trading stays frozen
        assert_relative_eq!(states[3].total_value, 1250.0);
        assert_eq!(states[4].shares, -5.0);
    }

    #[test]
    fn covering_short_without_cash_leaves_portfolio_flat() {
        let states = run(&[100.0, 300.0, 350.0], &[Down, Up, Down]);
        assert_relative_eq!(states[1].cash, 0.0);
        assert_relative_eq!(states[1].shares, 0.0);
        assert_relative_eq!(states[1].total_value, 0.0);
        // frozen after the value reached zero
        assert_eq!(states[2], states[1]);
    }

    #[test]
    fn custom_capital_and_margin() {
        let config = SimulationConfig {
            initial_capital: 2000.0,
            short_margin: 0.25,
        };
        let states = simulate(&[50.0], &[Down], &config).unwrap();
        assert_relative_eq!(states[0].shares, -10.0);
        assert_relative_eq!(states[0].cash, 2500.0);
    }

    #[test]
    fn empty_input_yields_no_states() {
        assert!(run(&[], &[]).is_empty());
    }

    #[test]
    fn mismatched_lengths_fail_fast() {
        let err = simulate(&[1.0, 2.0], &[Up], &SimulationConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            EvaluatorError::LengthMismatch { expected: 1, actual: 2, .. }
        ));
    }

    #[test]
    fn non_positive_price_fails_fast() {
        let err = simulate(&[1.0, -2.0], &[Up, Down], &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, EvaluatorError::NonPositivePrice { index: 1, .. }));
    }
}
