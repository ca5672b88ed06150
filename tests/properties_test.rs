//! Property tests for the simulator, classification and rounding.

use predeval::domain::direction::Direction;
use predeval::domain::metrics::{ClassificationRates, ReturnStats};
use predeval::domain::price::realized_moves;
use predeval::domain::rounding::{round_scalar, round_series};
use predeval::domain::simulation::{simulate, SimulationConfig};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Down), Just(Direction::Up)]
}

/// Prices and one prediction per price.
fn run_inputs() -> impl Strategy<Value = (Vec<f64>, Vec<Direction>)> {
    (1usize..40).prop_flat_map(|n| {
        (
            prop::collection::vec(0.5f64..1000.0, n),
            prop::collection::vec(direction(), n),
        )
    })
}

proptest! {
    #[test]
    fn one_state_per_prediction((prices, predictions) in run_inputs()) {
        let states = simulate(&prices, &predictions, &SimulationConfig::default()).unwrap();
        prop_assert_eq!(states.len(), predictions.len());
    }

    #[test]
    fn exhausted_portfolio_stays_frozen((prices, predictions) in run_inputs()) {
        let states = simulate(&prices, &predictions, &SimulationConfig::default()).unwrap();
        if let Some(k) = states.iter().position(|s| s.total_value <= 0.0) {
            for later in &states[k + 1..] {
                prop_assert_eq!(later.cash, states[k].cash);
                prop_assert_eq!(later.shares, states[k].shares);
            }
        }
    }

    #[test]
    fn unchanged_call_keeps_position((prices, predictions) in run_inputs()) {
        let states = simulate(&prices, &predictions, &SimulationConfig::default()).unwrap();
        for i in 1..states.len() {
            if predictions[i] == predictions[i - 1] {
                prop_assert_eq!(states[i].shares, states[i - 1].shares);
                prop_assert_eq!(states[i].cash, states[i - 1].cash);
            }
        }
    }

    #[test]
    fn rates_sum_to_one(
        pairs in prop::collection::vec((direction(), direction()), 1..60)
    ) {
        let (predicted, actual): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let r = ClassificationRates::classify(&predicted, &actual).unwrap();
        let total = r.success_rate + r.inclusion_error + r.exclusion_error;
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn realized_moves_are_one_shorter(prices in prop::collection::vec(0.5f64..1000.0, 1..50)) {
        prop_assert_eq!(realized_moves(&prices).len(), prices.len() - 1);
    }

    #[test]
    fn rounding_is_idempotent(x in -1.0e6f64..1.0e6) {
        let once = round_scalar(x);
        prop_assert_eq!(round_scalar(once), once);
    }

    #[test]
    fn series_rounding_is_elementwise_idempotent(
        xs in prop::collection::vec(-1.0e6f64..1.0e6, 0..30)
    ) {
        let once = round_series(&xs);
        prop_assert_eq!(once.len(), xs.len());
        prop_assert_eq!(round_series(&once), once);
    }

    #[test]
    fn cumulative_return_tracks_endpoints(
        values in prop::collection::vec(1.0f64..10_000.0, 2..30)
    ) {
        let stats = ReturnStats::compute(&values, 252.0);
        let first = values[0];
        let last = values[values.len() - 1];
        prop_assert!((stats.cummu_return - (last - first) / first * 100.0).abs() < 1e-9);
        prop_assert_eq!(stats.returns.len(), values.len());
        prop_assert!(stats.returns.iter().all(Option::is_some));
        prop_assert!(stats.avg_return.is_some());
    }
}
