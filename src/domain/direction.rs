//! Binary next-interval price direction labels.

use serde::{Serialize, Serializer};

use super::error::EvaluatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    pub fn from_label(label: u8, position: usize) -> Result<Self, EvaluatorError> {
        match label {
            0 => Ok(Direction::Down),
            1 => Ok(Direction::Up),
            other => Err(EvaluatorError::InvalidPrediction {
                position,
                value: other.to_string(),
            }),
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Direction::Down => 0,
            Direction::Up => 1,
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.label())
    }
}

/// Convert raw 0/1 labels, failing on the first value outside {0, 1}.
pub fn from_labels(labels: &[u8]) -> Result<Vec<Direction>, EvaluatorError> {
    labels
        .iter()
        .enumerate()
        .map(|(i, &l)| Direction::from_label(l, i))
        .collect()
}

/// Parse `0`/`1` tokens separated by commas and/or whitespace.
pub fn parse_predictions(input: &str) -> Result<Vec<Direction>, EvaluatorError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(position, token)| match token {
            "0" => Ok(Direction::Down),
            "1" => Ok(Direction::Up),
            other => Err(EvaluatorError::InvalidPrediction {
                position,
                value: other.to_string(),
            }),
        })
        .collect()
}
