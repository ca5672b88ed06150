//! Domain error types.

/// Top-level error type for predeval.
#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient price data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("non-positive price {price} at index {index}")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("invalid prediction {value:?} at position {position} (expected 0 or 1)")]
    InvalidPrediction { position: usize, value: String },

    #[error("{symbol} and {benchmark} price series are not aligned: {reason}")]
    MisalignedSeries {
        symbol: String,
        benchmark: String,
        reason: String,
    },

    #[error("invalid date {input:?} (expected YYYY-MM-DD or MM/DD/YYYY)")]
    InvalidDate { input: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EvaluatorError> for std::process::ExitCode {
    fn from(err: &EvaluatorError) -> Self {
        let code: u8 = match err {
            EvaluatorError::Io(_) | EvaluatorError::Report { .. } => 1,
            EvaluatorError::ConfigParse { .. }
            | EvaluatorError::ConfigMissing { .. }
            | EvaluatorError::ConfigInvalid { .. } => 2,
            EvaluatorError::Database { .. } | EvaluatorError::DatabaseQuery { .. } => 3,
            EvaluatorError::LengthMismatch { .. }
            | EvaluatorError::NonPositivePrice { .. }
            | EvaluatorError::InvalidPrediction { .. }
            | EvaluatorError::MisalignedSeries { .. }
            | EvaluatorError::InvalidDate { .. } => 4,
            EvaluatorError::NoData { .. } | EvaluatorError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_symbol() {
        let err = EvaluatorError::InsufficientData {
            symbol: "IBM".into(),
            bars: 1,
            minimum: 3,
        };
        assert_eq!(
            err.to_string(),
            "insufficient price data for IBM: have 1 bars, need 3"
        );
    }

    #[test]
    fn invalid_prediction_message_quotes_value() {
        let err = EvaluatorError::InvalidPrediction {
            position: 2,
            value: "x".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid prediction \"x\" at position 2 (expected 0 or 1)"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EvaluatorError = io.into();
        assert!(matches!(err, EvaluatorError::Io(_)));
    }
}
