use crate::models::OptionType;

/// Domain-specific error types for the odds engine.
/// Pricing failures are fatal to the single computation that raised them:
/// - No volatility is ever defaulted or guessed
/// - The error carries enough context to correct the inputs and retry
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid inputs: {reason}")]
    InvalidInputs { reason: String },

    #[error(
        "no implied volatility in [{lower}, {upper}] for {option_type} priced {observed_price} \
         (spot={spot}, strike={strike}, T={time_to_expiry})"
    )]
    NoRootFound {
        option_type: OptionType,
        observed_price: f64,
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        lower: f64,
        upper: f64,
    },

    #[error("{option_type} solver did not converge after {iterations} iterations, last sigma: {last_sigma:.6}")]
    SolverExhausted {
        option_type: OptionType,
        iterations: u32,
        last_sigma: f64,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("market data error: {0}")]
    MarketData(String),

    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        EngineError::InvalidInputs {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_root_names_option_type_and_inputs() {
        let err = EngineError::NoRootFound {
            option_type: OptionType::Put,
            observed_price: 0.0,
            spot: 100.0,
            strike: 95.0,
            time_to_expiry: 0.1,
            lower: 1e-6,
            upper: 5.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("put"), "message should name the option type: {msg}");
        assert!(msg.contains("strike=95"), "message should carry the strike: {msg}");
    }

    #[test]
    fn test_invalid_helper() {
        let err = EngineError::invalid("spot price must be positive, got -1");
        assert!(matches!(err, EngineError::InvalidInputs { .. }));
        assert_eq!(err.to_string(), "invalid inputs: spot price must be positive, got -1");
    }
}
