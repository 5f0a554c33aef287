pub mod time;
pub mod black_scholes;
pub mod implied_vol;
pub mod probability;

use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Single-letter code used in option contract symbols.
    #[inline]
    pub fn code(&self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Everything about a European contract except its volatility.
/// Stack-allocated, Copy. Volatility is passed separately so the solver
/// can vary it without rebuilding the contract.
#[derive(Debug, Clone, Copy)]
pub struct ContractParams {
    pub spot: f64,
    pub strike: f64,
    pub ttl_years: f64,
    pub rate: f64,
    pub dividend_yield: f64,
    pub option_type: OptionType,
}

impl ContractParams {
    pub fn call(spot: f64, strike: f64, ttl_years: f64, rate: f64) -> Self {
        Self {
            spot,
            strike,
            ttl_years,
            rate,
            dividend_yield: 0.0,
            option_type: OptionType::Call,
        }
    }

    pub fn put(spot: f64, strike: f64, ttl_years: f64, rate: f64) -> Self {
        Self {
            option_type: OptionType::Put,
            ..Self::call(spot, strike, ttl_years, rate)
        }
    }

    #[must_use]
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Spot and strike must be positive and finite, time strictly positive,
    /// rates finite. Everything downstream divides by `sqrt(T)` and takes `ln(S/K)`.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.spot > 0.0 && self.spot.is_finite()) {
            return Err(EngineError::invalid(format!(
                "spot price must be positive, got {}",
                self.spot
            )));
        }
        if !(self.strike > 0.0 && self.strike.is_finite()) {
            return Err(EngineError::invalid(format!(
                "strike price must be positive, got {}",
                self.strike
            )));
        }
        if !(self.ttl_years > 0.0 && self.ttl_years.is_finite()) {
            return Err(EngineError::invalid(format!(
                "time to expiry must be positive, got {}",
                self.ttl_years
            )));
        }
        if !self.rate.is_finite() || !self.dividend_yield.is_finite() {
            return Err(EngineError::invalid(format!(
                "rate and dividend yield must be finite, got r={} q={}",
                self.rate, self.dividend_yield
            )));
        }
        Ok(())
    }

    /// Already in the money at evaluation time (strike touched).
    /// Calls: K <= S. Puts: K >= S.
    #[inline]
    pub fn is_itm(&self) -> bool {
        match self.option_type {
            OptionType::Call => self.strike <= self.spot,
            OptionType::Put => self.strike >= self.spot,
        }
    }

    /// Undiscounted exercise value today.
    #[inline]
    pub fn intrinsic_value(&self) -> f64 {
        match self.option_type {
            OptionType::Call => (self.spot - self.strike).max(0.0),
            OptionType::Put => (self.strike - self.spot).max(0.0),
        }
    }
}

/// Probability models derived from a solved volatility implement this trait.
/// probability() must be a pure function: deterministic output from inputs only.
pub trait ProbabilityModel: Send + Sync {
    /// Returns a probability in [0, 1]. Caller guarantees sigma > 0.
    fn probability(&self, params: &ContractParams, sigma: f64) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itm_boundaries() {
        assert!(ContractParams::call(100.0, 100.0, 0.1, 0.0).is_itm());
        assert!(ContractParams::call(100.0, 95.0, 0.1, 0.0).is_itm());
        assert!(!ContractParams::call(100.0, 105.0, 0.1, 0.0).is_itm());
        assert!(ContractParams::put(100.0, 100.0, 0.1, 0.0).is_itm());
        assert!(ContractParams::put(100.0, 105.0, 0.1, 0.0).is_itm());
        assert!(!ContractParams::put(100.0, 95.0, 0.1, 0.0).is_itm());
    }

    #[test]
    fn test_intrinsic_value() {
        assert_eq!(ContractParams::call(110.0, 100.0, 0.1, 0.0).intrinsic_value(), 10.0);
        assert_eq!(ContractParams::call(90.0, 100.0, 0.1, 0.0).intrinsic_value(), 0.0);
        assert_eq!(ContractParams::put(90.0, 100.0, 0.1, 0.0).intrinsic_value(), 10.0);
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(ContractParams::call(0.0, 100.0, 0.1, 0.0).validate().is_err());
        assert!(ContractParams::call(100.0, -5.0, 0.1, 0.0).validate().is_err());
        assert!(ContractParams::call(100.0, 100.0, 0.0, 0.0).validate().is_err());
        assert!(ContractParams::call(100.0, 100.0, 0.1, f64::NAN).validate().is_err());
        assert!(ContractParams::put(100.0, 100.0, 0.1, 0.05).validate().is_ok());
    }

    #[test]
    fn test_display_and_code() {
        assert_eq!(OptionType::Call.to_string(), "call");
        assert_eq!(OptionType::Put.to_string(), "put");
        assert_eq!(OptionType::Put.code(), 'P');
    }
}
