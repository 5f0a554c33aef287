use crate::errors::{EngineError, EngineResult};
use crate::models::implied_vol::{self, SolverConfig};
use crate::models::probability::{FinishInTheMoney, TouchBeforeExpiry};
use crate::models::time::{self, IntoUtc};
use crate::models::{ContractParams, OptionType, ProbabilityModel};
use chrono::{DateTime, Utc};

/// One option contract's observed state at evaluation time.
/// Built fresh per contract/strike; never mutated or shared across calls.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MarketObservation {
    /// Observed market price. Callers pre-clamp it to the no-arbitrage floor.
    pub option_price: f64,
    pub spot_price: f64,
    pub strike: f64,
    pub expiry: DateTime<Utc>,
    pub option_type: OptionType,
    /// Continuously-compounded annual rate.
    pub risk_free_rate: f64,
    /// Continuously-compounded annual yield.
    pub dividend_yield: f64,
}

impl MarketObservation {
    /// Zero rate and zero dividend yield. `expiry` may be naive (read as UTC).
    pub fn new(
        option_price: f64,
        spot_price: f64,
        strike: f64,
        expiry: impl IntoUtc,
        option_type: OptionType,
    ) -> Self {
        Self {
            option_price,
            spot_price,
            strike,
            expiry: expiry.into_utc(),
            option_type,
            risk_free_rate: 0.0,
            dividend_yield: 0.0,
        }
    }

    #[must_use]
    pub fn with_rates(mut self, risk_free_rate: f64, dividend_yield: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self.dividend_yield = dividend_yield;
        self
    }

    fn contract(&self, ttl_years: f64) -> ContractParams {
        ContractParams {
            spot: self.spot_price,
            strike: self.strike,
            ttl_years,
            rate: self.risk_free_rate,
            dividend_yield: self.dividend_yield,
            option_type: self.option_type,
        }
    }
}

/// Derived per observation, returned by value, never cached.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OddsResult {
    pub time_to_expiry_years: f64,
    pub implied_volatility: f64,
    pub prob_finish_itm: f64,
    pub prob_touch_before_expiry: f64,
}

/// Computes odds as of the current UTC time. This is the only entry point
/// that reads the wall clock; every layer below takes an explicit instant.
pub fn compute(observation: &MarketObservation) -> EngineResult<OddsResult> {
    compute_at(observation, Utc::now())
}

/// Computes odds as of `evaluation_time` with the default solver bracket.
pub fn compute_at(
    observation: &MarketObservation,
    evaluation_time: impl IntoUtc,
) -> EngineResult<OddsResult> {
    compute_with(observation, evaluation_time, &SolverConfig::default())
}

/// Full pipeline with an explicit solver configuration.
///
/// Any solver failure surfaces as `InvalidInputs` carrying the solver's
/// diagnostic. No volatility is ever substituted.
pub fn compute_with(
    observation: &MarketObservation,
    evaluation_time: impl IntoUtc,
    solver: &SolverConfig,
) -> EngineResult<OddsResult> {
    let ttl_years = time::yearfrac(evaluation_time, observation.expiry);
    let params = observation.contract(ttl_years);
    params.validate()?;

    let (sigma, _iterations) = implied_vol::solve_iv(&params, observation.option_price, solver)
        .map_err(|e| match e {
            EngineError::InvalidInputs { .. } => e,
            other => EngineError::invalid(format!("could not infer implied volatility: {other}")),
        })?;

    Ok(OddsResult {
        time_to_expiry_years: ttl_years,
        implied_volatility: sigma,
        prob_finish_itm: FinishInTheMoney.probability(&params, sigma),
        prob_touch_before_expiry: TouchBeforeExpiry.probability(&params, sigma),
    })
}
