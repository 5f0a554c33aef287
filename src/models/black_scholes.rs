use crate::models::{ContractParams, OptionType};
use statrs::distribution::{ContinuousCDF, Normal};

/// The pair of standardized moneyness terms shared by the pricer and
/// the probability models.
///
/// d1 = (ln(S/K) + (r - q + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
#[derive(Debug, Clone, Copy)]
pub struct D1D2 {
    pub d1: f64,
    pub d2: f64,
}

#[inline]
pub fn d1_d2(params: &ContractParams, sigma: f64) -> D1D2 {
    let sigma_sqrt_t = sigma * params.ttl_years.sqrt();
    let drift = params.rate - params.dividend_yield + 0.5 * sigma * sigma;
    let d1 = ((params.spot / params.strike).ln() + drift * params.ttl_years) / sigma_sqrt_t;
    D1D2 {
        d1,
        d2: d1 - sigma_sqrt_t,
    }
}

/// Standard normal CDF.
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Black-Scholes fair value with continuous dividend yield at volatility
/// `sigma`. Pure function.
///
/// Call = S*e^(-qT)*N(d1) - K*e^(-rT)*N(d2)
/// Put  = K*e^(-rT)*N(-d2) - S*e^(-qT)*N(-d1)
///
/// Preconditions: S > 0, K > 0, T > 0, sigma > 0. Callers guard these;
/// with sigma <= 0 the result is NaN.
#[inline]
pub fn price(params: &ContractParams, sigma: f64) -> f64 {
    let D1D2 { d1, d2 } = d1_d2(params, sigma);
    let df_spot = params.spot * (-params.dividend_yield * params.ttl_years).exp();
    let df_strike = params.strike * (-params.rate * params.ttl_years).exp();

    match params.option_type {
        OptionType::Call => df_spot * norm_cdf(d1) - df_strike * norm_cdf(d2),
        OptionType::Put => df_strike * norm_cdf(-d2) - df_spot * norm_cdf(-d1),
    }
}
