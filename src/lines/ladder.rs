use crate::models::{ContractParams, OptionType};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Strikes centred on the multiple of `step` nearest to spot,
/// `width` rungs either side. Non-positive rungs are dropped.
pub fn strike_ladder(spot: f64, step: f64, width: u32) -> Vec<f64> {
    if !(spot > 0.0 && step > 0.0) || !spot.is_finite() || !step.is_finite() {
        return Vec::new();
    }
    let base = (spot / step).round() * step;
    let w = width as i64;
    (-w..=w)
        .map(|k| base + k as f64 * step)
        .filter(|&strike| strike > 0.0)
        .collect()
}

/// Nearest Friday on or after `today`.
pub fn next_weekly_expiry(today: NaiveDate) -> NaiveDate {
    let from_monday = today.weekday().num_days_from_monday() as i64;
    let friday = Weekday::Fri.num_days_from_monday() as i64;
    let days_ahead = (friday - from_monday).rem_euclid(7);
    today + Duration::days(days_ahead)
}

/// Lifts a quoted price to at least intrinsic value plus one `tick`.
/// Quotes below the no-arbitrage floor leave the solver without a root.
pub fn arbitrage_floor(option_price: f64, spot: f64, strike: f64, option_type: OptionType, tick: f64) -> f64 {
    let params = ContractParams {
        spot,
        strike,
        ttl_years: 0.0,
        rate: 0.0,
        dividend_yield: 0.0,
        option_type,
    };
    option_price.max(params.intrinsic_value() + tick)
}

/// Exchange option symbol, e.g. `O:SPY240308C00510000`.
/// Strike is encoded in thousandths, zero-padded to eight digits.
pub fn option_symbol(underlying: &str, expiry: NaiveDate, option_type: OptionType, strike: f64) -> String {
    let strike_milli = (strike * 1000.0).round() as u64;
    format!(
        "O:{}{}{}{:08}",
        underlying.to_uppercase(),
        expiry.format("%y%m%d"),
        option_type.code(),
        strike_milli
    )
}
