use crate::models::black_scholes::{d1_d2, norm_cdf, D1D2};
use crate::models::{ContractParams, OptionType, ProbabilityModel};

/// Risk-neutral probability of finishing in the money at expiry.
///
/// Call: P(S_T > K) = N(d2)
/// Put:  P(S_T < K) = N(-d2)
pub struct FinishInTheMoney;

impl ProbabilityModel for FinishInTheMoney {
    #[inline]
    fn probability(&self, params: &ContractParams, sigma: f64) -> f64 {
        let D1D2 { d2, .. } = d1_d2(params, sigma);
        let p = match params.option_type {
            OptionType::Call => norm_cdf(d2),
            OptionType::Put => norm_cdf(-d2),
        };
        p.clamp(0.0, 1.0)
    }
}

/// Probability that spot touches the strike at least once before expiry
/// (first passage of a GBM with drift r - q, reflection principle).
///
/// Already in the money: exactly 1.0. Otherwise, with e = 2(r - q) / sigma^2:
///
/// Call: (S/K)^e * N(d1) + N(d2)
/// Put:  (K/S)^e * N(-d1) + N(-d2)
///
/// r == q needs no special case; the power term collapses to 1.
pub struct TouchBeforeExpiry;

impl ProbabilityModel for TouchBeforeExpiry {
    fn probability(&self, params: &ContractParams, sigma: f64) -> f64 {
        if params.is_itm() {
            return 1.0;
        }

        let D1D2 { d1, d2 } = d1_d2(params, sigma);
        let exponent = 2.0 * (params.rate - params.dividend_yield) / (sigma * sigma);

        let p = match params.option_type {
            OptionType::Call => carry_term(params.spot / params.strike, exponent, norm_cdf(d1)) + norm_cdf(d2),
            OptionType::Put => carry_term(params.strike / params.spot, exponent, norm_cdf(-d1)) + norm_cdf(-d2),
        };

        // The power term can push extreme carry cases past 1
        p.clamp(0.0, 1.0)
    }
}

/// `ratio^exponent * n`, evaluated in log space. With near-zero sigma the
/// power alone overflows while `n` underflows to 0; the product is 0 then.
#[inline]
fn carry_term(ratio: f64, exponent: f64, n: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    (exponent * ratio.ln() + n.ln()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atm_finish_near_half() {
        let params = ContractParams::call(100.0, 100.0, 7.0 / 365.0, 0.0);
        let p = FinishInTheMoney.probability(&params, 0.45);
        assert!((p - 0.5).abs() < 0.05, "ATM prob={p} should be near 0.5");
    }

    #[test]
    fn test_deep_itm_and_otm() {
        let itm = ContractParams::call(110.0, 100.0, 0.05, 0.0);
        let otm = ContractParams::call(90.0, 100.0, 0.05, 0.0);
        assert!(FinishInTheMoney.probability(&itm, 0.3) > 0.7);
        assert!(FinishInTheMoney.probability(&otm, 0.3) < 0.3);

        let put_itm = ContractParams::put(90.0, 100.0, 0.05, 0.0);
        assert!(FinishInTheMoney.probability(&put_itm, 0.3) > 0.7);
    }

    #[test]
    fn test_call_put_finish_sum_to_one() {
        let call = ContractParams::call(100.0, 104.0, 0.2, 0.02).with_dividend_yield(0.01);
        let put = ContractParams::put(100.0, 104.0, 0.2, 0.02).with_dividend_yield(0.01);
        let total = FinishInTheMoney.probability(&call, 0.35) + FinishInTheMoney.probability(&put, 0.35);
        assert!((total - 1.0).abs() < 1e-12, "N(d2) + N(-d2) = {total}");
    }

    #[test]
    fn test_already_itm_touch_is_exactly_one() {
        for sigma in [1e-6, 0.1, 0.8, 4.9] {
            let call = ContractParams::call(100.0, 100.0, 0.1, 0.0);
            let deep_call = ContractParams::call(100.0, 60.0, 0.1, 0.03);
            let put = ContractParams::put(100.0, 100.0, 0.1, 0.0);
            let deep_put = ContractParams::put(100.0, 140.0, 0.1, 0.03);
            for params in [call, deep_call, put, deep_put] {
                assert_eq!(TouchBeforeExpiry.probability(&params, sigma), 1.0);
            }
        }
    }

    #[test]
    fn test_touch_dominates_finish_for_otm_call() {
        for strike in [101.0, 105.0, 120.0, 200.0] {
            for sigma in [0.05, 0.3, 1.0, 3.0] {
                for (r, q) in [(0.0, 0.0), (0.05, 0.0), (0.0, 0.04), (0.03, 0.01)] {
                    let params = ContractParams::call(100.0, strike, 0.25, r).with_dividend_yield(q);
                    let finish = FinishInTheMoney.probability(&params, sigma);
                    let touch = TouchBeforeExpiry.probability(&params, sigma);
                    assert!(
                        touch >= finish,
                        "K={strike} sigma={sigma} r={r} q={q}: touch {touch} < finish {finish}"
                    );
                    assert!((0.0..=1.0).contains(&touch));
                    assert!((0.0..=1.0).contains(&finish));
                }
            }
        }
    }

    #[test]
    fn test_zero_carry_touch_matches_closed_form() {
        // r == q: touch = N(d1) + N(d2)
        let params = ContractParams::call(100.0, 110.0, 0.5, 0.02).with_dividend_yield(0.02);
        let sigma = 0.4;
        let D1D2 { d1, d2 } = d1_d2(&params, sigma);
        let expected = norm_cdf(d1) + norm_cdf(d2);
        let touch = TouchBeforeExpiry.probability(&params, sigma);
        assert!((touch - expected).abs() < 1e-12);
    }

    #[test]
    fn test_otm_put_touch() {
        let params = ContractParams::put(100.0, 95.0, 0.1, 0.0);
        let finish = FinishInTheMoney.probability(&params, 0.3);
        let touch = TouchBeforeExpiry.probability(&params, 0.3);
        assert!(touch > finish, "put touch {touch} should exceed finish {finish}");
        assert!(touch < 1.0);
    }

    #[test]
    fn test_bounds_hold_at_bracket_floor_and_extreme_carry() {
        let carries = [(0.0, 0.0), (0.0, 0.05), (0.05, 0.0), (0.0, 0.2), (0.2, 0.0), (0.03, 0.01)];
        for sigma in [1e-6, 1e-3, 0.05, 0.3, 1.0, 4.9] {
            for (r, q) in carries {
                for strike in [50.0, 80.0, 99.0, 101.0, 120.0, 150.0, 200.0] {
                    for params in [
                        ContractParams::call(100.0, strike, 36.0 / 365.0, r).with_dividend_yield(q),
                        ContractParams::put(100.0, strike, 36.0 / 365.0, r).with_dividend_yield(q),
                    ] {
                        let finish = FinishInTheMoney.probability(&params, sigma);
                        let touch = TouchBeforeExpiry.probability(&params, sigma);
                        let ctx = format!("{} K={strike} sigma={sigma} r={r} q={q}", params.option_type);
                        assert!(finish.is_finite() && (0.0..=1.0).contains(&finish), "{ctx}: finish={finish}");
                        assert!(touch.is_finite() && (0.0..=1.0).contains(&touch), "{ctx}: touch={touch}");
                        assert!(touch >= finish, "{ctx}: touch {touch} < finish {finish}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_carry_term_underflow_is_zero() {
        // (100/150)^(-1e11) overflows on its own; N(d1) is exactly 0 here
        assert_eq!(carry_term(100.0 / 150.0, -1e11, 0.0), 0.0);
        assert!((carry_term(2.0, 3.0, 0.5) - 4.0).abs() < 1e-12);
    }
}
