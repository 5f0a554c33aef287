use crate::errors::{EngineError, EngineResult};
use crate::models::black_scholes;
use crate::models::ContractParams;

/// Lowest volatility searched (~0% annualized).
pub const MIN_SIGMA: f64 = 1e-6;
/// Highest volatility searched (500% annualized).
pub const MAX_SIGMA: f64 = 5.0;
pub const MAX_ITERATIONS: u32 = 200;

/// Configuration for the root-finder.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub min_sigma: f64,
    pub max_sigma: f64,
    pub max_iterations: u32,
    /// Absolute tolerance on sigma.
    pub xtol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_sigma: MIN_SIGMA,
            max_sigma: MAX_SIGMA,
            max_iterations: MAX_ITERATIONS,
            xtol: 2e-12,
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bounds(mut self, min_sigma: f64, max_sigma: f64) -> Self {
        self.min_sigma = min_sigma;
        self.max_sigma = max_sigma;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    fn validate(&self) -> EngineResult<()> {
        if !(self.min_sigma > 0.0 && self.min_sigma < self.max_sigma && self.max_sigma.is_finite()) {
            return Err(EngineError::invalid(format!(
                "volatility bracket must satisfy 0 < lower < upper, got [{}, {}]",
                self.min_sigma, self.max_sigma
            )));
        }
        if self.max_iterations == 0 || !(self.xtol > 0.0) {
            return Err(EngineError::invalid(
                "solver needs at least one iteration and a positive tolerance",
            ));
        }
        Ok(())
    }
}

/// Outcome of a bracketed search that did not produce a root.
#[derive(Debug, Clone, Copy, PartialEq)]
enum BrentFailure {
    NotBracketed,
    Exhausted { last: f64 },
}

/// Solves for the volatility that reproduces `observed_price`.
///
/// Brent's method on a fixed bracket over `price(sigma) - observed`. The
/// price is strictly increasing in sigma for calls and puts alike, so a
/// valid bracket holds exactly one root.
///
/// Returns `(sigma, iterations)`. Fails with `NoRootFound` when the observed
/// price lies outside the range spanned by the bracket endpoints, and with
/// `SolverExhausted` if the iteration cap is hit first.
pub fn solve_iv(
    params: &ContractParams,
    observed_price: f64,
    config: &SolverConfig,
) -> EngineResult<(f64, u32)> {
    params.validate()?;
    config.validate()?;

    if !(observed_price >= 0.0 && observed_price.is_finite()) {
        return Err(EngineError::invalid(format!(
            "observed {} price must be non-negative, got {observed_price}",
            params.option_type
        )));
    }

    let objective = |sigma: f64| black_scholes::price(params, sigma) - observed_price;

    match brent(objective, config) {
        Ok(found) => Ok(found),
        Err(BrentFailure::NotBracketed) => Err(EngineError::NoRootFound {
            option_type: params.option_type,
            observed_price,
            spot: params.spot,
            strike: params.strike,
            time_to_expiry: params.ttl_years,
            lower: config.min_sigma,
            upper: config.max_sigma,
        }),
        Err(BrentFailure::Exhausted { last }) => Err(EngineError::SolverExhausted {
            option_type: params.option_type,
            iterations: config.max_iterations,
            last_sigma: last,
        }),
    }
}

/// Brent-Dekker root-finder: inverse quadratic interpolation with a
/// bisection fallback. `f(lower)` and `f(upper)` must differ in sign.
fn brent<F>(f: F, config: &SolverConfig) -> Result<(f64, u32), BrentFailure>
where
    F: Fn(f64) -> f64,
{
    let mut a = config.min_sigma;
    let mut b = config.max_sigma;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok((a, 0));
    }
    if fb == 0.0 {
        return Ok((b, 0));
    }
    // NaN fails both comparisons and is rejected here as well
    if !((fa < 0.0 && fb > 0.0) || (fa > 0.0 && fb < 0.0)) {
        return Err(BrentFailure::NotBracketed);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=config.max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.xtol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok((b, iteration));
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * qa * (qa - r) - (b - a) * (r - 1.0)),
                    (qa - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = f(b);
    }

    Err(BrentFailure::Exhausted { last: b })
}
