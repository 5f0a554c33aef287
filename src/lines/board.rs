use crate::engine::{self, MarketObservation, OddsResult};
use crate::lines::ladder;
use crate::lines::moneyline::Moneyline;
use crate::models::time::IntoUtc;
use crate::models::OptionType;
use chrono::{DateTime, NaiveDate, Utc};

/// Observed call and put prices at one strike.
#[derive(Debug, Clone, Copy)]
pub struct StrikeQuote {
    pub strike: f64,
    pub call_price: f64,
    pub put_price: f64,
}

#[derive(Debug, Clone)]
pub struct BoardParams {
    pub ticker: String,
    pub spot: f64,
    pub expiry: NaiveDate,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    /// Added to intrinsic value when flooring quotes.
    pub arbitrage_tick: f64,
}

/// One strike: "over" is the call finishing ITM, "under" is the put.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LineRow {
    pub strike: f64,
    pub over: Option<Moneyline>,
    pub under: Option<Moneyline>,
    pub call: Option<OddsResult>,
    pub put: Option<OddsResult>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Board {
    pub ticker: String,
    pub spot: f64,
    pub expiry: NaiveDate,
    pub rows: Vec<LineRow>,
}

/// Prices every quote through the engine as of `now`.
///
/// Both legs are floored to intrinsic + tick before solving. A leg that
/// still fails to solve is logged and left empty; the rest of the board
/// is unaffected.
pub fn build_board(params: &BoardParams, quotes: &[StrikeQuote], now: DateTime<Utc>) -> Board {
    let rows = quotes
        .iter()
        .map(|quote| {
            let call = leg_odds(params, quote.strike, quote.call_price, OptionType::Call, now);
            let put = leg_odds(params, quote.strike, quote.put_price, OptionType::Put, now);
            LineRow {
                strike: quote.strike,
                over: call.and_then(|o| Moneyline::from_probability(o.prob_finish_itm)),
                under: put.and_then(|o| Moneyline::from_probability(o.prob_finish_itm)),
                call,
                put,
            }
        })
        .collect();

    Board {
        ticker: params.ticker.clone(),
        spot: params.spot,
        expiry: params.expiry,
        rows,
    }
}

fn leg_odds(
    params: &BoardParams,
    strike: f64,
    quoted: f64,
    option_type: OptionType,
    now: DateTime<Utc>,
) -> Option<OddsResult> {
    let price = ladder::arbitrage_floor(quoted, params.spot, strike, option_type, params.arbitrage_tick);
    let observation = MarketObservation::new(price, params.spot, strike, params.expiry.into_utc(), option_type)
        .with_rates(params.risk_free_rate, params.dividend_yield);

    match engine::compute_at(&observation, now) {
        Ok(odds) => Some(odds),
        Err(e) => {
            tracing::warn!(
                ticker = %params.ticker,
                strike = strike,
                option_type = %option_type,
                quoted = quoted,
                floored = price,
                error = %e,
                "could not price leg"
            );
            None
        }
    }
}

fn cell(line: Option<Moneyline>) -> String {
    line.map(|l| l.to_string()).unwrap_or_else(|| "n/a".into())
}

fn pct(odds: Option<OddsResult>, pick: fn(&OddsResult) -> f64) -> String {
    odds.map(|o| format!("{:.1}%", pick(&o) * 100.0))
        .unwrap_or_else(|| "n/a".into())
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} lines, expiry {} (spot {:.2})",
            self.ticker,
            self.expiry.format("%Y-%m-%d"),
            self.spot
        )?;
        writeln!(
            f,
            "{:>8} {:>12} {:>10} {:>10} {:>9} {:>9} {:>8}",
            "Ticker", "Target Price", "Over Line", "Under Line", "P(over)", "P(touch)", "IV"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>8} {:>12.2} {:>10} {:>10} {:>9} {:>9} {:>8}",
                self.ticker,
                row.strike,
                cell(row.over),
                cell(row.under),
                pct(row.call, |o| o.prob_finish_itm),
                pct(row.call, |o| o.prob_touch_before_expiry),
                pct(row.call, |o| o.implied_volatility),
            )?;
        }
        Ok(())
    }
}
