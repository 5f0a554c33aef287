/// American moneyline from a win probability.
///
/// decimal = 1 / p
/// decimal >= 2 (underdog):  +(decimal - 1) * 100
/// decimal <  2 (favourite): -100 / (decimal - 1)
///
/// Rounded half away from zero. Pure function, no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct Moneyline(pub i64);

impl Moneyline {
    /// `None` unless `0 < p < 1`: a certain outcome has decimal odds of 1
    /// and no finite line, an impossible one has no price at all.
    pub fn from_probability(p: f64) -> Option<Self> {
        if !(p > 0.0 && p < 1.0) {
            return None;
        }
        let decimal = 1.0 / p;
        let line = if decimal >= 2.0 {
            (decimal - 1.0) * 100.0
        } else {
            -100.0 / (decimal - 1.0)
        };
        if !line.is_finite() {
            return None;
        }
        Some(Self(line.round() as i64))
    }

    /// Implied probability of this line (inverse transform, before rounding loss).
    pub fn implied_probability(&self) -> f64 {
        let line = self.0 as f64;
        if self.0 >= 0 {
            100.0 / (line + 100.0)
        } else {
            -line / (-line + 100.0)
        }
    }

    /// Profit on a winning stake, excluding the stake itself.
    pub fn profit(&self, stake: f64) -> f64 {
        let line = self.0 as f64;
        if self.0 >= 0 {
            stake * line / 100.0
        } else {
            stake * 100.0 / line.abs()
        }
    }

    /// Stake plus profit.
    #[inline]
    pub fn total_return(&self, stake: f64) -> f64 {
        stake + self.profit(stake)
    }
}

impl std::fmt::Display for Moneyline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 >= 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
