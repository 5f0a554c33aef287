use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// 365-day year, matching the ACT/365 convention used for option expiries.
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

/// Floor on time to expiry. Keeps `sigma * sqrt(T)` strictly positive.
pub const MIN_YEAR_FRACTION: f64 = 1e-8;

/// Conversion to an unambiguous UTC instant.
/// Naive timestamps carry no offset and are read as UTC.
pub trait IntoUtc {
    fn into_utc(self) -> DateTime<Utc>;
}

impl IntoUtc for DateTime<Utc> {
    #[inline]
    fn into_utc(self) -> DateTime<Utc> {
        self
    }
}

impl IntoUtc for DateTime<FixedOffset> {
    #[inline]
    fn into_utc(self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

impl IntoUtc for NaiveDateTime {
    #[inline]
    fn into_utc(self) -> DateTime<Utc> {
        self.and_utc()
    }
}

impl IntoUtc for NaiveDate {
    /// Midnight at the start of the date, UTC.
    #[inline]
    fn into_utc(self) -> DateTime<Utc> {
        self.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

/// Year fraction between `now` and `expiry`, floored at [`MIN_YEAR_FRACTION`].
/// Pure: the caller supplies both instants.
pub fn yearfrac(now: impl IntoUtc, expiry: impl IntoUtc) -> f64 {
    let elapsed = expiry.into_utc() - now.into_utc();
    let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
    (seconds / SECONDS_PER_YEAR).max(MIN_YEAR_FRACTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 15, 30, 0).single().unwrap()
    }

    #[test]
    fn test_one_year() {
        let now = t0();
        let t = yearfrac(now, now + Duration::days(365));
        assert!((t - 1.0).abs() < 1e-12, "365 days should be one year, got {t}");
    }

    #[test]
    fn test_seven_days() {
        let now = t0();
        let t = yearfrac(now, now + Duration::days(7));
        assert!((t - 7.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_floor_when_expired() {
        let now = t0();
        assert_eq!(yearfrac(now, now), MIN_YEAR_FRACTION);
        assert_eq!(yearfrac(now, now - Duration::hours(3)), MIN_YEAR_FRACTION);
        assert!(yearfrac(now, now - Duration::days(400)) > 0.0);
    }

    #[test]
    fn test_naive_treated_as_utc() {
        let now = t0();
        let naive_expiry = (now + Duration::days(30)).naive_utc();
        let aware = yearfrac(now, now + Duration::days(30));
        let naive = yearfrac(now.naive_utc(), naive_expiry);
        assert_eq!(aware, naive);
    }

    #[test]
    fn test_offset_normalized() {
        let now = t0();
        // 10:30 at UTC-05:00 is the same instant as 15:30 UTC
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let now_eastern = eastern.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).single().unwrap();
        let expiry = now + Duration::days(10);
        assert_eq!(yearfrac(now_eastern, expiry), yearfrac(now, expiry));
    }

    #[test]
    fn test_naive_date_is_midnight_utc() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let instant = d.into_utc();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).single().unwrap());
    }
}
