//! Proleptic-Gregorian civil time.
//!
//! Just enough calendar math for the ISO-8601 bridge: epoch seconds to and
//! from a civil date-time, plus the weekday/day-of-year/week-number helpers
//! the renderer needs. Dates before the epoch and negative years work; the
//! algorithms are Howard Hinnant's `days_from_civil` / `civil_from_days`
//! widened to `i64` years.

/// A broken-down UTC date-time. No offset, no sub-second part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDateTime {
    pub year: i64,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// 0..=60, 60 only for a rendered leap second
    pub second: u8,
}

/// Days since 1970-01-01 for a civil date.
pub fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64; // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date for a count of days since 1970-01-01.
pub fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Weekday with Monday as 0 and Sunday as 6. 1970-01-01 was a Thursday.
pub fn weekday_monday0(days: i64) -> u8 {
    (days + 3).rem_euclid(7) as u8
}

/// Zero-based day of the year.
pub fn day_of_year(year: i64, month: u8, day: u8) -> i64 {
    days_from_civil(year, month, day) - days_from_civil(year, 1, 1)
}

/// Week of the year with Monday as the first day of the week; days before
/// the first Monday are week 0 (strftime `%W` numbering).
pub fn week_of_year(year: i64, month: u8, day: u8) -> u8 {
    let days = days_from_civil(year, month, day);
    let yday = days - days_from_civil(year, 1, 1);
    ((yday + 7 - weekday_monday0(days) as i64) / 7) as u8
}

impl CivilDateTime {
    /// Breaks epoch seconds down to a civil date-time.
    pub fn from_epoch_seconds(secs: i64) -> Self {
        let days = secs.div_euclid(86_400);
        let sod = secs.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (sod / 3_600) as u8,
            minute: (sod / 60 % 60) as u8,
            second: (sod % 60) as u8,
        }
    }

    /// Recomposes epoch seconds. A leap-second value of 60 lands on the
    /// following second.
    pub fn to_epoch_seconds(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day) * 86_400
            + self.hour as i64 * 3_600
            + self.minute as i64 * 60
            + self.second as i64
    }
}
