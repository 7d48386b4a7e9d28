//! Precision classes.
//!
//! Every stored time value carries a precision class describing how fine its
//! resolution is. The classes form a single total order from nanosecond up to
//! millennium; the calendar classes (second and coarser) additionally have a
//! 4-bit wire code used by the second-or-coarser codeword layout.

use core::cmp::Ordering;

use crate::{Error, Result};

/// Resolution of a stored time value, finest to coarsest.
///
/// `Bits23`, `Bits15` are the binary sub-second classes sitting between the
/// decimal ones; `Unknown` sorts after everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Nanosecond,
    /// 23-bit binary fraction, ~119 ns resolution.
    Bits23,
    Microsecond,
    /// 15-bit binary fraction, ~30.5 us resolution (RTC-friendly).
    Bits15,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Trimester,
    Semester,
    Year,
    Decade,
    Century,
    Millennium,
    Unknown,
}

impl Precision {
    /// Ordering rank: negative for sub-second classes, 0..=12 for the
    /// calendar classes (these double as the wire codes).
    pub const fn rank(self) -> i8 {
        match self {
            Self::Nanosecond => -9,
            Self::Bits23 => -7,
            Self::Microsecond => -6,
            Self::Bits15 => -5,
            Self::Millisecond => -3,
            Self::Second => 0,
            Self::Minute => 1,
            Self::Hour => 2,
            Self::Day => 3,
            Self::Week => 4,
            Self::Month => 5,
            Self::Quarter => 6,
            Self::Trimester => 7,
            Self::Semester => 8,
            Self::Year => 9,
            Self::Decade => 10,
            Self::Century => 11,
            Self::Millennium => 12,
            Self::Unknown => 99,
        }
    }

    /// 4-bit wire code for the second-or-coarser layout, `None` for
    /// sub-second and unknown classes.
    pub const fn calendar_code(self) -> Option<u8> {
        match self.rank() {
            r if 0 <= r && r <= 12 => Some(r as u8),
            _ => None,
        }
    }

    /// Inverse of [`calendar_code`](Self::calendar_code). Codes above 12 are
    /// undefined on the wire.
    pub fn from_calendar_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Second),
            1 => Ok(Self::Minute),
            2 => Ok(Self::Hour),
            3 => Ok(Self::Day),
            4 => Ok(Self::Week),
            5 => Ok(Self::Month),
            6 => Ok(Self::Quarter),
            7 => Ok(Self::Trimester),
            8 => Ok(Self::Semester),
            9 => Ok(Self::Year),
            10 => Ok(Self::Decade),
            11 => Ok(Self::Century),
            12 => Ok(Self::Millennium),
            _ => Err(Error::InvalidPrecisionCode(code)),
        }
    }

    /// True for classes finer than a whole second.
    pub const fn is_subsecond(self) -> bool {
        self.rank() < 0
    }

    /// ISO-8601 duration unit designator, where one exists.
    pub const fn unit_symbol(self) -> Option<&'static str> {
        match self {
            Self::Second => Some("S"),
            Self::Minute => Some("M"),
            Self::Hour => Some("H"),
            Self::Day => Some("D"),
            Self::Week => Some("W"),
            Self::Month => Some("M"),
            Self::Quarter => Some("Q"),
            Self::Year => Some("Y"),
            Self::Decade => Some("Dec"),
            Self::Century => Some("Cen"),
            Self::Millennium => Some("Mil"),
            _ => None,
        }
    }

    /// Nominal length of one unit in seconds for duration rendering.
    /// Month is 30 days, quarter 90, year 365.25; multiples thereof upward.
    pub const fn unit_seconds(self) -> Option<i64> {
        match self {
            Self::Minute => Some(60),
            Self::Hour => Some(3_600),
            Self::Day => Some(86_400),
            Self::Week => Some(604_800),
            Self::Month => Some(2_592_000),
            Self::Quarter => Some(7_776_000),
            Self::Trimester => Some(10_368_000),
            Self::Semester => Some(15_552_000),
            Self::Year => Some(31_557_600),
            Self::Decade => Some(315_576_000),
            Self::Century => Some(3_155_760_000),
            Self::Millennium => Some(31_557_600_000),
            _ => None,
        }
    }
}

impl Ord for Precision {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Precision {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
