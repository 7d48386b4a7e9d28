//! The structured time value.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::codeword;
use crate::precision::Precision;
use crate::tz_offset;
use crate::{Error, Result};

/// Which codeword family a [`Timestamp`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wall-clock seconds since the Unix epoch.
    AbsoluteSeconds,
    /// A bare year as an `f32`, outside the seconds-representable range.
    AbsoluteYear,
    /// An unsigned duration in seconds (36-bit field).
    RelativeSeconds,
    /// High-resolution duration; recognized but not implemented.
    RelativeFraction,
    /// Opaque application-defined payload.
    Custom,
    /// A 60-bit logical (Lamport-style) counter, no wall-clock meaning.
    Logical,
}

/// Fidelity note attached to [`Timestamp::to_unix`] output. Advisory only;
/// conversion always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnixFidelity {
    /// The integer fully represents the stored value.
    Exact,
    /// A leap second cannot be expressed; the result aliases the preceding
    /// second.
    LeapSecondDropped,
    /// A non-zero UTC offset was discarded (the result stays UTC).
    OffsetDropped,
    /// Sub-second resolution of the given class was truncated.
    SubsecondTruncated(Precision),
}

/// A decoded time value: one of the codeword families plus its components.
///
/// `seconds` is epoch seconds for `AbsoluteSeconds`, the duration for
/// `RelativeSeconds` and the counter for `Logical`. `year` is set only for
/// `AbsoluteYear`. `raw` remembers the codeword a value was decoded from,
/// when there was one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp {
    pub format: Format,
    pub seconds: i64,
    /// Sub-second part, 0..10^9.
    pub nanoseconds: u32,
    pub precision: Precision,
    /// Minutes east of UTC, -1020..=1020.
    pub tz_offset_minutes: i16,
    pub is_leap_second: bool,
    pub is_dst: bool,
    pub year: Option<f32>,
    pub raw: Option<i64>,
}

impl Default for Timestamp {
    fn default() -> Self {
        Self {
            format: Format::AbsoluteSeconds,
            seconds: 0,
            nanoseconds: 0,
            precision: Precision::Unknown,
            tz_offset_minutes: 0,
            is_leap_second: false,
            is_dst: false,
            year: None,
            raw: None,
        }
    }
}

/// Lowest encodable epoch second. The band below, down to `-0x20 << 32`,
/// would put the negative year marker `0xE0` in the codeword's top byte.
pub const MIN_SECONDS: i64 = -0x1F << 32;
/// One past the largest encodable epoch second.
pub const MAX_SECONDS: i64 = 0x7F << 32;

const LOGICAL_LIMIT: i64 = 1 << 60;

impl Timestamp {
    /// An empty value with unknown precision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a second-precision absolute value from Unix epoch seconds.
    ///
    /// Rejects values outside the seconds-format range, roughly the years
    /// -2249 to 19254.
    pub fn from_unix(secs: i64) -> Result<Self> {
        if secs < MIN_SECONDS || MAX_SECONDS <= secs {
            return Err(Error::ValueOutOfRange(secs));
        }
        let mut ts = Self {
            format: Format::AbsoluteSeconds,
            seconds: secs,
            precision: Precision::Second,
            ..Self::new()
        };
        ts.raw = Some(codeword::encode(&ts)?);
        Ok(ts)
    }

    /// Builds a logical-counter value. The stored field is 60 bits wide;
    /// counter magnitudes must fit it.
    pub fn from_logical(count: i64) -> Result<Self> {
        if count <= -LOGICAL_LIMIT || LOGICAL_LIMIT <= count {
            return Err(Error::ValueOutOfRange(count));
        }
        let mut ts = Self {
            format: Format::Logical,
            seconds: count,
            ..Self::new()
        };
        ts.raw = Some(codeword::encode(&ts)?);
        Ok(ts)
    }

    /// Samples the system clock, millisecond precision, UTC.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            format: Format::AbsoluteSeconds,
            seconds: since_epoch.as_secs() as i64,
            nanoseconds: since_epoch.subsec_nanos(),
            precision: Precision::Millisecond,
            ..Self::new()
        }
    }

    /// Projects the value onto a plain Unix epoch-second integer, with a
    /// note describing what (if anything) the projection lost.
    pub fn to_unix(&self) -> (i64, UnixFidelity) {
        let fidelity = if self.is_leap_second {
            UnixFidelity::LeapSecondDropped
        } else if self.tz_offset_minutes != 0 {
            UnixFidelity::OffsetDropped
        } else if self.precision.is_subsecond() {
            UnixFidelity::SubsecondTruncated(self.precision)
        } else {
            UnixFidelity::Exact
        };
        (self.seconds, fidelity)
    }

    /// Returns the logical counter, or an error for wall-clock values.
    pub fn to_logical(&self) -> Result<i64> {
        if self.format != Format::Logical {
            return Err(Error::IncompatibleOutput);
        }
        Ok(self.seconds)
    }

    /// True when the leap-second marker occupies the offset field, i.e. no
    /// real offset can be stored alongside.
    pub fn offset_field_value(&self) -> i16 {
        if self.is_leap_second {
            tz_offset::LEAP_SECOND
        } else {
            self.tz_offset_minutes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_unix_within_range() {
        let ts = Timestamp::from_unix(1_743_154_226).unwrap();
        assert_eq!(ts.format, Format::AbsoluteSeconds);
        assert_eq!(ts.seconds, 1_743_154_226);
        assert_eq!(ts.precision, Precision::Second);
        assert_eq!(ts.tz_offset_minutes, 0);
        assert!(ts.raw.is_some());
    }

    #[test]
    fn from_unix_accepts_negative_seconds() {
        let ts = Timestamp::from_unix(-1).unwrap();
        assert_eq!(ts.seconds, -1);
    }

    #[test]
    fn from_unix_range_limits() {
        assert!(Timestamp::from_unix(MAX_SECONDS - 1).is_ok());
        assert_eq!(
            Timestamp::from_unix(MAX_SECONDS).unwrap_err(),
            Error::ValueOutOfRange(MAX_SECONDS)
        );
        assert!(Timestamp::from_unix(MIN_SECONDS).is_ok());
        assert_eq!(
            Timestamp::from_unix(MIN_SECONDS - 1).unwrap_err(),
            Error::ValueOutOfRange(MIN_SECONDS - 1)
        );
    }

    #[test]
    fn from_logical_range_limits() {
        assert!(Timestamp::from_logical(0).is_ok());
        assert!(Timestamp::from_logical((1 << 60) - 1).is_ok());
        assert!(Timestamp::from_logical(-(1 << 60) + 1).is_ok());
        assert!(Timestamp::from_logical(1 << 60).is_err());
        assert!(Timestamp::from_logical(-(1 << 60)).is_err());
    }

    #[test]
    fn to_unix_exact_for_plain_seconds() {
        let ts = Timestamp::from_unix(12_345).unwrap();
        assert_eq!(ts.to_unix(), (12_345, UnixFidelity::Exact));
    }

    #[test]
    fn to_unix_reports_leap_second_first() {
        let ts = Timestamp {
            seconds: 1_483_228_799,
            precision: Precision::Millisecond,
            is_leap_second: true,
            ..Timestamp::new()
        };
        assert_eq!(ts.to_unix().1, UnixFidelity::LeapSecondDropped);
    }

    #[test]
    fn to_unix_reports_dropped_offset() {
        let ts = Timestamp {
            seconds: 0,
            precision: Precision::Second,
            tz_offset_minutes: 60,
            ..Timestamp::new()
        };
        assert_eq!(ts.to_unix().1, UnixFidelity::OffsetDropped);
    }

    #[test]
    fn to_unix_reports_subsecond_truncation() {
        let ts = Timestamp {
            seconds: 7,
            nanoseconds: 500_000_000,
            precision: Precision::Bits23,
            ..Timestamp::new()
        };
        assert_eq!(
            ts.to_unix().1,
            UnixFidelity::SubsecondTruncated(Precision::Bits23)
        );
    }

    #[test]
    fn to_unix_is_exact_for_coarse_precision() {
        let ts = Timestamp {
            seconds: 3_600,
            precision: Precision::Hour,
            ..Timestamp::new()
        };
        assert_eq!(ts.to_unix().1, UnixFidelity::Exact);
    }

    #[test]
    fn to_logical_requires_logical_format() {
        let ts = Timestamp::from_logical(42).unwrap();
        assert_eq!(ts.to_logical().unwrap(), 42);
        let wall = Timestamp::from_unix(42).unwrap();
        assert_eq!(wall.to_logical().unwrap_err(), Error::IncompatibleOutput);
    }

    #[test]
    fn now_has_millisecond_class() {
        let ts = Timestamp::now();
        assert_eq!(ts.format, Format::AbsoluteSeconds);
        assert_eq!(ts.precision, Precision::Millisecond);
        assert!(ts.seconds > 1_700_000_000);
    }
}
