//! The 64-bit codeword codec.
//!
//! A codeword is a signed 64-bit integer whose top bits select the format:
//!
//! | top bits                  | format                        |
//! |---------------------------|-------------------------------|
//! | byte `0x7F` or `0xE0`     | absolute year (f32 payload)   |
//! | signed byte in `0xD0..0x7F` | seconds, nibble `0xD` relative |
//! | nibble `0xC`              | relative fraction (header only) |
//! | nibble `0xB`              | custom                        |
//! | nibble `0xA`              | logical counter               |
//! | bits `100` (nibble 8, 9)  | reserved                      |
//!
//! Seconds codewords keep the epoch seconds sign-preserved in bits 24..64 and
//! a tag in the low bits selecting one of five sub-second layouts; see
//! [`decode`] for the field placement. Codewords of equal precision class and
//! offset compare like the instants they encode.

use log::warn;

use crate::fraction;
use crate::precision::Precision;
use crate::timestamp::{Format, Timestamp, MAX_SECONDS, MIN_SECONDS};
use crate::tz_offset;
use crate::{Error, Result};

const MARKER_YEAR_POS: i8 = 0x7F;
const MARKER_YEAR_NEG: i8 = -0x20;

const NIBBLE_LOGICAL: u8 = 0xA;
const NIBBLE_CUSTOM: u8 = 0xB;
const NIBBLE_REL_FRACTION: u8 = 0xC;
const NIBBLE_REL_SECONDS: u8 = 0xD;
const RESERVED_TOP_BITS: u8 = 0b100;

/// Years below this magnitude belong in the seconds formats.
const YEAR_LIMIT_POS: f32 = 19_255.0;
const YEAR_LIMIT_NEG: f32 = -2_251.0;

const REL_SECONDS_MASK: i64 = (1 << 36) - 1;
const LOGICAL_MASK: i64 = (1 << 60) - 1;

/// Codeword family read off the top bits, before any payload validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codepoint {
    AbsoluteYear,
    Seconds { relative: bool },
    RelativeFraction,
    Custom,
    Logical,
    Reserved,
    Invalid,
}

fn classify(raw: i64) -> Codepoint {
    let top = (raw >> 56) as i8;
    if top == MARKER_YEAR_POS || top == MARKER_YEAR_NEG {
        return Codepoint::AbsoluteYear;
    }
    if ((NIBBLE_REL_SECONDS << 4) as i8) <= top {
        return Codepoint::Seconds {
            relative: (top as u8) >> 4 == NIBBLE_REL_SECONDS,
        };
    }
    match ((raw as u64) >> 60) as u8 {
        NIBBLE_LOGICAL => Codepoint::Logical,
        NIBBLE_CUSTOM => Codepoint::Custom,
        NIBBLE_REL_FRACTION => Codepoint::RelativeFraction,
        nib if nib >> 1 == RESERVED_TOP_BITS => Codepoint::Reserved,
        _ => Codepoint::Invalid,
    }
}

/// Decodes a codeword into its structured components.
///
/// Custom and reserved codewords, the unimplemented relative-fraction
/// format, undefined precision codes and invalid year payloads are rejected.
pub fn decode(raw: i64) -> Result<Timestamp> {
    match classify(raw) {
        Codepoint::AbsoluteYear => decode_year(raw),
        Codepoint::Seconds { relative } => decode_seconds(raw, relative),
        Codepoint::Logical => Ok(Timestamp {
            format: Format::Logical,
            seconds: raw & LOGICAL_MASK,
            raw: Some(raw),
            ..Timestamp::new()
        }),
        Codepoint::RelativeFraction => {
            warn!("relative-fraction codeword {raw:#018X} not implemented");
            Err(Error::UnimplementedRelativeFraction)
        }
        Codepoint::Custom => Err(Error::CustomFormat),
        Codepoint::Reserved => Err(Error::ReservedFormat),
        Codepoint::Invalid => Err(Error::InvalidLeadingByte((raw >> 56) as u8)),
    }
}

/// Encodes a structured value back into a codeword.
///
/// The inverse of [`decode`]: any value obtained from `decode` re-encodes to
/// a codeword that decodes to the same value. Custom and relative-fraction
/// values have no encoder.
pub fn encode(ts: &Timestamp) -> Result<i64> {
    if ts.tz_offset_minutes < -tz_offset::MAX_OFFSET_MINUTES
        || tz_offset::MAX_OFFSET_MINUTES < ts.tz_offset_minutes
    {
        return Err(Error::OffsetOutOfRange(ts.tz_offset_minutes));
    }
    if ts.is_leap_second && ts.tz_offset_minutes != 0 {
        return Err(Error::OffsetAndLeapSecond);
    }
    match ts.format {
        Format::Logical => Ok(((NIBBLE_LOGICAL as i64) << 60) | (ts.seconds & LOGICAL_MASK)),
        Format::AbsoluteYear => encode_year(ts),
        Format::AbsoluteSeconds | Format::RelativeSeconds => encode_seconds(ts),
        Format::Custom => Err(Error::CustomFormat),
        Format::RelativeFraction => Err(Error::UnimplementedRelativeFraction),
    }
}

fn decode_year(raw: i64) -> Result<Timestamp> {
    if raw & 0xFF_FFFF != 0 {
        return Err(Error::NonZeroTrailingBits);
    }
    let year = f32::from_bits((raw >> 24) as u32);
    let positive = (raw >> 56) as i8 == MARKER_YEAR_POS;
    if positive && year < YEAR_LIMIT_POS || !positive && year > YEAR_LIMIT_NEG {
        return Err(Error::YearOutOfRange(year));
    }
    Ok(Timestamp {
        format: Format::AbsoluteYear,
        year: Some(year),
        raw: Some(raw),
        ..Timestamp::new()
    })
}

fn encode_year(ts: &Timestamp) -> Result<i64> {
    let year = ts.year.unwrap_or(0.0);
    let marker = if year >= YEAR_LIMIT_POS {
        MARKER_YEAR_POS
    } else if year <= YEAR_LIMIT_NEG {
        MARKER_YEAR_NEG
    } else {
        return Err(Error::YearOutOfRange(year));
    };
    Ok(((marker as i64) << 56) | ((year.to_bits() as i64) << 24))
}

/// Field placement of the five seconds layouts, selected by the low bits:
///
/// | low bits | layout          | fraction field | offset field |
/// |----------|-----------------|----------------|--------------|
/// | `xxxxx0` | 23-bit fraction | bits 1..24     | none (UTC)   |
/// | `..001`  | microsecond     | bits 4..24     | none (UTC)   |
/// | `..011`  | 15-bit fraction | bits 9..24     | none (UTC)   |
/// | `..101`  | millisecond     | bits 14..24    | bits 3..14   |
/// | `..111`  | second+, 4-bit precision code in bits 3..7 | none | bits 13..24 |
fn decode_seconds(raw: i64, relative: bool) -> Result<Timestamp> {
    let mut ts = Timestamp {
        format: Format::AbsoluteSeconds,
        seconds: raw >> 24,
        raw: Some(raw),
        ..Timestamp::new()
    };
    let mut fraction_field: u32 = 0;
    match raw & 0b111 {
        tag if tag & 1 == 0 => {
            ts.precision = Precision::Bits23;
            fraction_field = (raw & 0xFF_FFFE) as u32;
        }
        0b001 => {
            ts.precision = Precision::Microsecond;
            fraction_field = (raw & 0xFF_FFF0) as u32;
        }
        0b011 => {
            ts.precision = Precision::Bits15;
            fraction_field = (raw & 0xFF_FE00) as u32;
        }
        0b101 => {
            ts.precision = Precision::Millisecond;
            fraction_field = (raw & 0xFF_C000) as u32;
            ts.tz_offset_minutes = tz_offset::from_field((raw >> 3) as u16);
        }
        _ => {
            ts.tz_offset_minutes = tz_offset::from_field((raw >> 13) as u16);
            ts.precision = Precision::from_calendar_code(((raw >> 3) & 0xF) as u8)?;
        }
    }
    ts.nanoseconds = fraction::frac_to_ns(fraction_field >> 1);
    if ts.tz_offset_minutes == tz_offset::LEAP_SECOND {
        ts.is_leap_second = true;
        ts.tz_offset_minutes = 0;
    }
    if relative {
        ts.format = Format::RelativeSeconds;
        ts.seconds = (raw >> 24) & REL_SECONDS_MASK;
    }
    Ok(ts)
}

fn encode_seconds(ts: &Timestamp) -> Result<i64> {
    let base = if ts.format == Format::RelativeSeconds {
        if ts.seconds & !REL_SECONDS_MASK != 0 {
            return Err(Error::ValueOutOfRange(ts.seconds));
        }
        ((NIBBLE_REL_SECONDS as i64) << 60) | (ts.seconds << 24)
    } else {
        if ts.seconds < MIN_SECONDS || MAX_SECONDS <= ts.seconds {
            return Err(Error::ValueOutOfRange(ts.seconds));
        }
        ts.seconds << 24
    };
    let offset_field = tz_offset::to_field(ts.offset_field_value()) as i64;
    let low = match ts.precision {
        Precision::Nanosecond | Precision::Bits23 => {
            (fraction::ns_to_field(ts.nanoseconds, 23) << 1) as i64
        }
        Precision::Microsecond => {
            ((fraction::ns_to_field(ts.nanoseconds, 20) << 4) | 0b001) as i64
        }
        Precision::Bits15 => ((fraction::ns_to_field(ts.nanoseconds, 15) << 9) | 0b011) as i64,
        Precision::Millisecond => {
            ((fraction::ns_to_field(ts.nanoseconds, 10) as i64) << 14) | (offset_field << 3) | 0b101
        }
        p => match p.calendar_code() {
            Some(code) => (offset_field << 13) | ((code as i64) << 3) | 0b111,
            None => return Err(Error::UnencodablePrecision(p)),
        },
    };
    Ok(base | low)
}
