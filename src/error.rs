//! Central error types for the flexpoch codec.

use core::fmt;

use crate::precision::Precision;

/// All error conditions raised by the codec and the text bridge.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The top byte of a codeword matches no known format.
    InvalidLeadingByte(u8),
    /// The codeword uses a reserved format nibble (top bits `100`).
    ReservedFormat,
    /// The codeword is a custom format; an external decoder is required.
    CustomFormat,
    /// The high-resolution relative-fraction format is defined but not
    /// implemented; only its header is recognized.
    UnimplementedRelativeFraction,
    /// A year codeword carries non-zero bits below the float payload.
    NonZeroTrailingBits,
    /// A year value falls inside the seconds-representable range (or an
    /// absolute-year codeword stores such a year).
    YearOutOfRange(f32),
    /// A second-or-coarser codeword carries an undefined 4-bit precision code.
    InvalidPrecisionCode(u8),
    /// The precision class has no wire representation in the requested layout.
    UnencodablePrecision(Precision),
    /// A UTC offset lies outside the encodable +-1020 minutes.
    OffsetOutOfRange(i16),
    /// A leap second cannot be combined with a non-zero UTC offset; the
    /// offset field holds the leap sentinel.
    OffsetAndLeapSecond,
    /// An input value lies outside the encodable range of its format.
    ValueOutOfRange(i64),
    /// The stored value cannot be emitted in the requested output form
    /// (e.g. a wall-clock timestamp as a logical counter).
    IncompatibleOutput,
    /// The text input matched none of the accepted ISO-8601 shapes.
    InvalidIso(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLeadingByte(b) => write!(f, "invalid leading byte 0x{b:02X}"),
            Self::ReservedFormat => write!(f, "reserved format nibble"),
            Self::CustomFormat => write!(f, "custom format requires an external decoder"),
            Self::UnimplementedRelativeFraction => {
                write!(f, "relative-fraction format is not implemented")
            }
            Self::NonZeroTrailingBits => write!(f, "non-zero bits after year payload"),
            Self::YearOutOfRange(y) => {
                write!(f, "year {y} is inside the seconds-representable range")
            }
            Self::InvalidPrecisionCode(code) => write!(f, "invalid precision code {code}"),
            Self::UnencodablePrecision(p) => write!(f, "precision {p:?} is not encodable here"),
            Self::OffsetOutOfRange(min) => {
                write!(f, "UTC offset {min} min outside +-1020 min")
            }
            Self::OffsetAndLeapSecond => {
                write!(f, "leap second cannot carry a non-zero UTC offset")
            }
            Self::ValueOutOfRange(v) => write!(f, "value {v} outside the encodable range"),
            Self::IncompatibleOutput => write!(f, "stored value incompatible with output form"),
            Self::InvalidIso(s) => write!(f, "unrecognized ISO-8601 text '{s}'"),
        }
    }
}

impl std::error::Error for Error {}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
