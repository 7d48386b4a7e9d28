//! 11-bit UTC offset transcoding.
//!
//! Offsets are stored in minutes with a bias of +1024, i.e. the stored field
//! is the offset XORed with the sign-flip bit 0x400. The field value 0x7FF
//! (decoded 1023) is not a real offset; it marks a leap second. Encodable
//! real offsets are -1020..=+1020 minutes (17 hours), enforced by the
//! codeword encoder rather than here.

/// Width of the offset field.
pub const OFFSET_BITS: u8 = 11;

const FIELD_MASK: u16 = (1 << OFFSET_BITS) - 1;
const SIGN_FLIP: u16 = 1 << (OFFSET_BITS - 1);

/// Decoded offset value reserved for the leap-second marker.
pub const LEAP_SECOND: i16 = 1023;

/// Largest encodable real offset magnitude in minutes.
pub const MAX_OFFSET_MINUTES: i16 = 1020;

/// Converts an offset in minutes (or the leap sentinel) to the stored field.
#[inline]
pub fn to_field(minutes: i16) -> u16 {
    ((minutes as u16) & FIELD_MASK) ^ SIGN_FLIP
}

/// Converts a stored field back to an offset in minutes, sign-extended.
/// Bits above the field width are ignored.
#[inline]
pub fn from_field(field: u16) -> i16 {
    let v = (field & FIELD_MASK) ^ SIGN_FLIP;
    if v & SIGN_FLIP != 0 {
        (v | !FIELD_MASK) as i16
    } else {
        v as i16
    }
}
