//! Sub-second fraction rescaling.
//!
//! Sub-second codeword layouts store the fraction of a second as an unsigned
//! binary fraction of at most 23 bits (units of 2^-23 s). Narrower layouts
//! (20, 15 and 10 bits) keep the most significant bits of the 23-bit value.
//! Conversion to and from nanoseconds rounds half away from zero.

/// Width of the widest fraction field.
pub const FRACTION_BITS: u8 = 23;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Converts nanoseconds (0..10^9) to a 23-bit binary fraction.
///
/// The rounded result for 999 999 999 ns would be exactly 2^23, one past the
/// field; it is clamped to the all-ones fraction instead.
#[inline]
pub fn ns_to_frac(ns: u32) -> u32 {
    debug_assert!((ns as u64) < NANOS_PER_SECOND, "ns out of range: {ns}");
    let frac = (((ns as u64) << FRACTION_BITS) + NANOS_PER_SECOND / 2) / NANOS_PER_SECOND;
    frac.min((1 << FRACTION_BITS) - 1) as u32
}

/// Converts a 23-bit binary fraction back to nanoseconds.
#[inline]
pub fn frac_to_ns(frac: u32) -> u32 {
    debug_assert!(frac < 1 << FRACTION_BITS, "fraction out of range: {frac:#x}");
    (((frac as u64) * NANOS_PER_SECOND + (1 << (FRACTION_BITS - 1))) >> FRACTION_BITS) as u32
}

/// Converts nanoseconds to a fraction field of `bits` width (the top `bits`
/// of the 23-bit fraction).
///
/// # Panics
///
/// Panics if `bits > 23`.
#[inline]
pub fn ns_to_field(ns: u32, bits: u8) -> u32 {
    assert!(bits <= FRACTION_BITS, "field width must be 0..=23, got {bits}");
    ns_to_frac(ns) >> (FRACTION_BITS - bits)
}

/// Converts a fraction field of `bits` width back to nanoseconds.
///
/// # Panics
///
/// Panics if `bits > 23`.
#[inline]
pub fn field_to_ns(field: u32, bits: u8) -> u32 {
    assert!(bits <= FRACTION_BITS, "field width must be 0..=23, got {bits}");
    frac_to_ns(field << (FRACTION_BITS - bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero() {
        assert_eq!(ns_to_frac(0), 0);
        assert_eq!(frac_to_ns(0), 0);
    }

    #[test]
    fn half_second_is_half_field() {
        assert_eq!(ns_to_frac(500_000_000), 1 << 22);
        assert_eq!(frac_to_ns(1 << 22), 500_000_000);
    }

    #[test]
    fn max_ns_clamps_to_all_ones() {
        let frac = ns_to_frac(999_999_999);
        assert_eq!(frac, (1 << 23) - 1);
        // and stays in range on the way back
        assert!(frac_to_ns(frac) < 1_000_000_000);
    }

    #[test]
    fn known_fraction_value() {
        // 0x155554 / 2^23 of a second
        assert_eq!(frac_to_ns(0x15_5554), 166_666_508);
    }

    #[test]
    fn round_trip_error_within_one_step() {
        // one 23-bit step is ~119.2 ns
        for ns in [1u32, 119, 120, 1_000, 123_456_789, 999_999_998] {
            let back = frac_to_ns(ns_to_frac(ns));
            let diff = back.abs_diff(ns);
            assert!(diff <= 60, "ns {ns} came back as {back}");
        }
    }

    #[test]
    fn narrower_fields_drop_low_bits() {
        let ns = 500_000_000;
        assert_eq!(ns_to_field(ns, 23), 1 << 22);
        assert_eq!(ns_to_field(ns, 20), 1 << 19);
        assert_eq!(ns_to_field(ns, 15), 1 << 14);
        assert_eq!(ns_to_field(ns, 10), 1 << 9);
        for bits in [10u8, 15, 20, 23] {
            assert_eq!(field_to_ns(ns_to_field(ns, bits), bits), ns);
        }
    }

    #[test]
    fn ten_bit_resolution() {
        // one 10-bit step is ~976.6 us
        let field = ns_to_field(1_000_000, 10);
        assert_eq!(field, 1);
        assert_eq!(field_to_ns(1, 10), 976_563);
    }

    #[test]
    #[should_panic(expected = "field width must be 0..=23")]
    fn too_wide_field_panics() {
        ns_to_field(0, 24);
    }
}
