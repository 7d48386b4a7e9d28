use flexpoch::{decode, encode, iso, Format, Precision, Timestamp};
use proptest::prelude::*;

fn absolute(secs: i64, precision: Precision) -> Timestamp {
    Timestamp {
        format: Format::AbsoluteSeconds,
        seconds: secs,
        precision,
        ..Timestamp::new()
    }
}

proptest! {
    #[test]
    fn unix_seconds_round_trip(secs in -0x1F_0000_0000i64..0x7F_0000_0000) {
        let ts = Timestamp::from_unix(secs).unwrap();
        let back = decode(ts.raw.unwrap()).unwrap();
        prop_assert_eq!(back.seconds, secs);
        prop_assert_eq!(back.precision, Precision::Second);
        prop_assert_eq!(back.to_unix().0, secs);
    }

    #[test]
    fn coarse_layout_keeps_offset_and_class(
        secs in -1_000_000_000i64..4_000_000_000,
        minutes in -1020i16..=1020,
        code in 0u8..=12,
    ) {
        let mut ts = absolute(secs, Precision::from_calendar_code(code).unwrap());
        ts.tz_offset_minutes = minutes;
        let back = decode(encode(&ts).unwrap()).unwrap();
        prop_assert_eq!(back.seconds, secs);
        prop_assert_eq!(back.tz_offset_minutes, minutes);
        prop_assert_eq!(back.precision, ts.precision);
        prop_assert!(!back.is_leap_second);
    }

    #[test]
    fn widest_fraction_round_trips_within_one_step(
        secs in 0i64..4_000_000_000,
        ns in 0u32..1_000_000_000,
    ) {
        let mut ts = absolute(secs, Precision::Bits23);
        ts.nanoseconds = ns;
        let back = decode(encode(&ts).unwrap()).unwrap();
        prop_assert_eq!(back.seconds, secs);
        // a 23-bit step is ~119 ns; both directions round
        prop_assert!(back.nanoseconds.abs_diff(ns) <= 60);
    }

    #[test]
    fn millisecond_layout_stays_within_its_step(ns in 0u32..1_000_000_000) {
        let mut ts = absolute(1_601_896_271, Precision::Millisecond);
        ts.nanoseconds = ns;
        let back = decode(encode(&ts).unwrap()).unwrap();
        // a 10-bit step is ~977 us and the narrowing truncates
        prop_assert!(back.nanoseconds.abs_diff(ns) < 977_000);
        prop_assert_eq!(back.precision, Precision::Millisecond);
    }

    #[test]
    fn logical_counters_round_trip(count in 0i64..(1i64 << 60)) {
        let ts = Timestamp::from_logical(count).unwrap();
        let back = decode(ts.raw.unwrap()).unwrap();
        prop_assert_eq!(back.format, Format::Logical);
        prop_assert_eq!(back.seconds, count);
        prop_assert_eq!(back.to_logical().unwrap(), count);
    }

    #[test]
    fn codewords_of_one_layout_order_like_seconds(
        a in -0x1F_0000_0000i64..0x7F_0000_0000,
        b in -0x1F_0000_0000i64..0x7F_0000_0000,
        code in 0u8..=12,
    ) {
        let precision = Precision::from_calendar_code(code).unwrap();
        let wa = encode(&absolute(a, precision)).unwrap();
        let wb = encode(&absolute(b, precision)).unwrap();
        prop_assert_eq!(a.cmp(&b), wa.cmp(&wb));
    }

    #[test]
    fn second_text_round_trips(secs in 0i64..4_000_000_000) {
        let text = iso::render(&absolute(secs, Precision::Second)).unwrap();
        let back = iso::parse(&text).unwrap();
        prop_assert_eq!(back.seconds, secs);
        prop_assert_eq!(back.precision, Precision::Second);
    }

    #[test]
    fn offset_text_round_trips(
        secs in 0i64..4_000_000_000,
        minutes in -1020i16..=1020,
    ) {
        prop_assume!(minutes != 0);
        let mut ts = absolute(secs, Precision::Second);
        ts.tz_offset_minutes = minutes;
        let text = iso::render(&ts).unwrap();
        let back = iso::parse(&text).unwrap();
        prop_assert_eq!(back.seconds, secs);
        prop_assert_eq!(back.tz_offset_minutes, minutes);
    }

    #[test]
    fn parse_never_panics_on_ascii(input in "[ -~]{0,32}") {
        let _ = iso::parse(&input);
    }

    #[test]
    fn decode_never_panics(raw in any::<i64>()) {
        if let Ok(ts) = decode(raw) {
            // whatever decodes must re-encode or fail cleanly
            let _ = encode(&ts);
        }
    }
}
