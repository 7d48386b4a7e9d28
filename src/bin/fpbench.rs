//! fpbench — repeated-decode timing over the reference codewords.

use std::hint::black_box;
use std::time::{Duration, Instant};

use flexpoch::decode;

const ROUNDS: u32 = 100_000;

/// Reference codewords covering every accepted layout.
const ACCEPT: [i64; 18] = [
    0x005F_7AFF_4F2A_AAA8, // 23-bit fraction
    0x005F_7AFF_4F5B_BBB1, // microsecond
    0x005F_7AFF_4F40_0003, // 15-bit fraction
    0x005F_7AFF_4F80_2005, // millisecond
    0x005F_7AFF_4F80_21E5, // millisecond, +01:00
    0x005F_7AFF_4F80_1F87, // second
    0x0058_6846_7FFF_E007, // leap second
    0x005F_7AFF_4F00_000F, // minute
    0x005F_7AFF_7F00_0017, // hour
    0x005F_7A88_1F00_001F, // day
    0x0067_7485_8000_0027, // week
    0x005F_7AFF_4F00_002F, // month
    0x005E_43A7_BB00_0037, // quarter
    0x005F_7AFF_4F00_004F, // year
    0x7EFF_FFFF_FF80_001F, // last second below the year format
    0x7F46_9C40_0000_0000, // year 20000.0
    0xD000_0151_8000_0000_u64 as i64, // relative day
    0xA000_0000_0000_002A_u64 as i64, // logical counter
];

/// Codewords every decoder must reject.
const REJECT: [i64; 3] = [
    0x7F3F_8000_0000_0000,            // year 1.0, inside the seconds range
    0x8000_0000_0000_0000_u64 as i64, // reserved nibble
    0x7F03_0000_4200_0000,            // tiny year payload
];

fn time_decode(raw: i64) -> (Duration, bool) {
    let mut accepted = false;
    let start = Instant::now();
    for _ in 0..ROUNDS {
        accepted = decode(black_box(raw)).is_ok();
    }
    (start.elapsed(), black_box(accepted))
}

fn report(raw: i64) {
    let (total, accepted) = time_decode(raw);
    println!(
        "0x{raw:016X}  {:>5} ns/op  {}",
        total.as_nanos() / u128::from(ROUNDS),
        if accepted { "ok" } else { "rejected" }
    );
}

fn main() {
    println!("{ROUNDS} decodes per codeword");
    for &raw in &ACCEPT {
        report(raw);
    }
    println!("-- rejection paths --");
    for &raw in &REJECT {
        report(raw);
    }
}
