//! ISO-8601 text bridge.
//!
//! Parsing tries a fixed list of layout templates from most to least
//! specific and takes the first match; the fraction and UTC offset are then
//! read off the raw text, so a template only has to anchor the date-time
//! fields. Rendering is progressive: the precision class decides how many
//! components appear, from bare millennium digits down to nanoseconds.

use crate::calendar::{week_of_year, CivilDateTime};
use crate::precision::Precision;
use crate::timestamp::{Format, Timestamp};
use crate::{Error, Result};

/// Accepted layouts in match order. `%f` is one or more fraction digits,
/// `%z` a numeric offset, `%W` a week number (read and discarded, as the
/// original strptime-based reader did).
const TEMPLATES: [(&str, Precision); 12] = [
    ("%Y-%m-%dT%H:%M:%S.%f%z", Precision::Second),
    ("%Y-%m-%dT%H:%M:%S.%fZ", Precision::Second),
    ("%Y-%m-%dT%H:%M:%S.%f", Precision::Second),
    ("%Y-%m-%dT%H:%M:%S%z", Precision::Second),
    ("%Y-%m-%dT%H:%M:%SZ", Precision::Second),
    ("%Y-%m-%dT%H:%M:%S", Precision::Second),
    ("%Y-%m-%dT%H:%M", Precision::Minute),
    ("%Y-%m-%dT%H", Precision::Hour),
    ("%Y-%m-%d", Precision::Day),
    ("%Y-W%W", Precision::Week),
    ("%Y-%m", Precision::Month),
    ("%Y", Precision::Year),
];

#[derive(Debug, Clone, Copy)]
struct Fields {
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

/// Reads 1..=`max` decimal digits at `at`.
fn read_number(input: &[u8], at: usize, max: usize) -> Option<(i64, usize)> {
    let mut value: i64 = 0;
    let mut len = 0;
    while len < max {
        match input.get(at + len) {
            Some(b @ b'0'..=b'9') => {
                value = value * 10 + (b - b'0') as i64;
                len += 1;
            }
            _ => break,
        }
    }
    if len == 0 {
        None
    } else {
        Some((value, len))
    }
}

/// Consumes a `+HH:MM` / `+HHMM` / `+HH` style offset, returning the
/// position after it.
fn skip_offset(input: &[u8], at: usize) -> Option<usize> {
    let mut i = at;
    match input.get(i) {
        Some(b'+') | Some(b'-') => i += 1,
        _ => return None,
    }
    match read_number(input, i, 2)? {
        (_, 2) => i += 2,
        _ => return None,
    }
    if input.get(i) == Some(&b':') {
        match read_number(input, i + 1, 2)? {
            (_, 2) => i += 3,
            _ => return None,
        }
    } else if let Some((_, 2)) = read_number(input, i, 2) {
        i += 2;
    }
    Some(i)
}

/// Matches `input` against one template. Trailing input is allowed; the
/// fraction and offset scans pick it up afterwards. Calendar fields outside
/// their ranges fail the match (seconds admit 60 for a leap second), letting
/// a coarser template take over.
fn match_template(input: &[u8], pattern: &[u8]) -> Option<Fields> {
    let mut f = Fields {
        year: 0,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };
    let mut i = 0;
    let mut p = 0;
    while p < pattern.len() {
        if pattern[p] == b'%' {
            p += 1;
            match pattern[p] {
                b'Y' => {
                    let (v, n) = read_number(input, i, 5)?;
                    f.year = v;
                    i += n;
                }
                b'm' => {
                    let (v, n) = read_number(input, i, 2)?;
                    if !(1..=12).contains(&v) {
                        return None;
                    }
                    f.month = v as u8;
                    i += n;
                }
                b'd' => {
                    let (v, n) = read_number(input, i, 2)?;
                    if !(1..=31).contains(&v) {
                        return None;
                    }
                    f.day = v as u8;
                    i += n;
                }
                b'H' => {
                    let (v, n) = read_number(input, i, 2)?;
                    if v > 23 {
                        return None;
                    }
                    f.hour = v as u8;
                    i += n;
                }
                b'M' => {
                    let (v, n) = read_number(input, i, 2)?;
                    if v > 59 {
                        return None;
                    }
                    f.minute = v as u8;
                    i += n;
                }
                b'S' => {
                    let (v, n) = read_number(input, i, 2)?;
                    if v > 60 {
                        return None;
                    }
                    f.second = v as u8;
                    i += n;
                }
                b'W' => {
                    let (v, n) = read_number(input, i, 2)?;
                    if v > 53 {
                        return None;
                    }
                    i += n;
                }
                b'f' => {
                    let digits = input[i.min(input.len())..]
                        .iter()
                        .take_while(|b| b.is_ascii_digit())
                        .count();
                    if digits == 0 {
                        return None;
                    }
                    i += digits;
                }
                b'z' => i = skip_offset(input, i)?,
                _ => return None,
            }
            p += 1;
        } else {
            if input.get(i) != Some(&pattern[p]) {
                return None;
            }
            i += 1;
            p += 1;
        }
    }
    Some(f)
}

/// Parses ISO-8601 text into an absolute time value.
///
/// A seconds field of `60` at the canonical position marks a leap second.
/// Sub-second digit runs pick the precision class by length (1-3 ms, 4-6 us,
/// 7-9 ns) and are right-padded with zeros to that width, so `.5` is half a
/// second. An offset suffix shifts the stored seconds back to UTC and is
/// kept in the offset field.
pub fn parse(input: &str) -> Result<Timestamp> {
    let bytes = input.as_bytes();
    let (mut fields, mut precision) = TEMPLATES
        .iter()
        .find_map(|(pattern, prc)| {
            match_template(bytes, pattern.as_bytes()).map(|f| (f, *prc))
        })
        .ok_or_else(|| Error::InvalidIso(input.to_string()))?;

    let mut ts = Timestamp::new();
    if bytes.get(17..19) == Some(b"60".as_slice()) {
        ts.is_leap_second = true;
        fields.second = 59;
    }
    ts.format = Format::AbsoluteSeconds;
    ts.seconds = CivilDateTime {
        year: fields.year,
        month: fields.month,
        day: fields.day,
        hour: fields.hour,
        minute: fields.minute,
        second: fields.second,
    }
    .to_epoch_seconds();

    if let Some(dot) = bytes.iter().position(|&b| b == b'.') {
        let digits = bytes[dot + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if (1..=9).contains(&digits) {
            let mut value: u64 = 0;
            for &b in &bytes[dot + 1..dot + 1 + digits] {
                value = value * 10 + (b - b'0') as u64;
            }
            let (tier, width, scale) = match digits {
                1..=3 => (Precision::Millisecond, 3, 1_000_000u64),
                4..=6 => (Precision::Microsecond, 6, 1_000),
                _ => (Precision::Nanosecond, 9, 1),
            };
            value *= 10u64.pow((width - digits) as u32);
            ts.nanoseconds = (value * scale) as u32;
            precision = tier;
        }
    }

    let plus = bytes.iter().rposition(|&b| b == b'+');
    let minus = match bytes.get(16..) {
        Some(tail) => tail.iter().rposition(|&b| b == b'-').map(|i| i + 16),
        None => None,
    };
    if let Some(at) = plus.or(minus) {
        let sign: i16 = if bytes[at] == b'-' { -1 } else { 1 };
        let hours = match read_number(bytes, at + 1, 2) {
            Some((v, 2)) => v as i16,
            _ => return Err(Error::InvalidIso(input.to_string())),
        };
        let mut i = at + 3;
        if bytes.get(i) == Some(&b':') {
            i += 1;
        }
        let minutes = match read_number(bytes, i, 2) {
            Some((v, 2)) => v as i16,
            _ => 0,
        };
        let offset = sign * (hours * 60 + minutes);
        ts.tz_offset_minutes = offset;
        ts.seconds -= offset as i64 * 60;
    }

    ts.precision = precision;
    Ok(ts)
}

/// Renders a time value as ISO-8601 text.
///
/// Bare years print as `{year}.0`; relative values print as durations.
/// Absolute values print the components their precision class calls for,
/// in local time when an offset is stored, with `Z` only on offset-free
/// values of at least hour resolution.
pub fn render(ts: &Timestamp) -> Result<String> {
    if let Some(year) = ts.year {
        if year != 0.0 {
            return Ok(format!("{year:.1}"));
        }
    }
    if ts.format == Format::RelativeSeconds {
        return render_duration(ts);
    }
    let p = ts.precision;
    let local = ts.seconds + ts.tz_offset_minutes as i64 * 60;
    let mut c = CivilDateTime::from_epoch_seconds(local);
    if ts.is_leap_second && (c.hour, c.minute, c.second) == (23, 59, 59) {
        c.second = 60;
    }

    let mut out = String::new();
    match p {
        Precision::Millennium => out.push_str(&format!("{}xxx", c.year.div_euclid(1000))),
        Precision::Century => out.push_str(&format!("{:02}xx", c.year.div_euclid(100))),
        Precision::Decade => out.push_str(&format!("{:03}x", c.year.div_euclid(10))),
        _ => {}
    }
    if p <= Precision::Year {
        out.push_str(&format!("{:04}", c.year));
    }
    if p == Precision::Quarter {
        out.push_str(&format!("-Q{}", (c.month - 1) / 3 + 1));
    }
    if p <= Precision::Month && p != Precision::Week {
        out.push_str(&format!("-{:02}", c.month));
    }
    if p == Precision::Week {
        out.push_str(&format!("-W{:02}", week_of_year(c.year, c.month, c.day)));
    }
    if p <= Precision::Day {
        out.push_str(&format!("-{:02}", c.day));
    }
    if p <= Precision::Hour {
        out.push_str(&format!("T{:02}", c.hour));
    }
    if p <= Precision::Minute {
        out.push_str(&format!(":{:02}", c.minute));
    }
    if p <= Precision::Second {
        out.push_str(&format!(":{:02}", c.second));
    }
    match p {
        Precision::Millisecond => {
            out.push_str(&format!(".{:03}", (ts.nanoseconds + 500_000) / 1_000_000));
        }
        Precision::Bits15 | Precision::Microsecond => {
            out.push_str(&format!(".{:06}", (ts.nanoseconds + 500) / 1_000));
        }
        Precision::Bits23 | Precision::Nanosecond => {
            out.push_str(&format!(".{:09}", ts.nanoseconds));
        }
        _ => {}
    }
    if ts.tz_offset_minutes != 0 {
        let sign = if ts.tz_offset_minutes < 0 { '-' } else { '+' };
        let mag = ts.tz_offset_minutes.unsigned_abs();
        out.push_str(&format!("{sign}{:02}:{:02}", mag / 60, mag % 60));
    } else if p <= Precision::Hour {
        out.push('Z');
    }
    if ts.is_dst {
        out.push_str(" DST");
    }
    Ok(out)
}

fn render_duration(ts: &Timestamp) -> Result<String> {
    let p = ts.precision;
    if p <= Precision::Second {
        let s = match p {
            Precision::Millisecond => format!(
                "PT{}.{:03}S",
                ts.seconds,
                (ts.nanoseconds + 500_000) / 1_000_000
            ),
            Precision::Bits15 | Precision::Microsecond => {
                format!("PT{}.{:06}S", ts.seconds, (ts.nanoseconds + 500) / 1_000)
            }
            Precision::Bits23 | Precision::Nanosecond => {
                format!("PT{}.{:09}S", ts.seconds, ts.nanoseconds)
            }
            _ => format!("PT{}S", ts.seconds),
        };
        return Ok(s);
    }
    let unit = p.unit_seconds().ok_or(Error::UnencodablePrecision(p))?;
    let symbol = p.unit_symbol().ok_or(Error::UnencodablePrecision(p))?;
    let value = ts.seconds / unit;
    if p <= Precision::Hour {
        Ok(format!("PT{value}{symbol}"))
    } else {
        Ok(format!("P{value}{symbol}"))
    }
}
