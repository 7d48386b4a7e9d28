//! fp CLI — codeword <-> ISO-8601/Unix/logical conversion.

use clap::{Parser, ValueEnum};
use flexpoch::{iso, Timestamp, UnixFidelity};
use std::process;

#[derive(Parser)]
#[command(
    name = "fp",
    version,
    about = "flexpoch codeword <-> ISO-8601/Unix/logical conversion"
)]
struct Cli {
    /// Value to convert; current local time when omitted
    value: Option<String>,

    /// Input format (guessed from the value's shape when omitted)
    #[arg(long, value_enum)]
    from: Option<Fmt>,

    /// Output format (defaults per input format)
    #[arg(long, value_enum)]
    to: Option<Fmt>,

    /// Emit a JSON object instead of a bare value
    #[arg(long)]
    json: bool,

    /// Dump the decoded components to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Fmt {
    /// 64-bit codeword in hex
    Fp,
    /// ISO-8601 text
    Iso,
    /// Unix epoch seconds
    Unix,
    /// Logical counter
    Logical,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let (ts, default_to) = match cli.value.as_deref() {
        Some(value) => {
            let from = cli
                .from
                .or_else(|| guess_format(value))
                .ok_or_else(|| format!("cannot guess the input format of '{value}'"))?;
            (read_value(value, from)?, default_output(from, value))
        }
        None => (local_now(), Fmt::Fp),
    };
    if cli.verbose {
        print_components(&ts);
    }
    let line = write_value(&ts, cli.to.unwrap_or(default_to), cli.json)?;
    println!("{line}");
    Ok(())
}

/// Input-format heuristics: an 18-char `0x` literal is a codeword, a `-` at
/// index 4 means ISO text, a plain integer means Unix seconds.
fn guess_format(value: &str) -> Option<Fmt> {
    if value.len() == 18 && (value.starts_with("0x") || value.starts_with("0X")) {
        Some(Fmt::Fp)
    } else if value.len() > 5 && value.as_bytes()[4] == b'-' {
        Some(Fmt::Iso)
    } else if value.parse::<i64>().is_ok() {
        Some(Fmt::Unix)
    } else {
        None
    }
}

/// Codewords print as ISO by default (logical counters as their count);
/// everything else prints as a codeword.
fn default_output(from: Fmt, value: &str) -> Fmt {
    match from {
        Fmt::Fp if matches!(value.get(2..3), Some("A") | Some("a")) => Fmt::Logical,
        Fmt::Fp => Fmt::Iso,
        _ => Fmt::Fp,
    }
}

fn parse_codeword(value: &str) -> Result<i64, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16)
        .map(|v| v as i64)
        .map_err(|_| format!("'{value}' is not a hex codeword"))
}

fn parse_int(value: &str) -> Result<i64, String> {
    value
        .parse()
        .map_err(|_| format!("'{value}' is not an integer"))
}

fn read_value(value: &str, from: Fmt) -> Result<Timestamp, String> {
    let ts = match from {
        Fmt::Fp => flexpoch::decode(parse_codeword(value)?),
        Fmt::Iso => iso::parse(value),
        Fmt::Unix => Timestamp::from_unix(parse_int(value)?),
        Fmt::Logical => Timestamp::from_logical(parse_int(value)?),
    };
    ts.map_err(|e| e.to_string())
}

fn write_value(ts: &Timestamp, to: Fmt, as_json: bool) -> Result<String, String> {
    use serde_json::Value;

    let (key, value) = match to {
        Fmt::Fp => {
            let raw = flexpoch::encode(ts).map_err(|e| e.to_string())?;
            ("fp", Value::String(format!("0x{raw:016X}")))
        }
        Fmt::Iso => (
            "iso",
            Value::String(iso::render(ts).map_err(|e| e.to_string())?),
        ),
        Fmt::Unix => {
            let (secs, fidelity) = ts.to_unix();
            if fidelity != UnixFidelity::Exact {
                eprintln!("note: {}", fidelity_note(fidelity));
            }
            ("unix", Value::from(secs))
        }
        Fmt::Logical => (
            "logical",
            Value::from(ts.to_logical().map_err(|e| e.to_string())?),
        ),
    };
    if as_json {
        let obj: serde_json::Map<String, Value> =
            [(key.to_string(), value)].into_iter().collect();
        Ok(Value::Object(obj).to_string())
    } else {
        Ok(match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }
}

fn fidelity_note(fidelity: UnixFidelity) -> String {
    match fidelity {
        UnixFidelity::Exact => String::new(),
        UnixFidelity::LeapSecondDropped => {
            "leap second folded into the preceding second".to_string()
        }
        UnixFidelity::OffsetDropped => "UTC offset dropped".to_string(),
        UnixFidelity::SubsecondTruncated(p) => {
            format!("sub-second part ({p:?}) truncated")
        }
    }
}

fn print_components(ts: &Timestamp) {
    eprintln!("format:      {:?}", ts.format);
    eprintln!("seconds:     {}", ts.seconds);
    eprintln!("nanoseconds: {}", ts.nanoseconds);
    eprintln!("precision:   {:?}", ts.precision);
    eprintln!("utc offset:  {} min", ts.tz_offset_minutes);
    eprintln!("leap second: {}", ts.is_leap_second);
    if let Some(year) = ts.year {
        eprintln!("year:        {year}");
    }
    if let Some(raw) = ts.raw {
        eprintln!("codeword:    0x{raw:016X}");
    }
}

/// Current local time at millisecond precision with the system UTC offset.
fn local_now() -> Timestamp {
    let mut ts = Timestamp::now();
    ts.tz_offset_minutes = platform::utc_offset_minutes();
    ts.is_dst = platform::is_dst();
    ts
}

#[cfg(unix)]
mod platform {
    use std::os::raw::{c_char, c_int, c_long};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[repr(C)]
    struct Tm {
        tm_sec: c_int,
        tm_min: c_int,
        tm_hour: c_int,
        tm_mday: c_int,
        tm_mon: c_int,
        tm_year: c_int,
        tm_wday: c_int,
        tm_yday: c_int,
        tm_isdst: c_int,
        tm_gmtoff: c_long,
        tm_zone: *const c_char,
    }

    extern "C" {
        fn localtime_r(t: *const i64, result: *mut Tm) -> *mut Tm;
    }

    fn local_tm() -> Option<Tm> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        let mut tm: Tm = unsafe { std::mem::zeroed() };
        let res = unsafe { localtime_r(&now, &mut tm) };
        if res.is_null() {
            None
        } else {
            Some(tm)
        }
    }

    /// Minutes east of UTC for the current local time, 0 if unavailable.
    pub fn utc_offset_minutes() -> i16 {
        local_tm().map_or(0, |tm| (tm.tm_gmtoff / 60) as i16)
    }

    pub fn is_dst() -> bool {
        local_tm().is_some_and(|tm| tm.tm_isdst > 0)
    }
}

#[cfg(not(unix))]
mod platform {
    pub fn utc_offset_minutes() -> i16 {
        0
    }

    pub fn is_dst() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("CLI parse failed")
    }

    #[test]
    fn flags_parse() {
        let cli = parse_cli(&["fp", "--from", "iso", "--to", "fp", "--json", "-v", "2025"]);
        assert_eq!(cli.from, Some(Fmt::Iso));
        assert_eq!(cli.to, Some(Fmt::Fp));
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.value.as_deref(), Some("2025"));
    }

    #[test]
    fn no_value_is_accepted() {
        let cli = parse_cli(&["fp"]);
        assert!(cli.value.is_none());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["fp", "--from", "hex", "1"]).is_err());
    }

    #[test]
    fn guesses_codeword_from_hex_literal() {
        assert_eq!(guess_format("0x0067E66C32000000"), Some(Fmt::Fp));
        assert_eq!(guess_format("0X0067E66C32000000"), Some(Fmt::Fp));
        // wrong length is not a codeword
        assert_eq!(guess_format("0x0067E66C"), None);
    }

    #[test]
    fn guesses_iso_from_date_shape() {
        assert_eq!(guess_format("2025-03-28"), Some(Fmt::Iso));
        assert_eq!(guess_format("2025-03-28T09:30:26Z"), Some(Fmt::Iso));
    }

    #[test]
    fn guesses_unix_from_integer() {
        assert_eq!(guess_format("1743154226"), Some(Fmt::Unix));
        assert_eq!(guess_format("-120"), Some(Fmt::Unix));
    }

    #[test]
    fn logical_codewords_default_to_counter_output() {
        assert_eq!(
            default_output(Fmt::Fp, "0xA00000000000002A"),
            Fmt::Logical
        );
        assert_eq!(default_output(Fmt::Fp, "0x0067E66C32000000"), Fmt::Iso);
        assert_eq!(default_output(Fmt::Iso, "2025-03-28"), Fmt::Fp);
        assert_eq!(default_output(Fmt::Unix, "12345"), Fmt::Fp);
    }

    #[test]
    fn codeword_literal_round_trips() {
        let ts = read_value("0x0067E66C32000000", Fmt::Fp).unwrap();
        let out = write_value(&ts, Fmt::Iso, false).unwrap();
        assert_eq!(out, "2025-03-28T09:30:26.000000000Z");
        let back = write_value(&ts, Fmt::Fp, false).unwrap();
        assert_eq!(back, "0x0067E66C32000000");
    }

    #[test]
    fn json_output_wraps_single_key() {
        let ts = read_value("42", Fmt::Logical).unwrap();
        let out = write_value(&ts, Fmt::Logical, true).unwrap();
        assert_eq!(out, r#"{"logical":42}"#);
    }

    #[test]
    fn unix_output_of_codeword() {
        let ts = read_value("0x0067E66C32000000", Fmt::Fp).unwrap();
        let out = write_value(&ts, Fmt::Unix, false).unwrap();
        assert_eq!(out, "1743154226");
    }
}
