//! flexpoch: a compact 64-bit binary time encoding.
//!
//! A codeword packs an instant, a duration or a logical counter into one
//! signed 64-bit integer. Depending on the format, a codeword carries epoch
//! seconds with one of five sub-second layouts (down to ~119 ns), a UTC
//! offset in minutes, a leap-second marker, a 4-bit coarse precision class
//! (second up to millennium), a bare `f32` year for deep time, or a 60-bit
//! logical counter. Codewords of the same layout compare like the instants
//! they encode.
//!
//! ```
//! use flexpoch::{decode, iso};
//!
//! let ts = decode(0x0067_E66C_3200_0000)?;
//! assert_eq!(iso::render(&ts)?, "2025-03-28T09:30:26.000000000Z");
//!
//! let back = flexpoch::encode(&ts)?;
//! assert_eq!(back, 0x0067_E66C_3200_0000);
//! # Ok::<(), flexpoch::Error>(())
//! ```

pub mod calendar;
pub mod codeword;
pub mod error;
pub mod fraction;
pub mod iso;
pub mod precision;
pub mod timestamp;
pub mod tz_offset;

pub use codeword::{decode, encode};
pub use error::{Error, Result};
pub use precision::Precision;
pub use timestamp::{Format, Timestamp, UnixFidelity};
