//! This library reads the IANA timezone database to give the current time in a region and the
//! offset between two regions, DST included.
//!
//! The database is behind the [`TimezoneDatabase`] trait. Two implementations are provided:
//! - [`ZoneinfoDatabase`] reads the system TZ files (TZif format, <https://www.rfc-editor.org/rfc/rfc8536>),
//!   ```/usr/share/zoneinfo``` by default, including the POSIX TZ rule of their footer
//! - [`BundledDatabase`] uses the database compiled in by ```chrono-tz```
//!
//!```text
//! use tzdiff::{TimeDifferenceCalculator, ZoneinfoDatabase};
//! let calculator = TimeDifferenceCalculator::new(ZoneinfoDatabase::default());
//! println!("{}", calculator.resolve("Europe/Paris").unwrap());
//!```
//!
//!```text
//! 2024-07-01 18:41:44 CEST
//! ```
//!
//! The difference between two zones is always computed from their UTC offsets at the same instant:
//!
//!```text
//! use tzdiff::{BundledDatabase, TimeDifferenceCalculator};
//! let result = TimeDifferenceCalculator::new(BundledDatabase).difference("Asia/Shanghai", "America/New_York");
//! println!("{}", result.time_difference());
//!```
//!
//!```text
//! America/New_York is 12.0 hours behind Asia/Shanghai
//! ```
//!
//! An unknown zone name never interrupts a difference computation: its error message takes the place of its
//! time, and the offset is reported as unavailable.
//!
//! With the **json** feature, a [`TimeDifferenceResult`] can be transformed to a json string with `to_json()`.

use std::{error, fmt};

mod calculator;
mod config;
mod database;
mod input;
pub mod logging;
mod posix;
mod tzif;


pub use calculator::{LocalisedTime, TimeDifferenceCalculator, TimeDifferenceResult, ZoneReport};
pub use config::{Backend, Config};
pub use input::prompt;
pub use database::{
    BundledDatabase, TimezoneDatabase, ZoneRules, ZoneinfoDatabase, DEFAULT_ZONEINFO_DIR,
};
pub use posix::PosixTz;
pub use tzif::{LocalTimeType, Tzif};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TzError {
    // Unknown timezone name
    InvalidTimezone(String),
    // Invalid file format.
    InvalidMagic,
    // Bad utf8 string
    BadUtf8String,
    // Only V2 and later formats are supported
    UnsupportedFormat,
    // Zone file exists but could not be read
    ReadError(String),
    // File ends before the data its header announces
    Truncated,
    // No data matched the request
    NoData,
    // Parsing Error
    ParseError,
    // Invalid POSIX TZ string
    InvalidPosixTz(String),
    // Json conversion error
    JsonError,
}

impl fmt::Display for TzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error: ")?;
        match self {
            TzError::InvalidTimezone(name) => write!(
                f,
                "unknown timezone '{}'. Please use a valid timezone name, e.g. 'Asia/Shanghai'",
                name
            ),
            TzError::InvalidMagic => f.write_str("Invalid TZfile"),
            TzError::BadUtf8String => f.write_str("Bad utf8 string"),
            TzError::UnsupportedFormat => f.write_str("Only V2 and later formats are supported"),
            TzError::ReadError(e) => write!(f, "Could not read TZfile {}", e),
            TzError::Truncated => f.write_str("Truncated TZfile"),
            TzError::NoData => f.write_str("No data matched the request"),
            TzError::ParseError => f.write_str("Parsing error"),
            TzError::InvalidPosixTz(tz) => write!(f, "Invalid POSIX TZ string '{}'", tz),
            TzError::JsonError => f.write_str("Could not convert to json"),
        }
    }
}

impl From<std::num::ParseIntError> for TzError {
    fn from(_e: std::num::ParseIntError) -> TzError {
        TzError::ParseError
    }
}

impl From<std::str::Utf8Error> for TzError {
    fn from(_e: std::str::Utf8Error) -> TzError {
        TzError::BadUtf8String
    }
}

#[cfg(feature = "json")]
impl From<serde_json::error::Error> for TzError {
    fn from(_e: serde_json::error::Error) -> TzError {
        TzError::JsonError
    }
}

impl error::Error for TzError {}
