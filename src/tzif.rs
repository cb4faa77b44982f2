//! TZif reader (<https://www.rfc-editor.org/rfc/rfc8536>), versions 2 to 4.
//!
//! Only the 64-bit data block is kept. The 32-bit v1 block is skipped, as are
//! leap second records and the standard/wall and UT/local indicators, which
//! are not needed to find the local time type in effect at an instant.

use crate::posix::PosixTz;
use crate::TzError;
use byteorder::{ByteOrder, BE};
use std::fs;
use std::io;
use std::ops::Range;
use std::path::Path;
use std::str::from_utf8;

// TZif magic four bytes
const MAGIC: u32 = 0x545A6966;
// Header length
const HEADER_LEN: usize = 0x2C;
// Offsets must fit in a chrono FixedOffset
const MAX_UTC_OFFSET: i32 = 86_399;

/// One local time type (the `ttinfo` record of a TZif file): UTC offset in
/// seconds east of UTC, daylight saving flag, abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTimeType {
    utc_offset: i32,
    isdst: bool,
    abbreviation: String,
}

impl LocalTimeType {
    pub fn new(utc_offset: i32, isdst: bool, abbreviation: impl Into<String>) -> Self {
        LocalTimeType {
            utc_offset,
            isdst,
            abbreviation: abbreviation.into(),
        }
    }

    /// Offset to UTC, in seconds (east is positive)
    pub fn utc_offset(&self) -> i32 {
        self.utc_offset
    }

    pub fn is_dst(&self) -> bool {
        self.isdst
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }
}

#[derive(Debug, PartialEq)]
struct Header {
    tzh_ttisutcnt: usize,
    tzh_ttisstdcnt: usize,
    tzh_leapcnt: usize,
    tzh_timecnt: usize,
    tzh_typecnt: usize,
    tzh_charcnt: usize,
    v2_header_start: usize,
}

/// Parsed content of a TZif file.
#[derive(Debug, Clone, PartialEq)]
pub struct Tzif {
    transition_times: Vec<i64>,
    transition_types: Vec<u8>,
    local_time_types: Vec<LocalTimeType>,
    footer: Option<PosixTz>,
}

fn field(buffer: &[u8], range: Range<usize>) -> Result<&[u8], TzError> {
    buffer.get(range).ok_or(TzError::Truncated)
}

fn count(buffer: &[u8], at: usize) -> Result<usize, TzError> {
    Ok(BE::read_u32(field(buffer, at..at + 4)?) as usize)
}

// Missing paths (or paths through a file) and directories are not zones;
// anything else is a real read failure
pub(crate) fn read_error(path: &Path, e: io::Error) -> TzError {
    if e.kind() == io::ErrorKind::NotFound || !path.exists() || path.is_dir() {
        TzError::InvalidTimezone(path.to_string_lossy().into_owned())
    } else {
        TzError::ReadError(format!("{}: {}", path.display(), e))
    }
}

impl Tzif {
    /// Reads and parses a TZif file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Tzif, TzError> {
        let path = path.as_ref();
        let buf = fs::read(path).map_err(|e| read_error(path, e))?;
        Tzif::parse(&buf)
    }

    /// Parses TZif data already in memory.
    pub fn parse(buffer: &[u8]) -> Result<Tzif, TzError> {
        // Parses TZfile header
        let header = Tzif::parse_header(buffer)?;
        // Parses data
        Tzif::parse_data(buffer, header)
    }

    fn parse_header(buffer: &[u8]) -> Result<Header, TzError> {
        let magic = buffer.get(0x00..0x04).map(BE::read_u32);
        if magic != Some(MAGIC) {
            return Err(TzError::InvalidMagic);
        }
        if buffer.len() < HEADER_LEN {
            return Err(TzError::Truncated);
        }
        if !(b'2'..=b'4').contains(&buffer[4]) {
            return Err(TzError::UnsupportedFormat);
        }
        let tzh_ttisutcnt = count(buffer, 0x14)?;
        let tzh_ttisstdcnt = count(buffer, 0x18)?;
        let tzh_leapcnt = count(buffer, 0x1C)?;
        let tzh_timecnt = count(buffer, 0x20)?;
        let tzh_typecnt = count(buffer, 0x24)?;
        let tzh_charcnt = count(buffer, 0x28)?;
        // V2 format header start, right after the v1 data block
        let s: usize = tzh_timecnt * 5
            + tzh_typecnt * 6
            + tzh_leapcnt * 8
            + tzh_charcnt
            + tzh_ttisstdcnt
            + tzh_ttisutcnt
            + HEADER_LEN;
        if field(buffer, s..s + 4).map(BE::read_u32)? != MAGIC {
            return Err(TzError::InvalidMagic);
        }
        Ok(Header {
            tzh_ttisutcnt: count(buffer, s + 0x14)?,
            tzh_ttisstdcnt: count(buffer, s + 0x18)?,
            tzh_leapcnt: count(buffer, s + 0x1C)?,
            tzh_timecnt: count(buffer, s + 0x20)?,
            tzh_typecnt: count(buffer, s + 0x24)?,
            tzh_charcnt: count(buffer, s + 0x28)?,
            v2_header_start: s,
        })
    }

    fn parse_data(buffer: &[u8], header: Header) -> Result<Tzif, TzError> {
        if header.tzh_typecnt == 0 {
            return Err(TzError::NoData);
        }

        // Calculates fields lengths and indexes (Version 2 format)
        let tzh_timecnt_start: usize = HEADER_LEN + header.v2_header_start;
        let tzh_indices_start: usize = tzh_timecnt_start + header.tzh_timecnt * 8;
        let tzh_timecnt_end: usize = tzh_timecnt_start + header.tzh_timecnt * 9;
        let tzh_typecnt_end: usize = tzh_timecnt_end + header.tzh_typecnt * 6;
        let tzh_charcnt_end: usize = tzh_typecnt_end + header.tzh_charcnt;
        let footer_start: usize = tzh_charcnt_end
            + header.tzh_leapcnt * 12
            + header.tzh_ttisstdcnt
            + header.tzh_ttisutcnt;

        // Extracting data fields
        let transition_times: Vec<i64> = field(buffer, tzh_timecnt_start..tzh_indices_start)?
            .chunks_exact(8)
            .map(BE::read_i64)
            .collect();

        let transition_types = field(buffer, tzh_indices_start..tzh_timecnt_end)?.to_vec();
        if transition_types
            .iter()
            .any(|&i| i as usize >= header.tzh_typecnt)
        {
            return Err(TzError::ParseError);
        }

        let abbrs = field(buffer, tzh_typecnt_end..tzh_charcnt_end)?;

        let local_time_types = field(buffer, tzh_timecnt_end..tzh_typecnt_end)?
            .chunks_exact(6)
            .map(|tti| {
                let utc_offset = BE::read_i32(&tti[0..4]);
                if !(-MAX_UTC_OFFSET..=MAX_UTC_OFFSET).contains(&utc_offset) {
                    return Err(TzError::ParseError);
                }
                // Abbreviation runs from its index up to the next NUL
                let abbr = abbrs.get(tti[5] as usize..).ok_or(TzError::ParseError)?;
                let len = abbr.iter().position(|&c| c == 0).unwrap_or(abbr.len());
                Ok(LocalTimeType {
                    utc_offset,
                    isdst: tti[4] == 1,
                    abbreviation: from_utf8(&abbr[..len])?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, TzError>>()?;

        let footer = Tzif::parse_footer(buffer.get(footer_start..).unwrap_or_default())?;

        Ok(Tzif {
            transition_times,
            transition_types,
            local_time_types,
            footer,
        })
    }

    // Footer is "\n<TZ string>\n"; an empty TZ string means no rule
    fn parse_footer(buffer: &[u8]) -> Result<Option<PosixTz>, TzError> {
        if buffer.first() != Some(&b'\n') {
            return Ok(None);
        }
        let end = buffer[1..]
            .iter()
            .position(|&c| c == b'\n')
            .ok_or(TzError::Truncated)?;
        let tz = from_utf8(&buffer[1..=end])?;
        if tz.is_empty() {
            return Ok(None);
        }
        PosixTz::parse(tz).map(Some)
    }

    /// Transition times, in seconds since the epoch
    pub fn transition_times(&self) -> &[i64] {
        &self.transition_times
    }

    pub fn local_time_types(&self) -> &[LocalTimeType] {
        &self.local_time_types
    }

    /// Rule applying after the last transition, if the file has one
    pub fn footer(&self) -> Option<&PosixTz> {
        self.footer.as_ref()
    }

    /// Returns the local time type in effect at `timestamp` (seconds since the epoch).
    pub fn local_time_type_at(&self, timestamp: i64) -> LocalTimeType {
        let after_last = self
            .transition_times
            .last()
            .map_or(true, |&last| timestamp >= last);
        if after_last {
            if let Some(footer) = &self.footer {
                return footer.local_time_type_at(timestamp);
            }
        }
        // Before the first transition, type 0 applies
        let idx = self.transition_times.partition_point(|&t| t <= timestamp);
        let ty = match idx {
            0 => 0,
            _ => self.transition_types[idx - 1] as usize,
        };
        self.local_time_types[ty].clone()
    }
}
