//! POSIX TZ strings, as found in the footer of TZif files.
//!
//! ```text
//! std offset [dst [offset] [,start[/time],end[/time]]]
//! ```
//!
//! e.g. `CET-1CEST,M3.5.0,M10.5.0/3` or `<+0545>-5:45`.

use crate::tzif::LocalTimeType;
use crate::TzError;
use chrono::{Datelike, NaiveDate};

// NaiveDate::from_ymd(1970, 1, 1).num_days_from_ce()
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
const SECONDS_PER_DAY: i64 = 86_400;
const DEFAULT_RULE_TIME: i32 = 2 * 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Designation {
    abbreviation: String,
    utc_offset: i32,
}

/// Day of year a DST transition happens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleDay {
    /// `Jn`: 1 to 365, February 29 is never counted
    Julian1(u16),
    /// `n`: 0 to 365, February 29 is counted
    Julian0(u16),
    /// `Mm.w.d`: day `d` (0 = Sunday) of week `w` (5 = last) of month `m`
    MonthWeekDay { month: u8, week: u8, weekday: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DstRule {
    dst: Designation,
    start: RuleDay,
    start_time: i32,
    end: RuleDay,
    end_time: i32,
}

/// A parsed POSIX TZ rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixTz {
    std: Designation,
    dst: Option<DstRule>,
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self) -> TzError {
        TzError::InvalidPosixTz(self.input.to_string())
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: u8) -> Result<(), TzError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn take_while<F: Fn(u8) -> bool>(&mut self, f: F) -> &'a str {
        let start = self.pos;
        while self.peek().map_or(false, &f) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn number(&mut self, max_digits: usize) -> Result<i32, TzError> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() || digits.len() > max_digits {
            return Err(self.error());
        }
        Ok(digits.parse()?)
    }

    fn name(&mut self) -> Result<String, TzError> {
        let name = if self.eat(b'<') {
            let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'+' || c == b'-');
            self.expect(b'>')?;
            name
        } else {
            self.take_while(|c| c.is_ascii_alphabetic())
        };
        if name.len() < 3 {
            return Err(self.error());
        }
        Ok(name.to_string())
    }

    // [+-]hh[:mm[:ss]], in seconds
    fn hms(&mut self, max_hours: i32) -> Result<i32, TzError> {
        let sign = if self.eat(b'-') {
            -1
        } else {
            self.eat(b'+');
            1
        };
        let hours = self.number(3)?;
        let mut minutes = 0;
        let mut seconds = 0;
        if self.eat(b':') {
            minutes = self.number(2)?;
            if self.eat(b':') {
                seconds = self.number(2)?;
            }
        }
        if hours > max_hours || minutes > 59 || seconds > 59 {
            return Err(self.error());
        }
        Ok(sign * (hours * 3600 + minutes * 60 + seconds))
    }

    // POSIX offsets count hours west of Greenwich
    fn utc_offset(&mut self) -> Result<i32, TzError> {
        Ok(-self.hms(24)?)
    }

    fn rule_day(&mut self) -> Result<RuleDay, TzError> {
        if self.eat(b'J') {
            let day = self.number(3)?;
            if !(1..=365).contains(&day) {
                return Err(self.error());
            }
            Ok(RuleDay::Julian1(day as u16))
        } else if self.eat(b'M') {
            let month = self.number(2)?;
            self.expect(b'.')?;
            let week = self.number(1)?;
            self.expect(b'.')?;
            let weekday = self.number(1)?;
            if !(1..=12).contains(&month) || !(1..=5).contains(&week) || weekday > 6 {
                return Err(self.error());
            }
            Ok(RuleDay::MonthWeekDay {
                month: month as u8,
                week: week as u8,
                weekday: weekday as u8,
            })
        } else {
            let day = self.number(3)?;
            if day > 365 {
                return Err(self.error());
            }
            Ok(RuleDay::Julian0(day as u16))
        }
    }

    fn rule_time(&mut self) -> Result<i32, TzError> {
        if self.eat(b'/') {
            self.hms(167)
        } else {
            Ok(DEFAULT_RULE_TIME)
        }
    }
}

impl PosixTz {
    pub fn parse(input: &str) -> Result<PosixTz, TzError> {
        let mut p = Parser::new(input);
        let std = Designation {
            abbreviation: p.name()?,
            utc_offset: p.utc_offset()?,
        };
        if p.at_end() {
            return Ok(PosixTz { std, dst: None });
        }

        let abbreviation = p.name()?;
        let utc_offset = match p.peek() {
            None | Some(b',') => std.utc_offset + 3600,
            Some(_) => p.utc_offset()?,
        };
        let dst = Designation {
            abbreviation,
            utc_offset,
        };

        let (start, start_time, end, end_time) = if p.eat(b',') {
            let start = p.rule_day()?;
            let start_time = p.rule_time()?;
            p.expect(b',')?;
            let end = p.rule_day()?;
            let end_time = p.rule_time()?;
            (start, start_time, end, end_time)
        } else {
            // No rule given: US rules, like glibc
            (
                RuleDay::MonthWeekDay { month: 3, week: 2, weekday: 0 },
                DEFAULT_RULE_TIME,
                RuleDay::MonthWeekDay { month: 11, week: 1, weekday: 0 },
                DEFAULT_RULE_TIME,
            )
        };
        if !p.at_end() {
            return Err(p.error());
        }

        Ok(PosixTz {
            std,
            dst: Some(DstRule {
                dst,
                start,
                start_time,
                end,
                end_time,
            }),
        })
    }

    /// Standard time offset to UTC, in seconds
    pub fn std_offset(&self) -> i32 {
        self.std.utc_offset
    }

    /// DST offset to UTC, in seconds, if the rule observes DST
    pub fn dst_offset(&self) -> Option<i32> {
        self.dst.as_ref().map(|r| r.dst.utc_offset)
    }

    pub fn local_time_type_at(&self, timestamp: i64) -> LocalTimeType {
        let std = LocalTimeType::new(self.std.utc_offset, false, self.std.abbreviation.as_str());
        let rule = match &self.dst {
            Some(rule) => rule,
            None => return std,
        };
        let year = match year_of(timestamp + i64::from(self.std.utc_offset)) {
            Some(y) => y,
            None => return std,
        };
        // Start is given in standard local time, end in DST local time
        let start = rule
            .start
            .day_start(year)
            .map(|d| d + i64::from(rule.start_time) - i64::from(self.std.utc_offset));
        let end = rule
            .end
            .day_start(year)
            .map(|d| d + i64::from(rule.end_time) - i64::from(rule.dst.utc_offset));
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            _ => return std,
        };

        let in_dst = if start <= end {
            timestamp >= start && timestamp < end
        } else {
            // Southern hemisphere: DST spans the new year
            !(timestamp >= end && timestamp < start)
        };
        if in_dst {
            LocalTimeType::new(rule.dst.utc_offset, true, rule.dst.abbreviation.as_str())
        } else {
            std
        }
    }
}

fn year_of(timestamp: i64) -> Option<i32> {
    let days = timestamp.div_euclid(SECONDS_PER_DAY) + UNIX_EPOCH_DAYS_FROM_CE;
    let days = i32::try_from(days).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days).map(|d| d.year())
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

impl RuleDay {
    fn date(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            RuleDay::Julian1(day) => {
                let leap = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
                let ordinal = u32::from(day) + u32::from(leap && day >= 60);
                NaiveDate::from_yo_opt(year, ordinal)
            }
            RuleDay::Julian0(day) => NaiveDate::from_yo_opt(year, u32::from(day) + 1)
                .or_else(|| NaiveDate::from_yo_opt(year, 365)),
            RuleDay::MonthWeekDay {
                month,
                week,
                weekday,
            } => {
                let month = u32::from(month);
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let first_weekday = first.weekday().num_days_from_sunday();
                let mut day =
                    1 + (u32::from(weekday) + 7 - first_weekday) % 7 + (u32::from(week) - 1) * 7;
                let len = days_in_month(year, month)?;
                while day > len {
                    day -= 7;
                }
                NaiveDate::from_ymd_opt(year, month, day)
            }
        }
    }

    /// Midnight of the transition day, in seconds since the epoch
    fn day_start(&self, year: i32) -> Option<i64> {
        self.date(year)
            .map(|d| (i64::from(d.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE) * SECONDS_PER_DAY)
    }
}
