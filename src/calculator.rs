//! Current time in a zone, and offset between two zones.

use crate::database::TimezoneDatabase;
use crate::TzError;
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use tracing::{debug, warn};

/// An instant expressed in the civil time of a zone.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalisedTime {
    zone: String,
    datetime: DateTime<FixedOffset>,
    abbreviation: String,
    isdst: bool,
}

impl LocalisedTime {
    /// Zone name, as requested
    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.datetime
    }

    pub fn utc_offset(&self) -> FixedOffset {
        *self.datetime.offset()
    }

    /// Offset to UTC, in seconds
    pub fn offset_seconds(&self) -> i32 {
        self.utc_offset().local_minus_utc()
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn is_dst(&self) -> bool {
        self.isdst
    }
}

impl fmt::Display for LocalisedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.datetime.format("%Y-%m-%d %H:%M:%S"),
            self.abbreviation
        )
    }
}

/// One side of a [`TimeDifferenceResult`]: the requested name and its time,
/// or the reason it could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneReport {
    pub name: String,
    pub time: Result<LocalisedTime, TzError>,
}

impl ZoneReport {
    /// The formatted time, or the error message in its place
    pub fn current_time(&self) -> String {
        match &self.time {
            Ok(t) => t.to_string(),
            Err(e) => e.to_string(),
        }
    }
}

/// Offset between two zones at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDifferenceResult {
    pub region1: ZoneReport,
    pub region2: ZoneReport,
    offset_seconds: Option<i32>,
}

impl TimeDifferenceResult {
    /// `offset(region2) - offset(region1)` in seconds, `None` if either zone is unknown
    pub fn offset_seconds(&self) -> Option<i32> {
        self.offset_seconds
    }

    /// `offset(region2) - offset(region1)` in hours, `None` if either zone is unknown
    pub fn offset_hours(&self) -> Option<f64> {
        self.offset_seconds.map(|s| f64::from(s) / 3600.0)
    }

    /// Human readable difference, hours with one decimal
    pub fn time_difference(&self) -> String {
        let (r1, r2) = (&self.region1.name, &self.region2.name);
        match self.offset_hours() {
            None => "Unable to compute the time difference, please check the timezone names"
                .to_string(),
            Some(h) if h > 0.0 => format!("{} is {:.1} hours ahead of {}", r2, h, r1),
            Some(h) if h < 0.0 => format!("{} is {:.1} hours behind {}", r2, h.abs(), r1),
            Some(_) => format!("{} and {} are in the same timezone", r1, r2),
        }
    }

    /// Transforms the result to a JSON string
    ///
    ///```text
    /// {"region1":{"name":"Asia/Shanghai","current_time":"2024-01-15 20:00:00 CST"},"region2":{"name":"America/New_York","current_time":"2024-01-15 07:00:00 EST"},"time_difference":"America/New_York is 13.0 hours behind Asia/Shanghai","offset_hours":-13.0}
    ///```
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, TzError> {
        #[derive(serde::Serialize)]
        struct Region<'a> {
            name: &'a str,
            current_time: String,
        }
        #[derive(serde::Serialize)]
        struct Report<'a> {
            region1: Region<'a>,
            region2: Region<'a>,
            time_difference: String,
            offset_hours: Option<f64>,
        }
        fn region(r: &ZoneReport) -> Region<'_> {
            Region {
                name: &r.name,
                current_time: r.current_time(),
            }
        }
        Ok(serde_json::to_string(&Report {
            region1: region(&self.region1),
            region2: region(&self.region2),
            time_difference: self.time_difference(),
            offset_hours: self.offset_hours(),
        })?)
    }
}

impl fmt::Display for TimeDifferenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Region 1: {}", self.region1.name)?;
        writeln!(f, "Current time: {}", self.region1.current_time())?;
        writeln!(f)?;
        writeln!(f, "Region 2: {}", self.region2.name)?;
        writeln!(f, "Current time: {}", self.region2.current_time())?;
        writeln!(f)?;
        write!(f, "Time difference: {}", self.time_difference())
    }
}

/// Resolves zones through a [`TimezoneDatabase`] and compares their offsets.
///
///```rust
/// use tzdiff::{BundledDatabase, TimeDifferenceCalculator};
/// let calculator = TimeDifferenceCalculator::new(BundledDatabase);
/// let result = calculator.difference("Asia/Shanghai", "America/New_York");
/// println!("{}", result.time_difference());
///```
#[derive(Debug, Clone)]
pub struct TimeDifferenceCalculator<D> {
    database: D,
}

impl<D: TimezoneDatabase> TimeDifferenceCalculator<D> {
    pub fn new(database: D) -> Self {
        TimeDifferenceCalculator { database }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Current time in `identifier`.
    pub fn resolve(&self, identifier: &str) -> Result<LocalisedTime, TzError> {
        self.resolve_at(identifier, Utc::now())
    }

    /// Time in `identifier` at `instant`.
    pub fn resolve_at(
        &self,
        identifier: &str,
        instant: DateTime<Utc>,
    ) -> Result<LocalisedTime, TzError> {
        let rules = self.database.lookup(identifier)?;
        let ltt = rules.local_time_type(&instant);
        let offset = FixedOffset::east_opt(ltt.utc_offset()).ok_or(TzError::ParseError)?;
        debug!(
            zone = identifier,
            utc_offset = ltt.utc_offset(),
            abbreviation = ltt.abbreviation(),
            "resolved zone"
        );
        Ok(LocalisedTime {
            zone: identifier.to_string(),
            datetime: instant.with_timezone(&offset),
            abbreviation: ltt.abbreviation().to_string(),
            isdst: ltt.is_dst(),
        })
    }

    /// Offset of `id2` relative to `id1`, right now.
    pub fn difference(&self, id1: &str, id2: &str) -> TimeDifferenceResult {
        self.difference_at(id1, id2, Utc::now())
    }

    /// Offset of `id2` relative to `id1` at `instant`. Unknown zones do not
    /// fail the call: their error message replaces their time, and the
    /// offset is left undefined.
    pub fn difference_at(&self, id1: &str, id2: &str, instant: DateTime<Utc>) -> TimeDifferenceResult {
        let report = |name: &str| {
            let time = self.resolve_at(name, instant);
            if let Err(e) = &time {
                warn!(zone = name, error = %e, "could not resolve zone");
            }
            ZoneReport {
                name: name.to_string(),
                time,
            }
        };
        let region1 = report(id1);
        let region2 = report(id2);
        let offset_seconds = match (&region1.time, &region2.time) {
            (Ok(t1), Ok(t2)) => Some(t2.offset_seconds() - t1.offset_seconds()),
            _ => None,
        };
        TimeDifferenceResult {
            region1,
            region2,
            offset_seconds,
        }
    }
}
