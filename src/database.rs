//! Timezone databases: something that turns a zone name into rules giving the
//! local time type at any instant.

use crate::tzif::{LocalTimeType, Tzif};
use crate::TzError;
use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::OffsetComponents;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the compiled IANA database on Unix systems.
pub const DEFAULT_ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

/// Offset rules of one timezone.
pub trait ZoneRules {
    /// Local time type (offset, DST flag, abbreviation) in effect at `instant`.
    fn local_time_type(&self, instant: &DateTime<Utc>) -> LocalTimeType;
}

/// Resolves timezone names to their rules.
pub trait TimezoneDatabase {
    /// Looks a zone up by its IANA name, e.g. `Asia/Shanghai`.
    /// Unknown names return [`TzError::InvalidTimezone`].
    fn lookup(&self, name: &str) -> Result<Box<dyn ZoneRules>, TzError>;
}

impl<T: TimezoneDatabase + ?Sized> TimezoneDatabase for &T {
    fn lookup(&self, name: &str) -> Result<Box<dyn ZoneRules>, TzError> {
        (**self).lookup(name)
    }
}

impl<T: TimezoneDatabase + ?Sized> TimezoneDatabase for Box<T> {
    fn lookup(&self, name: &str) -> Result<Box<dyn ZoneRules>, TzError> {
        (**self).lookup(name)
    }
}

impl ZoneRules for Tzif {
    fn local_time_type(&self, instant: &DateTime<Utc>) -> LocalTimeType {
        self.local_time_type_at(instant.timestamp())
    }
}

/// Reads TZif files from a zoneinfo directory (`/usr/share/zoneinfo` by default).
#[derive(Debug, Clone)]
pub struct ZoneinfoDatabase {
    root: PathBuf,
}

impl Default for ZoneinfoDatabase {
    fn default() -> Self {
        ZoneinfoDatabase::new(DEFAULT_ZONEINFO_DIR)
    }
}

impl ZoneinfoDatabase {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        ZoneinfoDatabase { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

// Zone names are relative paths below the zoneinfo root
fn is_zone_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && name
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || b"_+-/".contains(&c))
        && name
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..")
}

impl TimezoneDatabase for ZoneinfoDatabase {
    fn lookup(&self, name: &str) -> Result<Box<dyn ZoneRules>, TzError> {
        if !is_zone_name(name) {
            debug!(zone = name, "rejected zone name");
            return Err(TzError::InvalidTimezone(name.to_string()));
        }
        let path = self.root.join(name);
        debug!(zone = name, path = %path.display(), "reading TZif file");
        match Tzif::read(&path) {
            Ok(tzif) => Ok(Box::new(tzif)),
            // Missing files, directories and non-TZif files (zone.tab...) are not zones
            Err(TzError::InvalidTimezone(_)) | Err(TzError::InvalidMagic) => {
                Err(TzError::InvalidTimezone(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

/// The IANA database compiled into the binary by `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledDatabase;

impl ZoneRules for chrono_tz::Tz {
    fn local_time_type(&self, instant: &DateTime<Utc>) -> LocalTimeType {
        let offset = self.offset_from_utc_datetime(&instant.naive_utc());
        LocalTimeType::new(
            offset.fix().local_minus_utc(),
            offset.dst_offset().num_seconds() != 0,
            offset.to_string(),
        )
    }
}

impl TimezoneDatabase for BundledDatabase {
    fn lookup(&self, name: &str) -> Result<Box<dyn ZoneRules>, TzError> {
        let tz: chrono_tz::Tz = name
            .parse()
            .map_err(|_| TzError::InvalidTimezone(name.to_string()))?;
        debug!(zone = name, "found zone in bundled database");
        Ok(Box::new(tz))
    }
}
