use crate::database::{BundledDatabase, TimezoneDatabase, ZoneinfoDatabase, DEFAULT_ZONEINFO_DIR};
use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Which timezone database backs the lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// TZif files of the system zoneinfo directory
    System,
    /// Database compiled into the binary
    Bundled,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Backend::System),
            "bundled" => Ok(Backend::Bundled),
            other => Err(anyhow!(
                "Invalid TZDIFF_DATABASE '{}', expected 'system' or 'bundled'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub zoneinfo_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let backend = match env::var("TZDIFF_DATABASE") {
            Ok(v) if !v.trim().is_empty() => v.parse()?,
            _ => Backend::System,
        };

        let zoneinfo_dir = env::var("TZDIR").unwrap_or_else(|_| DEFAULT_ZONEINFO_DIR.to_string());
        let zoneinfo_dir = if zoneinfo_dir.trim().is_empty() {
            DEFAULT_ZONEINFO_DIR.to_string()
        } else {
            zoneinfo_dir
        };

        Ok(Config {
            backend,
            zoneinfo_dir: PathBuf::from(zoneinfo_dir),
        })
    }

    /// Builds the configured database. Falls back to the bundled one when the
    /// zoneinfo directory does not exist.
    pub fn database(&self) -> Box<dyn TimezoneDatabase> {
        match self.backend {
            Backend::System if self.zoneinfo_dir.is_dir() => {
                info!("Using zoneinfo directory {}", self.zoneinfo_dir.display());
                Box::new(ZoneinfoDatabase::new(self.zoneinfo_dir.clone()))
            }
            Backend::System => {
                warn!(
                    "Zoneinfo directory {} not found, using bundled database",
                    self.zoneinfo_dir.display()
                );
                Box::new(BundledDatabase)
            }
            Backend::Bundled => {
                info!("Using bundled timezone database");
                Box::new(BundledDatabase)
            }
        }
    }
}
