//! Snapshot and config loading for the ronda CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use ronda_data::{HttpProvider, JsonDirProvider, SnapshotOptions, SnapshotProvider};
use ronda_eval::BatchConfig;
use ronda_strategies::ScreenConfig;
use serde::Deserialize;

/// Everything the config file may set. Missing sections take their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) screen: ScreenConfig,
    pub(crate) batch: BatchConfig,
    pub(crate) snapshot: SnapshotOptions,
}

/// Read a JSON config file, or the defaults when no path is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Where the snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Source {
    Dir(PathBuf),
    Remote,
}

impl Source {
    pub(crate) fn from_flags(data_dir: Option<PathBuf>, remote: bool) -> Result<Self> {
        match (data_dir, remote) {
            (Some(dir), false) => Ok(Self::Dir(dir)),
            (None, true) => Ok(Self::Remote),
            (Some(_), true) => bail!("--data-dir and --remote are mutually exclusive"),
            (None, false) => bail!("one of --data-dir or --remote is required"),
        }
    }

    pub(crate) fn provider(&self) -> Result<Box<dyn SnapshotProvider>> {
        Ok(match self {
            Self::Dir(dir) => {
                if !dir.is_dir() {
                    bail!("snapshot directory {} does not exist", dir.display());
                }
                Box::new(JsonDirProvider::new(dir))
            }
            Self::Remote => Box::new(HttpProvider::from_env()?),
        })
    }
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("invalid date {date_str:?}, expected YYYY-MM-DD"))
}
