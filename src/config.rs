//! Race configuration
//!
//! Race parameters are loaded from JSON (the usual `config.json`) or TOML files
//! and resolved into [`RaceParams`] before a race can run.

use std::path::Path;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{RaceError, Result};
use crate::time::{parse_interval, parse_time_of_day};

/// Raw race configuration as found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    /// Number of laps of the main distance
    pub laps: u32,
    /// Length of each main lap in meters
    #[serde(alias = "lap_len")]
    pub lap_len: u32,
    /// Length of each penalty loop in meters
    #[serde(alias = "penalty_len")]
    pub penalty_len: u32,
    /// Number of firing ranges per lap
    #[serde(default, alias = "firing_lines")]
    pub firing_lines: u32,
    /// Planned start time of the first competitor (`HH:MM:SS[.mmm]`)
    pub start: String,
    /// Allowed start window (`HH:MM:SS` or `1m30s` style)
    #[serde(alias = "start_delta")]
    pub start_delta: String,
}

impl RaceConfig {
    /// Parse a JSON configuration
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parse a TOML configuration
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration file. `.toml` files are read as TOML, everything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        log::debug!("Loading race config from {}", path.display());
        if is_toml {
            Self::from_toml_str(&source)
        } else {
            Self::from_json_str(&source)
        }
    }

    /// Parse the time fields, producing immutable race parameters
    pub fn resolve(&self) -> Result<RaceParams> {
        let start = parse_time_of_day(&self.start)
            .ok_or_else(|| RaceError::InvalidStartTime(self.start.clone()))?;
        let start_delta = parse_interval(&self.start_delta)
            .ok_or_else(|| RaceError::InvalidStartDelta(self.start_delta.clone()))?;

        Ok(RaceParams {
            laps: self.laps,
            lap_len: self.lap_len,
            penalty_len: self.penalty_len,
            firing_lines: self.firing_lines,
            start,
            start_delta,
        })
    }
}

/// Resolved race parameters, fixed for the lifetime of a race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceParams {
    pub laps: u32,
    pub lap_len: u32,
    pub penalty_len: u32,
    pub firing_lines: u32,
    /// Planned start, used as every competitor's default planned start
    pub start: NaiveTime,
    /// How long after the planned start a competitor may still start
    pub start_delta: Duration,
}
