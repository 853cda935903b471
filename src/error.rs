//! Error types for race setup and event decoding

use thiserror::Error;

/// Result type for race operations
pub type Result<T> = std::result::Result<T, RaceError>;

/// Errors that prevent a race from being set up or its input from being read
#[derive(Debug, Error)]
pub enum RaceError {
    /// Planned start time is not a valid time of day
    #[error("invalid start time: {0:?}")]
    InvalidStartTime(String),

    /// Start interval could not be parsed
    #[error("invalid start interval: {0:?}")]
    InvalidStartDelta(String),

    /// Config file is not valid JSON
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file is not valid TOML
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a single event line is rejected before reaching the race
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty line")]
    Empty,

    /// Fewer than the three mandatory fields
    #[error("expected at least 3 fields, got {0}")]
    MissingFields(usize),

    #[error("invalid timestamp {0:?}")]
    Timestamp(String),

    #[error("invalid event id {0:?}")]
    EventId(String),

    #[error("invalid competitor id {0:?}")]
    CompetitorId(String),
}
