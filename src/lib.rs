//! Biathlon race results
//!
//! Turns a chronological log of competitor events into lap splits, penalty
//! loop times, shooting accuracy and final standings.
//!
//! ```no_run
//! use biathlon_results::{ingest, render_standings, Race, RaceConfig};
//!
//! # fn main() -> biathlon_results::Result<()> {
//! let config = RaceConfig::load("config/config.json")?;
//! let mut race = Race::new(&config)?;
//! let file = std::fs::File::open("config/events")?;
//! ingest(&mut race, std::io::BufReader::new(file))?;
//! print!("{}", render_standings(&race.final_standings()));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod ingest;
pub mod time;

// Re-export commonly used types
pub use config::{RaceConfig, RaceParams};
pub use self::core::{
    build_standings, derive_statistics, rank_athletes, render_standings, AthleteState, AthleteStatus,
    JournalEntry, JournalRecord, Race, Split, Standing,
};
pub use error::{DecodeError, RaceError, Result};
pub use events::{EventKind, RaceEvent};
pub use ingest::{ingest, IngestSummary, LineError};
