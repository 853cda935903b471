//! Core race abstractions
//!
//! This module contains the race state machine and everything derived from it:
//! - `AthleteState` - Mutable per-competitor record
//! - `Race` - Folds events into competitor state
//! - `JournalEntry` - Audit records emitted on every transition
//! - `derive_statistics` / `build_standings` - Post-race passes

mod athlete;
mod journal;
mod race;
mod standings;
mod stats;

pub use athlete::{AthleteState, AthleteStatus};
pub use journal::{JournalEntry, JournalRecord};
pub use race::Race;
pub use standings::{build_standings, rank_athletes, render_standings, Split, Standing};
pub use stats::derive_statistics;
