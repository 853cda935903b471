//! Audit records emitted by the race state machine

use std::fmt;

use chrono::{Duration, NaiveTime};

use crate::time::{format_duration, format_time_of_day};

/// What happened to a competitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalRecord {
    Registered,
    /// Start time assigned by the lottery
    StartDrawn { start: NaiveTime },
    AtStartLine,
    Started,
    AtFiringRange { range: u32 },
    /// Target label as given on the event, not necessarily numeric
    TargetHit { target: String },
    TargetMissed { target: String },
    LeftFiringRange { range: u32, elapsed: Duration },
    EnteredPenalty,
    LeftPenalty { elapsed: Duration, total_penalty_secs: i64 },
    LapCompleted { lap: u32, lap_time: Duration, total: Duration },
    CannotContinue { reason: Option<String> },
    Disqualified,
    Finished,
    /// Did not start within the allowed window after the planned start
    LateStartDisqualified,
}

/// One line of the race audit trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub time: NaiveTime,
    pub athlete_id: u32,
    pub record: JournalRecord,
}

impl JournalEntry {
    pub fn new(time: NaiveTime, athlete_id: u32, record: JournalRecord) -> Self {
        Self {
            time,
            athlete_id,
            record,
        }
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] The competitor({})", format_time_of_day(self.time), self.athlete_id)?;
        match &self.record {
            JournalRecord::Registered => write!(f, " registered"),
            JournalRecord::StartDrawn { start } => {
                write!(f, "'s start time was set by a draw to {}", format_time_of_day(*start))
            }
            JournalRecord::AtStartLine => write!(f, " is on the start line"),
            JournalRecord::Started => write!(f, " has started"),
            JournalRecord::AtFiringRange { range } => write!(f, " is on the firing range({})", range),
            JournalRecord::TargetHit { target } => write!(f, " has hit target({})", target),
            JournalRecord::TargetMissed { target } => write!(f, " has missed target({})", target),
            JournalRecord::LeftFiringRange { range, elapsed } => write!(
                f,
                " left the firing range({}) after {}",
                range,
                format_duration(*elapsed)
            ),
            JournalRecord::EnteredPenalty => write!(f, " entered the penalty laps"),
            JournalRecord::LeftPenalty { elapsed, total_penalty_secs } => write!(
                f,
                " left the penalty laps after {} (total penalty {}s)",
                format_duration(*elapsed),
                total_penalty_secs
            ),
            JournalRecord::LapCompleted { lap, lap_time, total } => write!(
                f,
                " ended lap {} in {} (race time {})",
                lap,
                format_duration(*lap_time),
                format_duration(*total)
            ),
            JournalRecord::CannotContinue { reason: Some(reason) } => {
                write!(f, " can't continue: {}", reason)
            }
            JournalRecord::CannotContinue { reason: None } => {
                write!(f, " can't continue: no reason given")
            }
            JournalRecord::Disqualified => write!(f, " is disqualified"),
            JournalRecord::Finished => write!(f, " has finished"),
            JournalRecord::LateStartDisqualified => {
                write!(f, " is disqualified (did not start in time)")
            }
        }
    }
}
