//! Feeding an events file into a race

use std::fmt;
use std::io::BufRead;

use crate::core::Race;
use crate::error::{DecodeError, Result};
use crate::events::RaceEvent;

/// A line that could not be decoded and was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number
    pub line: usize,
    pub content: String,
    pub error: DecodeError,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.error, self.content)
    }
}

/// Outcome of reading an events file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Events decoded and applied
    pub applied: usize,
    pub rejected: Vec<LineError>,
}

/// Decode every line of `reader` and apply it to the race in order.
///
/// Blank lines are skipped and malformed lines are collected rather than
/// aborting the run. Only I/O failures are returned as errors.
pub fn ingest<R: BufRead>(race: &mut Race, reader: R) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match RaceEvent::parse(&line) {
            Ok(event) => {
                race.apply(&event);
                summary.applied += 1;
            }
            Err(error) => {
                let rejected = LineError {
                    line: index + 1,
                    content: line,
                    error,
                };
                log::warn!("Skipping {}", rejected);
                summary.rejected.push(rejected);
            }
        }
    }

    log::info!(
        "Applied {} events ({} lines rejected)",
        summary.applied,
        summary.rejected.len()
    );
    Ok(summary)
}
