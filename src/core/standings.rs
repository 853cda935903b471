//! Final standings: ranking and report rendering

use std::cmp::Ordering;
use std::fmt::Write;

use chrono::Duration;
use serde::{Serialize, Serializer};

use super::athlete::{AthleteState, AthleteStatus};
use super::race::Race;
use crate::time::{format_duration, seconds_f64};

/// Timed segment of a competitor's race (a lap or a penalty loop)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Split {
    /// 1-based index of the lap or penalty loop
    pub index: usize,
    #[serde(serialize_with = "serialize_duration")]
    pub time: Duration,
    /// Meters per second over the segment
    pub speed: f64,
}

impl Split {
    fn new(index: usize, time: Duration, length: u32) -> Self {
        let secs = seconds_f64(time);
        let speed = if secs > 0.0 { f64::from(length) / secs } else { 0.0 };
        Self { index, time, speed }
    }
}

/// One row of the final standings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub position: usize,
    pub athlete_id: u32,
    pub status: AthleteStatus,
    #[serde(serialize_with = "serialize_optional_duration")]
    pub total_time: Option<Duration>,
    pub laps: Vec<Split>,
    /// Completed penalty loops only; loops never back-filled are left out
    pub penalty_loops: Vec<Split>,
    /// Sum of whole seconds over the listed penalty loops
    pub penalty_seconds: i64,
    pub total_distance: u64,
    pub avg_speed: f64,
    pub accuracy: f64,
    pub hits: u32,
    pub shots: u32,
}

impl Standing {
    fn new(position: usize, athlete: &AthleteState, race: &Race) -> Self {
        let params = race.params();

        let laps = athlete
            .lap_times
            .iter()
            .enumerate()
            .map(|(i, time)| Split::new(i + 1, *time, params.lap_len))
            .collect();

        let penalty_loops: Vec<Split> = athlete
            .penalty_times
            .iter()
            .enumerate()
            .filter(|(_, time)| **time > Duration::zero())
            .map(|(i, time)| Split::new(i + 1, *time, params.penalty_len))
            .collect();
        let penalty_seconds = penalty_loops.iter().map(|split| split.time.num_seconds()).sum();

        Self {
            position,
            athlete_id: athlete.id,
            status: athlete.status,
            total_time: athlete.total_time(),
            laps,
            penalty_loops,
            penalty_seconds,
            total_distance: athlete.total_distance,
            avg_speed: athlete.avg_speed,
            accuracy: athlete.accuracy,
            hits: athlete.hits,
            shots: athlete.shots,
        }
    }
}

/// Order competitors for the final standings: by status rank, then finish
/// time (competitors without one after those with one), then id.
pub fn rank_athletes(race: &Race) -> Vec<&AthleteState> {
    let mut ranked: Vec<&AthleteState> = race.athletes().collect();
    ranked.sort_by(|a, b| compare_athletes(a, b));
    ranked
}

/// Finishers sort ahead of unfinished competitors within a status. Falling back to
/// id whenever either finish time is missing would not be transitive, which `sort_by` requires.
fn compare_athletes(a: &AthleteState, b: &AthleteState) -> Ordering {
    a.status
        .rank()
        .cmp(&b.status.rank())
        .then_with(|| match (a.finish, b.finish) {
            (Some(fa), Some(fb)) => fa.cmp(&fb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Build the ranked standings from the race's current (derived) statistics
pub fn build_standings(race: &Race) -> Vec<Standing> {
    rank_athletes(race)
        .into_iter()
        .enumerate()
        .map(|(i, athlete)| Standing::new(i + 1, athlete, race))
        .collect()
}

impl Race {
    /// Derive statistics, then rank every competitor
    pub fn final_standings(&mut self) -> Vec<Standing> {
        self.derive_statistics();
        build_standings(self)
    }
}

/// Render the standings as a human-readable report
pub fn render_standings(standings: &[Standing]) -> String {
    let mut out = String::from("Final results:\n");

    for s in standings {
        let _ = writeln!(out, "{}. Competitor {} - {}", s.position, s.athlete_id, s.status);

        if let Some(total) = s.total_time {
            let _ = writeln!(out, "   Total time: {}", format_duration(total));
        }
        for lap in &s.laps {
            let _ = writeln!(out, "   Lap {}: {} ({:.2} m/s)", lap.index, format_duration(lap.time), lap.speed);
        }
        for penalty in &s.penalty_loops {
            let _ = writeln!(
                out,
                "   Penalty {}: {} ({:.2} m/s)",
                penalty.index,
                format_duration(penalty.time),
                penalty.speed
            );
        }
        if s.penalty_seconds > 0 {
            let _ = writeln!(out, "   Penalty time total: {} s", s.penalty_seconds);
        }

        let _ = writeln!(out, "   Total distance: {} m", s.total_distance);
        if s.avg_speed > 0.0 {
            let _ = writeln!(out, "   Average speed: {:.2} m/s", s.avg_speed);
        }
        if s.shots > 0 {
            let _ = writeln!(out, "   Accuracy: {:.1}%", s.accuracy);
        }
        let _ = writeln!(out, "   Shooting: {}/{} hits", s.hits, s.shots);
        out.push('\n');
    }

    out
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

fn serialize_optional_duration<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(duration) => serialize_duration(duration, serializer),
        None => serializer.serialize_none(),
    }
}
