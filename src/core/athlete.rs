//! Per-competitor race state

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::time::seconds_f64;

/// Lifecycle status of a competitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AthleteStatus {
    #[default]
    NotStarted,
    Racing,
    NotFinished,
    Finished,
    Disqualified,
}

impl AthleteStatus {
    /// Position of this status in the final standings (lower ranks first)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Finished => 0,
            Self::NotFinished => 1,
            Self::Disqualified => 2,
            Self::NotStarted => 3,
            Self::Racing => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Racing => "Racing",
            Self::NotFinished => "NotFinished",
            Self::Finished => "Finished",
            Self::Disqualified => "Disqualified",
        }
    }
}

impl fmt::Display for AthleteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable record of one competitor, built up event by event
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteState {
    pub id: u32,
    pub status: AthleteStatus,
    pub registered_at: Option<NaiveTime>,
    /// Planned start; defaults to the race start until a lottery reassigns it
    pub planned_start: NaiveTime,
    pub actual_start: Option<NaiveTime>,
    pub finish: Option<NaiveTime>,
    /// One entry per completed lap, never more than the configured lap count
    pub lap_times: Vec<Duration>,
    /// One entry per miss or penalty entry; zero until back-filled
    pub penalty_times: Vec<Duration>,
    pub shots: u32,
    pub hits: u32,
    pub current_lap: u32,
    /// Sum of whole seconds spent in penalty loops
    pub total_penalty_secs: i64,
    /// Firing range (1-based) -> arrival time
    pub firing_arrivals: BTreeMap<u32, NaiveTime>,
    pub last_lap_at: Option<NaiveTime>,

    // Derived by the statistics pass only
    pub total_distance: u64,
    pub avg_speed: f64,
    pub accuracy: f64,
}

impl AthleteState {
    /// Fresh competitor that has not registered anything yet
    pub fn new(id: u32, planned_start: NaiveTime) -> Self {
        Self {
            id,
            status: AthleteStatus::NotStarted,
            registered_at: None,
            planned_start,
            actual_start: None,
            finish: None,
            lap_times: Vec::new(),
            penalty_times: Vec::new(),
            shots: 0,
            hits: 0,
            current_lap: 0,
            total_penalty_secs: 0,
            firing_arrivals: BTreeMap::new(),
            last_lap_at: None,
            total_distance: 0,
            avg_speed: 0.0,
            accuracy: 0.0,
        }
    }

    /// Time from actual start to finish, when both are known
    pub fn total_time(&self) -> Option<Duration> {
        match (self.actual_start, self.finish) {
            (Some(start), Some(finish)) => Some(finish - start),
            _ => None,
        }
    }

    pub fn completed_laps(&self) -> usize {
        self.lap_times.len()
    }

    pub fn penalty_count(&self) -> usize {
        self.penalty_times.len()
    }

    /// Recompute distance, average speed and accuracy from the current counters
    pub fn derive_statistics(&mut self, lap_len: u32) {
        self.total_distance = u64::from(lap_len) * self.completed_laps() as u64;

        self.avg_speed = match self.total_time().map(seconds_f64) {
            Some(secs) if secs > 0.0 => self.total_distance as f64 / secs,
            _ => 0.0,
        };

        self.accuracy = if self.shots > 0 {
            f64::from(self.hits) / f64::from(self.shots) * 100.0
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_new_athlete() {
        let athlete = AthleteState::new(7, t(10, 0, 0));
        assert_eq!(athlete.id, 7);
        assert_eq!(athlete.status, AthleteStatus::NotStarted);
        assert_eq!(athlete.planned_start, t(10, 0, 0));
        assert!(athlete.actual_start.is_none());
        assert!(athlete.finish.is_none());
        assert!(athlete.total_time().is_none());
        assert_eq!(athlete.penalty_count(), 0);
    }

    #[test]
    fn test_status_rank_is_explicit() {
        let mut statuses = [
            AthleteStatus::Racing,
            AthleteStatus::NotStarted,
            AthleteStatus::Disqualified,
            AthleteStatus::NotFinished,
            AthleteStatus::Finished,
        ];
        statuses.sort_by_key(|s| s.rank());
        assert_eq!(
            statuses,
            [
                AthleteStatus::Finished,
                AthleteStatus::NotFinished,
                AthleteStatus::Disqualified,
                AthleteStatus::NotStarted,
                AthleteStatus::Racing,
            ]
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AthleteStatus::NotFinished.to_string(), "NotFinished");
        assert_eq!(AthleteStatus::default(), AthleteStatus::NotStarted);
    }

    #[test]
    fn test_derive_statistics() {
        let mut athlete = AthleteState::new(1, t(10, 0, 0));
        athlete.actual_start = Some(t(10, 0, 0));
        athlete.finish = Some(t(11, 30, 0));
        athlete.lap_times = vec![Duration::minutes(30), Duration::minutes(30)];
        athlete.shots = 10;
        athlete.hits = 8;

        athlete.derive_statistics(4000);

        assert_eq!(athlete.total_distance, 8000);
        assert!((athlete.avg_speed - 8000.0 / 5400.0).abs() < 1e-9);
        assert!((athlete.accuracy - 80.0).abs() < 1e-9);
        assert_eq!(athlete.completed_laps(), 2);
    }

    #[test]
    fn test_derive_statistics_without_finish() {
        let mut athlete = AthleteState::new(1, t(10, 0, 0));
        athlete.actual_start = Some(t(10, 0, 0));
        athlete.lap_times = vec![Duration::minutes(30)];
        athlete.avg_speed = 3.0;

        athlete.derive_statistics(4000);

        assert_eq!(athlete.total_distance, 4000);
        assert_eq!(athlete.avg_speed, 0.0);
        assert_eq!(athlete.accuracy, 0.0);
    }

    #[test]
    fn test_derive_statistics_zero_elapsed() {
        let mut athlete = AthleteState::new(1, t(10, 0, 0));
        athlete.actual_start = Some(t(10, 0, 0));
        athlete.finish = Some(t(10, 0, 0));

        athlete.derive_statistics(4000);
        assert_eq!(athlete.avg_speed, 0.0);
    }
}
