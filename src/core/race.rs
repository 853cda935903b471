//! Race state machine
//!
//! Folds decoded competitor events, in file order, into per-competitor state.
//! Every state transition produces a [`JournalEntry`]; the entries are returned
//! from [`Race::apply`] and also kept on the race as its audit trail.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveTime;

use super::athlete::{AthleteState, AthleteStatus};
use super::journal::{JournalEntry, JournalRecord};
use crate::config::{RaceConfig, RaceParams};
use crate::error::Result;
use crate::events::{EventKind, RaceEvent};
use crate::time::{checked_add, parse_time_of_day};

/// A single race run
#[derive(Debug, Clone)]
pub struct Race {
    params: RaceParams,
    /// Competitors keyed by id, created on first mention and never removed
    athletes: BTreeMap<u32, AthleteState>,
    /// Firing range each competitor most recently arrived at
    firing_cursor: HashMap<u32, u32>,
    journal: Vec<JournalEntry>,
}

impl Race {
    /// Set up a race; fails if the start time or start interval cannot be parsed
    pub fn new(config: &RaceConfig) -> Result<Self> {
        let params = config.resolve()?;
        log::info!(
            "Race set up: {} laps x {}m, penalty loop {}m, {} firing ranges, start {} (+{}s window)",
            params.laps,
            params.lap_len,
            params.penalty_len,
            params.firing_lines,
            params.start,
            params.start_delta.num_seconds()
        );
        Ok(Self::with_params(params))
    }

    /// Set up a race from already resolved parameters
    pub fn with_params(params: RaceParams) -> Self {
        Self {
            params,
            athletes: BTreeMap::new(),
            firing_cursor: HashMap::new(),
            journal: Vec::new(),
        }
    }

    pub fn params(&self) -> &RaceParams {
        &self.params
    }

    pub fn athlete(&self, id: u32) -> Option<&AthleteState> {
        self.athletes.get(&id)
    }

    /// All competitors seen so far, ordered by id
    pub fn athletes(&self) -> impl Iterator<Item = &AthleteState> {
        self.athletes.values()
    }

    pub fn athlete_count(&self) -> usize {
        self.athletes.len()
    }

    pub(crate) fn athletes_mut(&mut self) -> impl Iterator<Item = &mut AthleteState> {
        self.athletes.values_mut()
    }

    /// Audit trail of every transition applied so far
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Firing range the competitor most recently arrived at
    pub fn current_range(&self, id: u32) -> Option<u32> {
        self.firing_cursor.get(&id).copied()
    }

    /// Get a competitor, creating it on first mention
    pub fn upsert_athlete(&mut self, id: u32) -> &mut AthleteState {
        upsert(&mut self.athletes, id, self.params.start)
    }

    /// Fold one event into the race, returning the journal entries it produced
    pub fn apply(&mut self, event: &RaceEvent) -> Vec<JournalEntry> {
        log::trace!("apply {}", event);

        let params = self.params;
        let athlete = upsert(&mut self.athletes, event.athlete_id, params.start);

        let mut emitted = Vec::with_capacity(2);

        match event.kind() {
            Some(kind) => {
                if let Some(record) = transition(&params, athlete, &mut self.firing_cursor, kind, event) {
                    emitted.push(JournalEntry::new(event.time, athlete.id, record));
                }
            }
            None => log::debug!("Ignoring unknown event code {} for competitor {}", event.code, event.athlete_id),
        }

        if let Some(record) = check_late_start(&params, athlete, event.time) {
            emitted.push(JournalEntry::new(event.time, athlete.id, record));
        }

        self.journal.extend(emitted.iter().cloned());
        emitted
    }

    /// Apply a sequence of events in order
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a RaceEvent>) {
        for event in events {
            self.apply(event);
        }
    }
}

/// Competitors are created here and nowhere else, with the race start as planned start
fn upsert(athletes: &mut BTreeMap<u32, AthleteState>, id: u32, start: NaiveTime) -> &mut AthleteState {
    athletes.entry(id).or_insert_with(|| {
        log::debug!("New competitor {}", id);
        AthleteState::new(id, start)
    })
}

/// Apply the kind-specific effect of one event. Returns `None` when the event
/// changed nothing worth recording, including when a parameter is missing or malformed.
fn transition(
    params: &RaceParams,
    athlete: &mut AthleteState,
    firing_cursor: &mut HashMap<u32, u32>,
    kind: EventKind,
    event: &RaceEvent,
) -> Option<JournalRecord> {
    let now = event.time;

    match kind {
        EventKind::Register => {
            athlete.registered_at = Some(now);
            athlete.status = AthleteStatus::NotStarted;
            Some(JournalRecord::Registered)
        }

        EventKind::StartTimeLottery => {
            let start = param_time(event)?;
            athlete.planned_start = start;
            Some(JournalRecord::StartDrawn { start })
        }

        EventKind::AtStartLine => {
            athlete.status = AthleteStatus::Racing;
            Some(JournalRecord::AtStartLine)
        }

        EventKind::Start => {
            athlete.actual_start = Some(now);
            athlete.status = AthleteStatus::Racing;
            Some(JournalRecord::Started)
        }

        EventKind::AtFiringLine => {
            let range = param_number(event).filter(|range| *range > 0)?;
            if params.firing_lines > 0 && range > params.firing_lines {
                log::warn!(
                    "Competitor {} at firing range {} but only {} configured",
                    athlete.id,
                    range,
                    params.firing_lines
                );
            }
            athlete.firing_arrivals.insert(range, now);
            firing_cursor.insert(athlete.id, range);
            Some(JournalRecord::AtFiringRange { range })
        }

        EventKind::HitSuccessful => {
            let target = event.param()?.to_string();
            athlete.hits += 1;
            athlete.shots += 1;
            Some(JournalRecord::TargetHit { target })
        }

        EventKind::HitMissed => {
            let target = event.param()?.to_string();
            athlete.shots += 1;
            // every miss costs one penalty loop
            athlete.penalty_times.push(chrono::Duration::zero());
            Some(JournalRecord::TargetMissed { target })
        }

        EventKind::LeaveFiringLine => {
            let range = *firing_cursor.get(&athlete.id)?;
            let arrived = *athlete.firing_arrivals.get(&range)?;
            Some(JournalRecord::LeftFiringRange {
                range,
                elapsed: now - arrived,
            })
        }

        EventKind::EnterPenalty => {
            athlete.penalty_times.push(chrono::Duration::zero());
            Some(JournalRecord::EnteredPenalty)
        }

        EventKind::LeavePenalty => {
            let range = *firing_cursor.get(&athlete.id)?;
            let arrived = *athlete.firing_arrivals.get(&range)?;
            let last = athlete.penalty_times.last_mut()?;
            let elapsed = now - arrived;
            *last = elapsed;
            athlete.total_penalty_secs += elapsed.num_seconds();
            Some(JournalRecord::LeftPenalty {
                elapsed,
                total_penalty_secs: athlete.total_penalty_secs,
            })
        }

        EventKind::LapFinish => {
            athlete.current_lap += 1;
            if athlete.current_lap > params.laps {
                log::debug!(
                    "Competitor {} finished lap {} of {}, not recorded",
                    athlete.id,
                    athlete.current_lap,
                    params.laps
                );
                return None;
            }
            let started = athlete.actual_start?;
            let lap_began = match athlete.last_lap_at {
                Some(previous) if !athlete.lap_times.is_empty() => previous,
                _ => started,
            };
            let lap_time = now - lap_began;
            athlete.lap_times.push(lap_time);
            athlete.last_lap_at = Some(now);
            Some(JournalRecord::LapCompleted {
                lap: athlete.current_lap,
                lap_time,
                total: now - started,
            })
        }

        EventKind::CantContinue => {
            athlete.status = AthleteStatus::NotFinished;
            let reason = (!event.params.is_empty()).then(|| event.params.join(" "));
            Some(JournalRecord::CannotContinue { reason })
        }

        EventKind::Disqualified => {
            athlete.status = AthleteStatus::Disqualified;
            Some(JournalRecord::Disqualified)
        }

        EventKind::Finished => {
            athlete.finish = Some(now);
            athlete.status = AthleteStatus::Finished;
            Some(JournalRecord::Finished)
        }
    }
}

/// Disqualify a competitor still waiting to start once the start window has passed
fn check_late_start(params: &RaceParams, athlete: &mut AthleteState, now: NaiveTime) -> Option<JournalRecord> {
    if athlete.status != AthleteStatus::NotStarted {
        return None;
    }
    // a window that runs past midnight cannot be missed within this day
    let deadline = checked_add(athlete.planned_start, params.start_delta)?;
    if now <= deadline {
        return None;
    }

    athlete.status = AthleteStatus::Disqualified;
    log::info!(
        "Competitor {} disqualified: not started by {} (planned {})",
        athlete.id,
        deadline,
        athlete.planned_start
    );
    Some(JournalRecord::LateStartDisqualified)
}

fn param_number(event: &RaceEvent) -> Option<u32> {
    let raw = event.param()?;
    let value = raw.parse().ok();
    if value.is_none() {
        log::debug!("Competitor {}: bad numeric parameter {:?} on event {}", event.athlete_id, raw, event.code);
    }
    value
}

fn param_time(event: &RaceEvent) -> Option<NaiveTime> {
    let raw = event.param()?;
    let value = parse_time_of_day(raw);
    if value.is_none() {
        log::debug!("Competitor {}: bad time parameter {:?} on event {}", event.athlete_id, raw, event.code);
    }
    value
}
