//! Incoming competitor events and the line decoder
//!
//! Each line of an events file looks like
//! `[09:05:59.867] 1 1` or `[09:59:45.000] 5 1 1`:
//! a bracketed timestamp, the event id, the competitor id and optional
//! extra parameters.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;

use crate::error::DecodeError;
use crate::time::{format_time_of_day, parse_time_of_day};

/// Known event kinds with their fixed wire codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Register,
    StartTimeLottery,
    AtStartLine,
    Start,
    AtFiringLine,
    HitSuccessful,
    LeaveFiringLine,
    EnterPenalty,
    LeavePenalty,
    LapFinish,
    CantContinue,
    Disqualified,
    Finished,
    HitMissed,
}

impl EventKind {
    /// Look up an event kind by its code
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Register),
            2 => Some(Self::StartTimeLottery),
            3 => Some(Self::AtStartLine),
            4 => Some(Self::Start),
            5 => Some(Self::AtFiringLine),
            6 => Some(Self::HitSuccessful),
            7 => Some(Self::LeaveFiringLine),
            8 => Some(Self::EnterPenalty),
            9 => Some(Self::LeavePenalty),
            10 => Some(Self::LapFinish),
            11 => Some(Self::CantContinue),
            32 => Some(Self::Disqualified),
            33 => Some(Self::Finished),
            61 => Some(Self::HitMissed),
            _ => None,
        }
    }

    /// Wire code of this event kind
    pub fn code(&self) -> u32 {
        match self {
            Self::Register => 1,
            Self::StartTimeLottery => 2,
            Self::AtStartLine => 3,
            Self::Start => 4,
            Self::AtFiringLine => 5,
            Self::HitSuccessful => 6,
            Self::LeaveFiringLine => 7,
            Self::EnterPenalty => 8,
            Self::LeavePenalty => 9,
            Self::LapFinish => 10,
            Self::CantContinue => 11,
            Self::Disqualified => 32,
            Self::Finished => 33,
            Self::HitMissed => 61,
        }
    }
}

/// A decoded competitor event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceEvent {
    pub time: NaiveTime,
    /// Raw event code; codes without a known [`EventKind`] are kept so they can be ignored downstream
    pub code: u32,
    pub athlete_id: u32,
    pub params: Vec<String>,
}

impl RaceEvent {
    /// Build an event of a known kind
    pub fn new(time: NaiveTime, kind: EventKind, athlete_id: u32) -> Self {
        Self {
            time,
            code: kind.code(),
            athlete_id,
            params: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Kind of this event, if the code is known
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_code(self.code)
    }

    /// First parameter, if any
    pub fn param(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    /// Decode one line of an events file
    pub fn parse(line: &str) -> Result<Self, DecodeError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Err(DecodeError::Empty);
        }
        if parts.len() < 3 {
            return Err(DecodeError::MissingFields(parts.len()));
        }

        let stamp = parts[0].trim_start_matches('[').trim_end_matches(']');
        let time = parse_time_of_day(stamp)
            .ok_or_else(|| DecodeError::Timestamp(parts[0].to_string()))?;
        let code = parts[1]
            .parse()
            .map_err(|_| DecodeError::EventId(parts[1].to_string()))?;
        let athlete_id = parts[2]
            .parse()
            .map_err(|_| DecodeError::CompetitorId(parts[2].to_string()))?;

        Ok(Self {
            time,
            code,
            athlete_id,
            params: parts[3..].iter().map(|p| p.to_string()).collect(),
        })
    }
}

impl FromStr for RaceEvent {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", format_time_of_day(self.time), self.code, self.athlete_id)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let kinds = [
            (EventKind::Register, 1),
            (EventKind::StartTimeLottery, 2),
            (EventKind::AtStartLine, 3),
            (EventKind::Start, 4),
            (EventKind::AtFiringLine, 5),
            (EventKind::HitSuccessful, 6),
            (EventKind::LeaveFiringLine, 7),
            (EventKind::EnterPenalty, 8),
            (EventKind::LeavePenalty, 9),
            (EventKind::LapFinish, 10),
            (EventKind::CantContinue, 11),
            (EventKind::Disqualified, 32),
            (EventKind::Finished, 33),
            (EventKind::HitMissed, 61),
        ];
        for (kind, code) in kinds {
            assert_eq!(kind.code(), code);
            assert_eq!(EventKind::from_code(code), Some(kind));
        }
        assert_eq!(EventKind::from_code(12), None);
    }

    #[test]
    fn test_parse_basic() {
        let event = RaceEvent::parse("[09:05:59.867] 1 1").unwrap();
        assert_eq!(format_time_of_day(event.time), "09:05:59.867");
        assert_eq!(event.kind(), Some(EventKind::Register));
        assert_eq!(event.athlete_id, 1);
        assert!(event.params.is_empty());
    }

    #[test]
    fn test_parse_params() {
        let event: RaceEvent = "[09:15:00.841] 2 1 09:30:00.000".parse().unwrap();
        assert_eq!(event.kind(), Some(EventKind::StartTimeLottery));
        assert_eq!(event.param(), Some("09:30:00.000"));

        let event = RaceEvent::parse("[10:00:00.000] 11 3 Lost in the forest").unwrap();
        assert_eq!(event.params, vec!["Lost", "in", "the", "forest"]);
    }

    #[test]
    fn test_parse_unknown_code_is_kept() {
        let event = RaceEvent::parse("[10:00:00.000] 99 1").unwrap();
        assert_eq!(event.code, 99);
        assert_eq!(event.kind(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(RaceEvent::parse("   "), Err(DecodeError::Empty));
        assert_eq!(RaceEvent::parse("[10:00:00.000] 1"), Err(DecodeError::MissingFields(2)));
        assert!(matches!(RaceEvent::parse("[10:00] 1 1"), Err(DecodeError::Timestamp(_))));
        assert!(matches!(RaceEvent::parse("[10:00:00.000] x 1"), Err(DecodeError::EventId(_))));
        assert!(matches!(RaceEvent::parse("[10:00:00.000] 1 -4"), Err(DecodeError::CompetitorId(_))));
    }

    #[test]
    fn test_display() {
        let time = parse_time_of_day("09:59:45.000").unwrap();
        let event = RaceEvent::new(time, EventKind::AtFiringLine, 1).with_param("1");
        assert_eq!(event.to_string(), "[09:59:45.000] 5 1 1");
    }
}
