//! Per-day focus statistics.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Calendar day used as the daily log key. Serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

/// Supplies the current day to the engine.
///
/// Any `Fn() -> DateKey` closure is a date source, so tests can pin or
/// advance the day without touching the system clock.
pub trait DateSource {
    fn today(&self) -> DateKey;
}

/// Local calendar date from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDate;

impl DateSource for SystemDate {
    fn today(&self) -> DateKey {
        DateKey(Local::now().date_naive())
    }
}

impl<F> DateSource for F
where
    F: Fn() -> DateKey,
{
    fn today(&self) -> DateKey {
        self()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub sessions_completed: u32,
    pub minutes: u32,
}

/// Focus minutes and completed work sessions per day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog(BTreeMap<DateKey, DailyStats>);

impl DailyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed work session worth `minutes` on `date`.
    pub fn record_session(&mut self, date: DateKey, minutes: u32) {
        let entry = self.0.entry(date).or_default();
        entry.sessions_completed = entry.sessions_completed.saturating_add(1);
        entry.minutes = entry.minutes.saturating_add(minutes);
    }

    /// Stats for `date`, zero if nothing was recorded.
    pub fn get(&self, date: DateKey) -> DailyStats {
        self.0.get(&date).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &DailyStats)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> DateKey {
        DateKey::from_ymd(2026, 3, d).unwrap()
    }

    #[test]
    fn date_key_display_and_parse() {
        let key = day(7);
        assert_eq!(key.to_string(), "2026-03-07");
        assert_eq!("2026-03-07".parse::<DateKey>().unwrap(), key);
        assert!("07/03/2026".parse::<DateKey>().is_err());
    }

    #[test]
    fn closures_are_date_sources() {
        let src = || day(9);
        assert_eq!(src.today(), day(9));
    }

    #[test]
    fn record_accumulates_per_day() {
        let mut log = DailyLog::new();
        log.record_session(day(1), 25);
        log.record_session(day(1), 25);
        log.record_session(day(2), 10);
        assert_eq!(
            log.get(day(1)),
            DailyStats {
                sessions_completed: 2,
                minutes: 50
            }
        );
        assert_eq!(log.get(day(2)).minutes, 10);
        assert_eq!(log.get(day(3)), DailyStats::default());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn serializes_as_date_keyed_map() {
        let mut log = DailyLog::new();
        log.record_session(day(1), 25);
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(
            json,
            r#"{"2026-03-01":{"sessions_completed":1,"minutes":25}}"#
        );
        let back: DailyLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
