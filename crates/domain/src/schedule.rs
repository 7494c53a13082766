//! Daily schedule — fixed local wall-clock times that repeat every day.

use chrono::{Days, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::ValidationError;

/// A non-empty, sorted set of times of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    times: Vec<NaiveTime>,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            times: vec![
                NaiveTime::MIN + TimeDelta::hours(8),
                NaiveTime::MIN + TimeDelta::hours(22),
            ],
        }
    }
}

impl DailySchedule {
    /// Parse `HH:MM` entries. Duplicates are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTime`] for a malformed entry and
    /// [`ValidationError::EmptySchedule`] when no entry is given.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, ValidationError> {
        let mut times = entries
            .iter()
            .map(|entry| {
                let entry = entry.as_ref().trim();
                NaiveTime::parse_from_str(entry, "%H:%M")
                    .map_err(|_| ValidationError::InvalidTime(entry.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if times.is_empty() {
            return Err(ValidationError::EmptySchedule);
        }
        times.sort_unstable();
        times.dedup();
        Ok(Self { times })
    }

    #[must_use]
    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    /// First scheduled instant strictly after `now`.
    #[must_use]
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        if let Some(time) = self.times.iter().find(|time| **time > now.time()) {
            return today.and_time(*time);
        }
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        tomorrow.and_time(self.times[0])
    }
}
