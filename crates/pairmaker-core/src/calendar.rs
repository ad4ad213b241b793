//! Business-day calendar layout.
//!
//! [`map_calendar`] walks forward from the start date, skipping Saturdays
//! and Sundays, and assigns one round per business day. Days are grouped
//! into weeks; a new week opens on the first business day after a weekend.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::rounds::Round;

/// Accepted start date format: `MM/DD/YYYY`.
pub const START_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse a start date in `MM/DD/YYYY` form.
pub fn parse_start_date(input: &str) -> ScheduleResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), START_DATE_FORMAT).map_err(|e| {
        ScheduleError::InvalidDate {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// One business day and the round assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub round: Round,
}

/// A calendar week of scheduled days, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub number: usize,
    pub days: Vec<ScheduledDay>,
}

impl Week {
    fn new(number: usize) -> Self {
        Self {
            number,
            days: Vec::new(),
        }
    }

    pub fn label(&self) -> String {
        format!("week {}", self.number)
    }
}

/// Week-by-week assignment of rounds to business days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub start: NaiveDate,
    pub weeks: Vec<Week>,
}

impl Calendar {
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn days(&self) -> impl Iterator<Item = &ScheduledDay> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn day_count(&self) -> usize {
        self.weeks.iter().map(|w| w.days.len()).sum()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days().last().map(|d| d.date)
    }
}

/// Assign `rounds` in order to consecutive business days from `start`.
///
/// With `shuffle_groups`, each day's groups are shuffled for display; this
/// does not change who meets whom.
pub fn map_calendar<R: Rng + ?Sized>(
    start: NaiveDate,
    rounds: &[Round],
    shuffle_groups: bool,
    rng: &mut R,
) -> ScheduleResult<Calendar> {
    let mut weeks = Vec::new();
    let mut current = Week::new(1);
    let mut day = start;

    for round in rounds {
        while !is_business_day(day) {
            day = next_day(start, day)?;
        }
        if day.weekday() == Weekday::Mon && !current.days.is_empty() {
            let number = current.number + 1;
            weeks.push(std::mem::replace(&mut current, Week::new(number)));
        }

        let round = if shuffle_groups {
            round.shuffled(rng)
        } else {
            round.clone()
        };
        current.days.push(ScheduledDay {
            date: day,
            weekday: day.weekday(),
            round,
        });
        day = next_day(start, day)?;
    }

    if !current.days.is_empty() {
        weeks.push(current);
    }

    let calendar = Calendar { start, weeks };
    crate::obs::emit_calendar_mapped(&calendar);
    Ok(calendar)
}

fn next_day(start: NaiveDate, day: NaiveDate) -> ScheduleResult<NaiveDate> {
    day.succ_opt().ok_or_else(|| ScheduleError::InvalidDate {
        input: start.format(START_DATE_FORMAT).to_string(),
        reason: "schedule runs past the last representable date".to_string(),
    })
}
