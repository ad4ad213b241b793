//! Markdown and JSON output for a mapped calendar.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, START_DATE_FORMAT};
use crate::error::ScheduleResult;
use crate::roster::Roster;
use crate::rounds::Group;

/// Separator between groups sharing one table cell.
pub const GROUP_SEPARATOR: &str = ",<br>";

/// Output knobs for the markdown table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append the date to the weekday name.
    pub with_dates: bool,
}

/// Name-resolved view of one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub weekday: String,
    pub groups: Vec<Vec<String>>,
}

/// Name-resolved view of one week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekView {
    pub label: String,
    pub days: Vec<DayView>,
}

/// Name-resolved view of a whole calendar, as written to JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarView {
    pub weeks: Vec<WeekView>,
}

impl CalendarView {
    /// Resolve groups through `roster` when it carries names; otherwise
    /// members are shown by index.
    pub fn build(calendar: &Calendar, roster: Option<&Roster>) -> Self {
        let weeks = calendar
            .weeks()
            .iter()
            .map(|week| WeekView {
                label: week.label(),
                days: week
                    .days
                    .iter()
                    .map(|day| DayView {
                        date: day.date,
                        weekday: day.date.format("%A").to_string(),
                        groups: day
                            .round
                            .groups()
                            .iter()
                            .map(|g| resolve(g, roster))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { weeks }
    }
}

fn resolve(group: &Group, roster: Option<&Roster>) -> Vec<String> {
    match roster {
        Some(roster) if roster.has_names() => roster.resolve(group),
        _ => group.members().iter().map(|id| id.to_string()).collect(),
    }
}

/// Render one markdown table per week.
pub fn render_markdown(
    calendar: &Calendar,
    roster: Option<&Roster>,
    options: RenderOptions,
) -> String {
    let view = CalendarView::build(calendar, roster);
    let mut out = String::new();

    for (i, week) in view.weeks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}\n\n", week.label));
        out.push_str("|day of week|groups|\n|---|---|\n");
        for day in &week.days {
            let label = if options.with_dates {
                format!("{} {}", day.weekday, day.date.format(START_DATE_FORMAT))
            } else {
                day.weekday.clone()
            };
            let groups: Vec<String> = day
                .groups
                .iter()
                .map(|members| format!("({})", members.join(", ")))
                .collect();
            out.push_str(&format!("|{}|{}|\n", label, groups.join(GROUP_SEPARATOR)));
        }
    }
    out
}

/// Render the name-resolved calendar as pretty JSON.
pub fn render_json(calendar: &Calendar, roster: Option<&Roster>) -> ScheduleResult<String> {
    let view = CalendarView::build(calendar, roster);
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Write the markdown tables to `path`.
pub fn write_markdown(
    path: &Path,
    calendar: &Calendar,
    roster: Option<&Roster>,
    options: RenderOptions,
) -> ScheduleResult<()> {
    std::fs::write(path, render_markdown(calendar, roster, options))?;
    Ok(())
}

/// Write the JSON view to `path`.
pub fn write_json(path: &Path, calendar: &Calendar, roster: Option<&Roster>) -> ScheduleResult<()> {
    std::fs::write(path, render_json(calendar, roster)?)?;
    Ok(())
}
