//! End-to-end runs: roster setup through calendar layout.

use chrono::{NaiveDate, Weekday};
use pairmaker_core::{
    generate_rounds, merge_byes, render_markdown, LoadTracker, RenderOptions, Roster, Scheduler,
    SchedulerConfig,
};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

// ---- Five participants ----

#[test]
fn five_participants_pad_to_six_with_placeholder_five() {
    let roster = Roster::from_count(5).expect("roster");
    assert_eq!(roster.working_size(), 6);
    assert_eq!(roster.placeholder(), Some(5));

    let schedule = generate_rounds(roster.working_size()).expect("rounds");
    assert_eq!(schedule.len(), 5);
    for round in schedule.rounds() {
        assert_eq!(round.groups().len(), 3);
        let with_placeholder = round.groups().iter().filter(|g| g.contains(5)).count();
        assert_eq!(with_placeholder, 1);
    }
}

#[test]
fn five_participants_get_one_distinct_triple_per_round() {
    let mut schedule = generate_rounds(6).expect("rounds");
    let active: Vec<_> = (0..5).collect();
    let triples = merge_byes(&mut schedule, 5, &active, &mut LoadTracker::new()).expect("merge");
    assert_eq!(triples, 5);

    let mut seen = HashSet::new();
    for round in schedule.rounds() {
        assert!(round.participants().all(|id| id != 5));
        assert_eq!(round.groups().iter().filter(|g| g.is_triple()).count(), 1);
        let mut members = round.triple().expect("triple").members().to_vec();
        members.sort_unstable();
        assert!(seen.insert(members), "triples must be pairwise distinct");
    }
}

#[test]
fn five_participants_from_monday_fill_one_week() {
    let roster = Roster::from_count(5).expect("roster");
    let mut scheduler = Scheduler::new(roster, SchedulerConfig::new().with_seed(17));
    let run = scheduler.run(date(2016, 8, 1)).expect("run");

    assert_eq!(run.calendar.weeks().len(), 1);
    let weekdays: Vec<_> = run.calendar.days().map(|d| d.weekday).collect();
    assert_eq!(
        weekdays,
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri
        ]
    );
    // Every pair of 5-person triples overlaps, so only a fallback order exists.
    assert!(!run.sequencing.converged);
    assert_eq!(run.schedule.triple_count(), 5);
}

// ---- Four participants ----

#[test]
fn four_participants_from_thursday_skip_the_weekend() {
    let roster = Roster::from_count(4).expect("roster");
    let config = SchedulerConfig::new()
        .with_seed(4)
        .with_shuffle_display(false);
    let mut scheduler = Scheduler::new(roster, config);
    let run = scheduler.run(date(2016, 8, 4)).expect("run");

    assert_eq!(run.schedule.len(), 3);
    assert!(run
        .schedule
        .rounds()
        .iter()
        .all(|r| r.groups().len() == 2 && !r.has_triple()));
    assert_eq!(run.sequencing.triples, 0);
    assert_eq!(run.sequencing.attempts, 0);

    let weeks = run.calendar.weeks();
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].days.len(), 2);
    assert_eq!(weeks[0].days[0].weekday, Weekday::Thu);
    assert_eq!(weeks[0].days[1].weekday, Weekday::Fri);
    assert_eq!(weeks[1].days.len(), 1);
    assert_eq!(weeks[1].days[0].date, date(2016, 8, 8));

    let assigned: Vec<_> = run.calendar.days().map(|d| d.round.clone()).collect();
    assert_eq!(assigned, run.schedule.rounds().to_vec());
}

// ---- Named roster ----

#[test]
fn named_odd_roster_renders_names_only() {
    let names: Vec<String> = ('A'..='K').map(|c| c.to_string()).collect();
    let mut scheduler =
        Scheduler::from_names(names, SchedulerConfig::new().with_seed(23)).expect("roster");
    assert_eq!(scheduler.roster().participant_count(), 11);

    let run = scheduler.run(date(2016, 8, 1)).expect("run");
    let md = render_markdown(&run.calendar, Some(scheduler.roster()), RenderOptions::default());

    assert!(md.starts_with("week 1\n\n|day of week|groups|\n|---|---|\n|Monday|"));
    assert!(md.contains("week 3"));
    let rows = md
        .lines()
        .filter(|l| l.starts_with('|') && !l.starts_with("|day") && !l.starts_with("|---"));
    for row in rows {
        assert!(!row.chars().any(|c| c.is_ascii_digit()), "index leaked: {row}");
    }
    for day in run.calendar.days() {
        assert_eq!(day.round.groups().iter().filter(|g| g.is_triple()).count(), 1);
    }
}
