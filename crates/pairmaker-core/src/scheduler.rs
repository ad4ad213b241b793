//! End-to-end scheduling run.
//!
//! [`Scheduler`] owns the roster, configuration, load tracker and random
//! source for one run and drives the stages in order: round generation,
//! bye merging, triple sequencing and calendar mapping.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::bye::{merge_byes, CarriedLoad, LoadTracker};
use crate::calendar::{map_calendar, Calendar};
use crate::config::SchedulerConfig;
use crate::error::ScheduleResult;
use crate::obs;
use crate::roster::Roster;
use crate::rounds::{generate_rounds, Schedule};
use crate::sequencer::{SequencingReport, TripleSequencer};

/// Everything produced by one run.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRun {
    /// Final round order.
    pub schedule: Schedule,
    /// Rounds laid out on business days.
    pub calendar: Calendar,
    pub sequencing: SequencingReport,
    /// Load after this run, keyed by participant; pass it to the next run to
    /// keep balancing.
    pub load: CarriedLoad,
}

/// Drives one scheduling run.
#[derive(Debug)]
pub struct Scheduler {
    roster: Roster,
    config: SchedulerConfig,
    load: LoadTracker,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(roster: Roster, config: SchedulerConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            roster,
            config,
            load: LoadTracker::new(),
            rng,
        }
    }

    /// Shuffle `names` into a roster with the run's own generator, so a
    /// seeded run is reproducible from one seed.
    pub fn from_names(names: Vec<String>, config: SchedulerConfig) -> ScheduleResult<Self> {
        let mut rng = seeded_rng(config.seed);
        let roster = Roster::from_names(names, &mut rng)?;
        Ok(Self {
            roster,
            config,
            load: LoadTracker::new(),
            rng,
        })
    }

    /// Start from the load recorded by an earlier run. Counts follow the
    /// participant even if this roster was shuffled differently.
    #[must_use]
    pub fn with_load(mut self, load: CarriedLoad) -> Self {
        self.load = LoadTracker::resume(&load, &self.roster);
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build the ordered round sequence without mapping it to dates.
    pub fn build_schedule(&mut self) -> ScheduleResult<(Schedule, SequencingReport)> {
        let active = self.roster.active();

        let mut schedule = generate_rounds(self.roster.working_size())?;
        obs::emit_rounds_generated(self.roster.working_size(), schedule.len());

        if let Some(placeholder) = self.roster.placeholder() {
            let triples = merge_byes(&mut schedule, placeholder, &active, &mut self.load)?;
            obs::emit_byes_merged(placeholder, triples);
        } else {
            schedule.validate(&active)?;
        }

        let sequencer = TripleSequencer::new(self.config.sequencing);
        let (schedule, report) = sequencer.sequence(schedule, &mut self.rng)?;
        schedule.validate(&active)?;
        Ok((schedule, report))
    }

    /// Run every stage and lay the rounds out from `start`.
    pub fn run(&mut self, start: NaiveDate) -> ScheduleResult<ScheduleRun> {
        let _span = obs::RunSpan::enter(self.roster.participant_count(), self.config.seed);

        let (schedule, sequencing) = self.build_schedule()?;
        let calendar = map_calendar(
            start,
            schedule.rounds(),
            self.config.shuffle_display,
            &mut self.rng,
        )?;

        Ok(ScheduleRun {
            schedule,
            calendar,
            sequencing,
            load: self.load.carry(&self.roster),
        })
    }
}

/// A seeded generator when `seed` is set, OS entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
