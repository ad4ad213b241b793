//! pairmaker core library
//!
//! Builds a round-robin of small-group meetings where everyone meets
//! everyone once, folds the bye of an odd roster into a triple, orders the
//! rounds so triples never share a member on consecutive days, and lays the
//! result out on business days.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use pairmaker_core::{parse_start_date, render_markdown, RenderOptions, Roster, Scheduler, SchedulerConfig};
//!
//! let roster = Roster::from_count(9)?;
//! let run = Scheduler::new(roster, SchedulerConfig::new().with_seed(7))
//!     .run(parse_start_date("08/01/2016")?)?;
//! println!("{}", render_markdown(&run.calendar, None, RenderOptions::default()));
//! ```

pub mod bye;
pub mod calendar;
pub mod config;
pub mod error;
pub mod obs;
pub mod render;
pub mod roster;
pub mod rounds;
pub mod scheduler;
pub mod sequencer;
pub mod telemetry;

pub use bye::{merge_byes, CarriedLoad, LoadTracker};
pub use calendar::{
    is_business_day, map_calendar, parse_start_date, Calendar, ScheduledDay, Week,
    START_DATE_FORMAT,
};
pub use config::{SchedulerConfig, SequencingPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_PICK_BUDGET};
pub use error::{ScheduleError, ScheduleResult};
pub use render::{
    render_json, render_markdown, write_json, write_markdown, CalendarView, RenderOptions,
};
pub use roster::Roster;
pub use rounds::{generate_rounds, Group, ParticipantId, Round, Schedule};
pub use scheduler::{seeded_rng, ScheduleRun, Scheduler};
pub use sequencer::{count_adjacent_conflicts, ConflictGraph, SequencingReport, TripleSequencer};
pub use telemetry::init_tracing;

/// pairmaker version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
