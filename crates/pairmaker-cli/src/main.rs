//! pairmaker - daily pairs until everyone has met everyone
//!
//! ```text
//! pairmaker <START_DATE> [OUTPUT]
//! ```
//!
//! Reads names from `students.txt` (one per line) unless `--participants`
//! asks for an index-only roster, then writes one markdown table per week
//! to `OUTPUT` (default `pairs.md`).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use pairmaker_core::{
    init_tracing, parse_start_date, write_json, write_markdown, RenderOptions, Roster,
    ScheduleRun, Scheduler, SchedulerConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_PICK_BUDGET,
};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "pairmaker")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Schedule daily pairs until every participant has met every other",
    long_about = None
)]
struct Cli {
    /// Start date of the schedule (MM/DD/YYYY)
    #[arg(value_parser = parse_date_arg)]
    start_date: NaiveDate,

    /// Output file
    #[arg(default_value = "pairs.md")]
    output: PathBuf,

    /// Roster file with one participant name per line
    #[arg(long, default_value = "students.txt", conflicts_with = "participants")]
    roster: PathBuf,

    /// Schedule this many unnamed participants instead of reading a roster
    #[arg(short = 'n', long)]
    participants: Option<usize>,

    /// Seed for a reproducible schedule
    #[arg(long, env = "PAIRMAKER_SEED")]
    seed: Option<u64>,

    /// Random picks per sequencing attempt
    #[arg(long, env = "PAIRMAKER_PICK_BUDGET", default_value_t = DEFAULT_PICK_BUDGET)]
    pick_budget: usize,

    /// Sequencing attempts before giving up
    #[arg(long, env = "PAIRMAKER_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Fail instead of accepting a best-effort triple order
    #[arg(long)]
    strict: bool,

    /// Show the date next to each weekday
    #[arg(long)]
    dates: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown tables, one per week
    Md,
    /// Name-resolved calendar as JSON
    Json,
}

impl Cli {
    fn config(&self) -> SchedulerConfig {
        let mut config = SchedulerConfig::new()
            .with_pick_budget(self.pick_budget)
            .with_max_attempts(self.max_attempts)
            .with_fallback(!self.strict);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }

    fn scheduler(&self) -> Result<Scheduler> {
        match self.participants {
            Some(n) => {
                let roster = Roster::from_count(n).context("Failed to set up roster")?;
                Ok(Scheduler::new(roster, self.config()))
            }
            None => {
                let names = Roster::load_names(&self.roster)
                    .with_context(|| format!("Failed to load roster from {:?}", self.roster))?;
                Scheduler::from_names(names, self.config()).context("Failed to set up roster")
            }
        }
    }
}

fn parse_date_arg(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_start_date(raw).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json_logs, level);

    let run = cmd_schedule(&cli)?;

    let sequencing = &run.sequencing;
    println!(
        "Scheduled {} rounds over {} weeks ({} sequencing retries{}) -> {:?}",
        run.schedule.len(),
        run.calendar.weeks().len(),
        sequencing.retries,
        if sequencing.converged {
            String::new()
        } else {
            format!(
                ", best effort: {} adjacent triple overlaps",
                sequencing.adjacent_conflicts
            )
        },
        cli.output
    );
    Ok(())
}

/// Build the schedule and write it to the requested output.
fn cmd_schedule(cli: &Cli) -> Result<ScheduleRun> {
    let mut scheduler = cli.scheduler()?;
    let roster = scheduler.roster();
    info!(
        participants = roster.participant_count(),
        placeholder = ?roster.placeholder(),
        "roster ready"
    );

    let run = scheduler
        .run(cli.start_date)
        .context("Failed to build schedule")?;

    let names = Some(scheduler.roster());
    let written = match cli.format {
        OutputFormat::Md => {
            let options = RenderOptions {
                with_dates: cli.dates,
            };
            write_markdown(&cli.output, &run.calendar, names, options)
        }
        OutputFormat::Json => write_json(&cli.output, &run.calendar, names),
    };
    written.with_context(|| format!("Failed to write {:?}", cli.output))?;

    info!(output = ?cli.output, "schedule written");
    Ok(run)
}
