//! Structured observability hooks for scheduler stages.
//!
//! Each stage reports one `info!` event tagged with a dotted `event` name,
//! so a run can be followed with `RUST_LOG=pairmaker_core=info`.

use tracing::info;

use crate::calendar::Calendar;
use crate::sequencer::SequencingReport;

/// RAII guard that enters a run-scoped tracing span.
///
/// ```ignore
/// let _span = RunSpan::enter(11, Some(42));
/// // every stage event now carries participants=11 seed=42
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(participants: usize, seed: Option<u64>) -> Self {
        let span = tracing::info_span!("pairmaker.run", participants = participants, seed = ?seed);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: round-robin generated.
pub fn emit_rounds_generated(working_size: usize, rounds: usize) {
    info!(event = "rounds.generated", working_size = working_size, rounds = rounds);
}

/// Emit event: placeholder pairs folded into triples.
pub fn emit_byes_merged(placeholder: usize, triples: usize) {
    info!(event = "bye.merged", placeholder = placeholder, triples = triples);
}

/// Emit event: sequencing finished, converged or not.
pub fn emit_sequencing_finished(report: &SequencingReport) {
    info!(
        event = "sequencing.finished",
        triples = report.triples,
        attempts = report.attempts,
        retries = report.retries,
        converged = report.converged,
        adjacent_conflicts = report.adjacent_conflicts,
    );
}

/// Emit event: rounds laid out on the calendar.
pub fn emit_calendar_mapped(calendar: &Calendar) {
    info!(
        event = "calendar.mapped",
        weeks = calendar.weeks().len(),
        days = calendar.day_count(),
        last_day = ?calendar.last_day(),
    );
}
