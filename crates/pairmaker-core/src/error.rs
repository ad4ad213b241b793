//! Error types for roster setup, round generation and sequencing.

use thiserror::Error;

/// Errors produced while building a pairing schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The roster is too small, empty, unreadable or contains duplicates.
    #[error("invalid roster: {reason}")]
    InvalidRoster { reason: String },

    /// The start date could not be parsed.
    #[error("invalid start date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    /// A generated round is not a partition of the active participants.
    ///
    /// This is a logic bug, never a user error.
    #[error("invariant violated in round {round}: {detail}")]
    InvariantViolation { round: usize, detail: String },

    /// The triple sequencer exhausted its attempt ceiling.
    #[error("could not order {triples} triple rounds without adjacent overlap after {attempts} attempts")]
    NonConvergentSequencing { attempts: usize, triples: usize },

    /// One triple shares a participant with every other triple, so no
    /// ordering can keep it apart from its neighbours.
    #[error(
        "triple round {round} overlaps every other of the {triples} triple rounds; \
         no order without adjacent overlap exists"
    )]
    InfeasibleSequencing { round: usize, triples: usize },

    /// Writing rendered output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialising the calendar failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScheduleError {
    pub(crate) fn invalid_roster(reason: impl Into<String>) -> Self {
        Self::InvalidRoster {
            reason: reason.into(),
        }
    }
}

/// Convenience result alias.
pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
