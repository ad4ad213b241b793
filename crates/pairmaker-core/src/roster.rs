//! Roster setup: participant count normalisation and name resolution.
//!
//! An odd roster is padded with one placeholder index so the circle method
//! can run on an even working size. The placeholder never reaches output;
//! the bye merger folds its partner into a triple.

use std::collections::HashSet;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ScheduleError, ScheduleResult};
use crate::rounds::{Group, ParticipantId};

/// Normalised roster: working size, placeholder slot and optional names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    working_size: usize,
    placeholder: Option<ParticipantId>,
    /// One entry per working index; `None` marks the placeholder slot.
    names: Option<Vec<Option<String>>>,
}

impl Roster {
    /// Index-only roster of `n` participants.
    ///
    /// When `n` is odd the placeholder is the last index, `n`.
    pub fn from_count(n: usize) -> ScheduleResult<Self> {
        check_size(n)?;
        let (working_size, placeholder) = if n % 2 == 1 {
            (n + 1, Some(n))
        } else {
            (n, None)
        };
        Ok(Self {
            working_size,
            placeholder,
            names: None,
        })
    }

    /// Roster from participant names, shuffled once with `rng`.
    ///
    /// For an odd roster the placeholder joins the shuffle, so it lands on a
    /// random index which is recorded for later lookup.
    pub fn from_names<R: Rng + ?Sized>(names: Vec<String>, rng: &mut R) -> ScheduleResult<Self> {
        check_size(names.len())?;

        let mut seen = HashSet::with_capacity(names.len());
        if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(ScheduleError::invalid_roster(format!(
                "duplicate participant name '{dup}'"
            )));
        }

        let odd = names.len() % 2 == 1;
        let mut slots: Vec<Option<String>> = names.into_iter().map(Some).collect();
        if odd {
            slots.push(None);
        }
        slots.shuffle(rng);

        let placeholder = slots.iter().position(Option::is_none);
        Ok(Self {
            working_size: slots.len(),
            placeholder,
            names: Some(slots),
        })
    }

    /// Parse names from text, one per line; blank lines are skipped.
    pub fn parse_names(text: &str) -> ScheduleResult<Vec<String>> {
        let names: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(ScheduleError::invalid_roster("roster source is empty"));
        }
        Ok(names)
    }

    /// Read and parse a roster file.
    pub fn load_names(path: &Path) -> ScheduleResult<Vec<String>> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScheduleError::invalid_roster(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse_names(&text)
    }

    /// Size of the index space, including the placeholder.
    pub fn working_size(&self) -> usize {
        self.working_size
    }

    /// Number of real participants.
    pub fn participant_count(&self) -> usize {
        self.working_size - usize::from(self.placeholder.is_some())
    }

    pub fn placeholder(&self) -> Option<ParticipantId> {
        self.placeholder
    }

    pub fn has_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Rounds in one full cycle.
    pub fn cycle_length(&self) -> usize {
        self.working_size - 1
    }

    /// Groups per round before any bye merging.
    pub fn row_length(&self) -> usize {
        self.working_size / 2
    }

    pub fn has_names(&self) -> bool {
        self.names.is_some()
    }

    /// Real participant indices in ascending order.
    pub fn active(&self) -> Vec<ParticipantId> {
        (0..self.working_size)
            .filter(|id| Some(*id) != self.placeholder)
            .collect()
    }

    /// Name for an index, if this roster carries names.
    pub fn name_of(&self, id: ParticipantId) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|slots| slots.get(id))
            .and_then(|slot| slot.as_deref())
    }

    /// Stable label for an index: its name, or the index itself when the
    /// roster has no names.
    pub fn label_of(&self, id: ParticipantId) -> String {
        self.name_of(id)
            .map_or_else(|| id.to_string(), str::to_string)
    }

    /// Active participant carrying `label`, the inverse of [`Roster::label_of`].
    pub fn index_of(&self, label: &str) -> Option<ParticipantId> {
        match &self.names {
            Some(slots) => slots
                .iter()
                .position(|slot| slot.as_deref() == Some(label)),
            None => label
                .parse::<ParticipantId>()
                .ok()
                .filter(|&id| id < self.working_size && Some(id) != self.placeholder),
        }
    }

    /// Name-resolved view of a group. Falls back to the index when the
    /// roster has no names.
    pub fn resolve(&self, group: &Group) -> Vec<String> {
        group
            .members()
            .iter()
            .map(|&id| self.label_of(id))
            .collect()
    }
}

fn check_size(n: usize) -> ScheduleResult<()> {
    if n < 2 {
        return Err(ScheduleError::invalid_roster(format!(
            "need at least 2 participants, got {n}"
        )));
    }
    Ok(())
}
