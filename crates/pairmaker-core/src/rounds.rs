//! Groups, rounds and the circle-method round generator.
//!
//! A [`Round`] partitions every active participant into disjoint
//! [`Group`]s. [`generate_rounds`] builds the full round-robin: over
//! `working_size - 1` rounds every unordered pair of indices shares a group
//! exactly once.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Index of a participant in `[0, working_size)`.
pub type ParticipantId = usize;

/// A pair or triple of participants meeting together in one round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Vec<ParticipantId>);

impl Group {
    /// Create a two-person group.
    pub fn pair(a: ParticipantId, b: ParticipantId) -> Self {
        Self(vec![a, b])
    }

    /// Create a group from explicit members.
    pub fn from_members(members: Vec<ParticipantId>) -> Self {
        Self(members)
    }

    /// Add `solo` to this group, turning a pair into a triple.
    pub fn absorb(mut self, solo: ParticipantId) -> Self {
        self.0.push(solo);
        self
    }

    pub fn members(&self) -> &[ParticipantId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_triple(&self) -> bool {
        self.0.len() == 3
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.0.contains(&id)
    }

    /// `true` when the two groups share at least one participant.
    pub fn overlaps(&self, other: &Group) -> bool {
        self.0.iter().any(|id| other.contains(*id))
    }
}

/// One meeting slot: every active participant in exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    groups: Vec<Group>,
}

impl Round {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut Vec<Group> {
        &mut self.groups
    }

    /// The round's triple, if it has one.
    pub fn triple(&self) -> Option<&Group> {
        self.groups.iter().find(|g| g.is_triple())
    }

    pub fn has_triple(&self) -> bool {
        self.triple().is_some()
    }

    /// All participants in this round, in group order.
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.groups.iter().flat_map(|g| g.members().iter().copied())
    }

    /// A copy of this round with its groups in random order.
    ///
    /// Group order carries no meaning; this only affects display.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut groups = self.groups.clone();
        groups.shuffle(rng);
        Self { groups }
    }

    /// Check that every id in `active` appears exactly once and nothing else does.
    ///
    /// `position` is only used for the error message.
    pub fn validate(&self, position: usize, active: &[ParticipantId]) -> ScheduleResult<()> {
        let upper = active
            .iter()
            .copied()
            .chain(self.participants())
            .max()
            .map_or(0, |m| m + 1);
        let mut seen = vec![0usize; upper];
        for id in self.participants() {
            seen[id] += 1;
        }

        for &id in active {
            match seen[id] {
                1 => seen[id] = 0,
                0 => {
                    return Err(ScheduleError::InvariantViolation {
                        round: position,
                        detail: format!("participant {id} is missing"),
                    })
                }
                n => {
                    return Err(ScheduleError::InvariantViolation {
                        round: position,
                        detail: format!("participant {id} appears {n} times"),
                    })
                }
            }
        }

        if let Some(stray) = seen.iter().position(|&n| n > 0) {
            return Err(ScheduleError::InvariantViolation {
                round: position,
                detail: format!("participant {stray} is not an active participant"),
            });
        }
        Ok(())
    }
}

/// Ordered sequence of rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    rounds: Vec<Round>,
}

impl Schedule {
    pub fn new(rounds: Vec<Round>) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub(crate) fn rounds_mut(&mut self) -> &mut Vec<Round> {
        &mut self.rounds
    }

    pub fn into_rounds(self) -> Vec<Round> {
        self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn triple_count(&self) -> usize {
        self.rounds.iter().filter(|r| r.has_triple()).count()
    }

    /// Validate every round against the same set of active participants.
    pub fn validate(&self, active: &[ParticipantId]) -> ScheduleResult<()> {
        self.rounds
            .iter()
            .enumerate()
            .try_for_each(|(i, round)| round.validate(i, active))
    }
}

/// Generate the round-robin for `working_size` indices using the circle method.
///
/// Index 0 stays fixed; the remaining indices form a ring rotated right by
/// `i` for round `i`. Position `k` is paired with position
/// `working_size - 1 - k` of the rotated sequence.
pub fn generate_rounds(working_size: usize) -> ScheduleResult<Schedule> {
    if working_size < 2 || working_size % 2 != 0 {
        return Err(ScheduleError::invalid_roster(format!(
            "working size must be even and at least 2, got {working_size}"
        )));
    }

    let ring: Vec<ParticipantId> = (1..working_size).collect();
    let row_length = working_size / 2;

    let rounds = (0..working_size - 1)
        .map(|shift| {
            let mut rotated = Vec::with_capacity(working_size);
            rotated.push(0);
            rotated.extend(rotate_right(&ring, shift));

            let groups = (0..row_length)
                .map(|k| Group::pair(rotated[k], rotated[working_size - 1 - k]))
                .collect();
            Round::new(groups)
        })
        .collect();

    Ok(Schedule::new(rounds))
}

fn rotate_right(ring: &[ParticipantId], shift: usize) -> Vec<ParticipantId> {
    let mut out = ring.to_vec();
    out.rotate_right(shift % ring.len());
    out
}
