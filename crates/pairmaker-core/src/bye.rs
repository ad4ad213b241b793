//! Odd-roster accommodation.
//!
//! Every round of an odd roster contains exactly one pair with the
//! placeholder. [`merge_byes`] drops that pair and adds the placeholder's
//! partner (the "solo" participant) to one of the round's real pairs,
//! producing one triple per round.
//!
//! The solo participant stays in its own round. Moving it to a neighbouring
//! round would put it in that round twice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::roster::Roster;
use crate::rounds::{Group, ParticipantId, Schedule};

/// How often each participant has been in a pair that absorbed a solo member.
///
/// Counts are keyed by roster index and only meaningful for the roster they
/// were recorded against. Use [`LoadTracker::carry`] and
/// [`LoadTracker::resume`] to hand load from one run to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTracker {
    counts: BTreeMap<ParticipantId, u32>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, id: ParticipantId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Summed load of all members of `group`.
    pub fn load_of(&self, group: &Group) -> u32 {
        group.members().iter().map(|&id| self.count(id)).sum()
    }

    pub fn record(&mut self, group: &Group) {
        for &id in group.members() {
            *self.counts.entry(id).or_default() += 1;
        }
    }

    /// Total number of absorptions recorded, counted once per group.
    pub fn total(&self) -> u32 {
        self.counts.values().sum::<u32>() / 2
    }

    /// Re-key the counts by participant label so they survive a reshuffled
    /// roster.
    pub fn carry(&self, roster: &Roster) -> CarriedLoad {
        let counts = self
            .counts
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&id, &count)| (roster.label_of(id), count))
            .collect();
        CarriedLoad { counts }
    }

    /// Map carried counts onto the indices of `roster`. Labels the roster
    /// does not know are dropped.
    pub fn resume(carried: &CarriedLoad, roster: &Roster) -> Self {
        let mut counts = BTreeMap::new();
        for (label, &count) in &carried.counts {
            match roster.index_of(label) {
                Some(id) => {
                    counts.insert(id, count);
                }
                None => tracing::debug!(label = %label, "dropping load of unknown participant"),
            }
        }
        Self { counts }
    }
}

/// Absorption counts keyed by participant label (name, or index for an
/// unnamed roster).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarriedLoad {
    counts: BTreeMap<String, u32>,
}

impl CarriedLoad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum::<u32>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Replace every placeholder pair with a triple inside the same round.
///
/// Returns the number of triples created. The host pair is the one with the
/// lowest summed load; ties go to the earliest pair in the round.
pub fn merge_byes(
    schedule: &mut Schedule,
    placeholder: ParticipantId,
    active: &[ParticipantId],
    load: &mut LoadTracker,
) -> ScheduleResult<usize> {
    let mut triples = 0;

    for (position, round) in schedule.rounds_mut().iter_mut().enumerate() {
        let groups = round.groups_mut();
        let Some(bye_at) = groups.iter().position(|g| g.contains(placeholder)) else {
            continue;
        };

        let bye = groups.remove(bye_at);
        let solo = bye
            .members()
            .iter()
            .copied()
            .find(|&id| id != placeholder)
            .ok_or_else(|| ScheduleError::InvariantViolation {
                round: position,
                detail: "placeholder group has no real member".to_string(),
            })?;

        let host_at = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.len() == 2)
            .min_by_key(|(i, g)| (load.load_of(g), *i))
            .map(|(i, _)| i)
            .ok_or_else(|| ScheduleError::InvariantViolation {
                round: position,
                detail: format!("no pair available to absorb participant {solo}"),
            })?;

        load.record(&groups[host_at]);
        let host = groups.remove(host_at);
        groups.insert(host_at, host.absorb(solo));
        triples += 1;

        tracing::debug!(round = position, solo = solo, "merged bye into triple");
    }

    schedule.validate(active)?;
    Ok(triples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::{generate_rounds, Round};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_five_participants_yield_five_distinct_triples() {
        let mut schedule = generate_rounds(6).unwrap();
        let mut load = LoadTracker::new();
        let active: Vec<_> = (0..5).collect();

        let triples = merge_byes(&mut schedule, 5, &active, &mut load).unwrap();
        assert_eq!(triples, 5);
        assert_eq!(schedule.triple_count(), 5);

        let mut distinct = HashSet::new();
        for round in schedule.rounds() {
            assert!(round.participants().all(|id| id != 5));
            assert_eq!(round.groups().len(), 2);
            let mut members = round.triple().unwrap().members().to_vec();
            members.sort_unstable();
            distinct.insert(members);
        }
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_first_round_uses_earliest_pair_on_tie() {
        let mut schedule = generate_rounds(6).unwrap();
        let mut load = LoadTracker::new();
        let active: Vec<_> = (0..5).collect();
        merge_byes(&mut schedule, 5, &active, &mut load).unwrap();

        // Round 0 was (0,5) (1,4) (2,3): 0 is solo and joins (1,4).
        assert_eq!(
            schedule.rounds()[0].groups(),
            &[Group::from_members(vec![1, 4, 0]), Group::pair(2, 3)]
        );
        assert_eq!(load.count(1), 1);
        assert_eq!(load.count(4), 1);
    }

    #[test]
    fn test_prior_load_steers_host_choice() {
        let mut schedule = generate_rounds(6).unwrap();
        let mut load = LoadTracker::new();
        load.record(&Group::pair(1, 4));
        let active: Vec<_> = (0..5).collect();
        merge_byes(&mut schedule, 5, &active, &mut load).unwrap();

        assert_eq!(
            schedule.rounds()[0].groups(),
            &[Group::pair(1, 4), Group::from_members(vec![2, 3, 0])]
        );
    }

    #[test]
    fn test_load_spreads_across_participants() {
        let mut schedule = generate_rounds(12).unwrap();
        let mut load = LoadTracker::new();
        let active: Vec<_> = (0..11).collect();
        merge_byes(&mut schedule, 11, &active, &mut load).unwrap();

        assert_eq!(load.total(), 11);
        let max = active.iter().map(|&id| load.count(id)).max().unwrap();
        assert!(max <= 3, "load too concentrated: {load:?}");
    }

    #[test]
    fn test_round_without_placeholder_untouched() {
        let original = Round::new(vec![Group::pair(0, 1), Group::pair(2, 3)]);
        let mut schedule = Schedule::new(vec![original.clone()]);
        let mut load = LoadTracker::new();
        let triples = merge_byes(&mut schedule, 9, &[0, 1, 2, 3], &mut load).unwrap();
        assert_eq!(triples, 0);
        assert_eq!(schedule.rounds()[0], original);
    }

    #[test]
    fn test_missing_host_pair_is_invariant_violation() {
        let mut schedule = Schedule::new(vec![Round::new(vec![Group::pair(0, 1)])]);
        let mut load = LoadTracker::new();
        let err = merge_byes(&mut schedule, 1, &[0], &mut load).unwrap_err();
        assert!(matches!(err, ScheduleError::InvariantViolation { round: 0, .. }));
    }

    #[test]
    fn test_carried_load_lands_on_the_same_names() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = Roster::from_names(names(&["Ada", "Bo", "Cy", "Di"]), &mut rng).unwrap();
        let mut load = LoadTracker::new();
        let ada = first.index_of("Ada").unwrap();
        let cy = first.index_of("Cy").unwrap();
        load.record(&Group::pair(ada, cy));

        let carried = load.carry(&first);
        assert_eq!(carried.count("Ada"), 1);
        assert_eq!(carried.count("Cy"), 1);
        assert_eq!(carried.total(), 1);

        let mut rng = StdRng::seed_from_u64(2);
        let second = Roster::from_names(names(&["Di", "Cy", "Bo", "Ada"]), &mut rng).unwrap();
        let resumed = LoadTracker::resume(&carried, &second);
        for name in ["Ada", "Bo", "Cy", "Di"] {
            let id = second.index_of(name).unwrap();
            assert_eq!(resumed.count(id), carried.count(name), "{name}");
        }
    }

    #[test]
    fn test_resume_drops_departed_participants() {
        let mut carried_from = LoadTracker::new();
        carried_from.record(&Group::pair(4, 5));
        let carried = carried_from.carry(&Roster::from_count(6).unwrap());

        // Index 5 is the placeholder of a five-person roster.
        let resumed = LoadTracker::resume(&carried, &Roster::from_count(5).unwrap());
        assert_eq!(resumed.count(4), 1);
        assert_eq!(resumed.count(5), 0);
    }
}
