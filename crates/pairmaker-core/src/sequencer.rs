//! Reordering rounds so that triples never repeat a member on adjacent days.
//!
//! Triple-bearing rounds are nodes of a conflict relation (two nodes
//! conflict when their triples share a participant). A valid order is a
//! Hamiltonian path in the complement of that relation. [`TripleSequencer`]
//! searches for one by randomized chain building: start from one node,
//! repeatedly draw an unplaced node and attach it to whichever end of the
//! chain it does not conflict with. An attempt is abandoned after
//! `pick_budget` draws and the whole procedure restarts, up to
//! `max_attempts` times.
//!
//! Pair-only rounds keep their positions; the chain is written back into
//! the slots that triple-bearing rounds occupied.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SequencingPolicy;
use crate::error::{ScheduleError, ScheduleResult};
use crate::obs;
use crate::rounds::{Group, Round, Schedule};

/// Outcome metrics of one sequencing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencingReport {
    /// Number of triple-bearing rounds.
    pub triples: usize,
    /// Chain-building attempts made.
    pub attempts: usize,
    /// Attempts beyond the first.
    pub retries: usize,
    /// `false` when a fallback ordering was used.
    pub converged: bool,
    /// Adjacent triple-bearing rounds that share a participant in the output.
    pub adjacent_conflicts: usize,
}

/// Symmetric conflict relation between triples.
#[derive(Debug, Clone)]
pub struct ConflictGraph {
    size: usize,
    edges: Vec<bool>,
}

impl ConflictGraph {
    pub fn new(triples: &[Group]) -> Self {
        let size = triples.len();
        let mut edges = vec![false; size * size];
        for a in 0..size {
            for b in (a + 1)..size {
                if triples[a].overlaps(&triples[b]) {
                    edges[a * size + b] = true;
                    edges[b * size + a] = true;
                }
            }
        }
        Self { size, edges }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn conflicts(&self, a: usize, b: usize) -> bool {
        self.edges[a * self.size + b]
    }

    /// A node that conflicts with every other node, if any.
    ///
    /// With two or more nodes such a node has no valid neighbour, so no
    /// conflict-free chain exists.
    pub fn isolated_node(&self) -> Option<usize> {
        if self.size < 2 {
            return None;
        }
        (0..self.size).find(|&a| (0..self.size).all(|b| a == b || self.conflicts(a, b)))
    }
}

/// Result of a single chain-building attempt.
#[derive(Debug, Clone)]
struct Attempt {
    chain: VecDeque<usize>,
    unplaced: Vec<usize>,
}

impl Attempt {
    fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    fn into_order(self) -> Vec<usize> {
        let mut order: Vec<usize> = self.chain.into();
        let mut rest = self.unplaced;
        rest.sort_unstable();
        order.extend(rest);
        order
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStatus {
    Converged,
    /// Every attempt ran out of picks.
    Exhausted,
    /// `node` conflicts with all other nodes; no attempt was made.
    Infeasible { node: usize },
}

/// Node order chosen by [`TripleSequencer::search`].
#[derive(Debug, Clone)]
struct Search {
    order: Vec<usize>,
    attempts: usize,
    status: SearchStatus,
}

/// Randomized, bounded search for a conflict-free triple ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleSequencer {
    policy: SequencingPolicy,
}

impl TripleSequencer {
    pub fn new(policy: SequencingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SequencingPolicy {
        &self.policy
    }

    /// Reorder `schedule`. The output is a permutation of the input rounds;
    /// no group is changed.
    ///
    /// With fewer than two triples there is nothing to constrain and the
    /// rounds are simply shuffled.
    pub fn sequence<R: Rng + ?Sized>(
        &self,
        schedule: Schedule,
        rng: &mut R,
    ) -> ScheduleResult<(Schedule, SequencingReport)> {
        let mut rounds = schedule.into_rounds();
        let slots: Vec<usize> = rounds
            .iter()
            .enumerate()
            .filter(|(_, r)| r.has_triple())
            .map(|(i, _)| i)
            .collect();

        if slots.len() < 2 {
            rounds.shuffle(rng);
            let report = SequencingReport {
                triples: slots.len(),
                attempts: 0,
                retries: 0,
                converged: true,
                adjacent_conflicts: 0,
            };
            obs::emit_sequencing_finished(&report);
            return Ok((Schedule::new(rounds), report));
        }

        let triples: Vec<Group> = slots
            .iter()
            .filter_map(|&i| rounds[i].triple().cloned())
            .collect();
        let graph = ConflictGraph::new(&triples);

        let search = self.search(&graph, rng);
        let converged = search.status == SearchStatus::Converged;
        if !converged {
            if !self.policy.allow_fallback {
                return Err(match search.status {
                    SearchStatus::Infeasible { node } => ScheduleError::InfeasibleSequencing {
                        round: slots[node],
                        triples: graph.len(),
                    },
                    _ => ScheduleError::NonConvergentSequencing {
                        attempts: search.attempts,
                        triples: graph.len(),
                    },
                });
            }
            warn!(
                attempts = search.attempts,
                triples = graph.len(),
                "no conflict-free triple order found, using best partial order"
            );
        }

        place_chain(&mut rounds, &slots, &search.order);

        let report = SequencingReport {
            triples: graph.len(),
            attempts: search.attempts,
            retries: search.attempts.saturating_sub(1),
            converged,
            adjacent_conflicts: count_adjacent_conflicts(&rounds),
        };
        obs::emit_sequencing_finished(&report);
        Ok((Schedule::new(rounds), report))
    }

    fn search<R: Rng + ?Sized>(&self, graph: &ConflictGraph, rng: &mut R) -> Search {
        if let Some(node) = graph.isolated_node() {
            debug!(node = node, "triple overlaps every other triple, skipping search");
            return Search {
                order: (0..graph.len()).collect(),
                attempts: 0,
                status: SearchStatus::Infeasible { node },
            };
        }

        let mut best: Option<Attempt> = None;
        for attempt_no in 1..=self.policy.max_attempts {
            let attempt = build_chain(graph, self.policy.pick_budget, rng);
            if attempt.is_complete() {
                return Search {
                    order: attempt.into_order(),
                    attempts: attempt_no,
                    status: SearchStatus::Converged,
                };
            }
            debug!(
                attempt = attempt_no,
                placed = attempt.chain.len(),
                unplaced = attempt.unplaced.len(),
                "chain attempt exhausted its pick budget"
            );
            if best
                .as_ref()
                .map_or(true, |b| attempt.chain.len() > b.chain.len())
            {
                best = Some(attempt);
            }
        }

        Search {
            order: best.map_or_else(|| (0..graph.len()).collect(), Attempt::into_order),
            attempts: self.policy.max_attempts,
            status: SearchStatus::Exhausted,
        }
    }
}

fn build_chain<R: Rng + ?Sized>(
    graph: &ConflictGraph,
    pick_budget: usize,
    rng: &mut R,
) -> Attempt {
    let mut unplaced: Vec<usize> = (0..graph.len()).collect();
    let first = unplaced.swap_remove(rng.random_range(0..unplaced.len()));

    let mut chain = VecDeque::with_capacity(graph.len());
    chain.push_back(first);
    let (mut head, mut tail) = (first, first);

    let mut picks = 0;
    while !unplaced.is_empty() && picks < pick_budget {
        picks += 1;
        let at = rng.random_range(0..unplaced.len());
        let node = unplaced[at];
        if !graph.conflicts(node, tail) {
            chain.push_back(node);
            tail = node;
        } else if !graph.conflicts(node, head) {
            chain.push_front(node);
            head = node;
        } else {
            continue;
        }
        unplaced.swap_remove(at);
    }

    Attempt { chain, unplaced }
}

/// Write triple-bearing rounds back into `slots` following `order`.
fn place_chain(rounds: &mut [Round], slots: &[usize], order: &[usize]) {
    let originals: Vec<Round> = slots.iter().map(|&i| rounds[i].clone()).collect();
    for (&slot, &node) in slots.iter().zip(order) {
        rounds[slot] = originals[node].clone();
    }
}

/// Count consecutive rounds whose triples share a participant.
pub fn count_adjacent_conflicts(rounds: &[Round]) -> usize {
    rounds
        .windows(2)
        .filter(|w| match (w[0].triple(), w[1].triple()) {
            (Some(a), Some(b)) => a.overlaps(b),
            _ => false,
        })
        .count()
}
