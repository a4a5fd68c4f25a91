//! Genetic operators over schedules.
//!
//! A schedule's genome is its agent assignment vector; start times are
//! always derived by [`repair`], never inherited. Crossover and mutation
//! only ever pick capable agents, and repair rejects any assignment that
//! cannot be timed into a valid schedule.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

use std::sync::Arc;

use rand::seq::{index, IndexedRandom};
use rand::Rng;

use crate::models::Schedule;
use crate::solver::earliest_start;

/// Share of tasks reassigned by one mutation (at least one task).
const MUTATION_SHARE: f64 = 0.1;

/// Fitness of a makespan: `1000 / (makespan + 1)`.
///
/// Strictly decreasing in makespan and always positive.
#[inline]
pub fn fitness(makespan: i64) -> f64 {
    1000.0 / (makespan as f64 + 1.0)
}

/// Tournament selection.
///
/// Samples `size` distinct indices (fewer if the population is smaller) and
/// returns the one with the highest fitness; ties go to the first sampled.
///
/// # Panics
/// Panics if `fitness` is empty.
pub fn tournament_select<R: Rng>(fitness: &[f64], size: usize, rng: &mut R) -> usize {
    assert!(!fitness.is_empty(), "tournament over an empty population");
    let k = size.clamp(1, fitness.len());
    let mut sample = index::sample(rng, fitness.len(), k).into_iter();
    let first = sample.next().unwrap_or(0);
    sample.fold(first, |best, i| {
        if fitness[i] > fitness[best] {
            i
        } else {
            best
        }
    })
}

/// Uniform assignment crossover.
///
/// For each task the child takes parent 1's agent or parent 2's agent with
/// equal probability. Start times are regenerated by [`repair`].
/// Returns `None` if the mixed assignment cannot be repaired.
pub fn crossover<R: Rng>(parent1: &Schedule, parent2: &Schedule, rng: &mut R) -> Option<Schedule> {
    let mut child = parent1.clone();
    for i in 0..child.len() {
        let agent = if rng.random_bool(0.5) {
            parent1.slot(i).agent
        } else {
            parent2.slot(i).agent
        };
        match agent {
            Some(a) => child.set_agent(i, a),
            None => child.clear(i),
        }
    }
    repair(&mut child).then_some(child)
}

/// Reassignment mutation.
///
/// Picks `max(1, 10%)` distinct tasks and moves each to a uniformly random
/// capable agent, then repairs. If repair fails the input is returned
/// unchanged.
pub fn mutate<R: Rng>(schedule: &Schedule, rng: &mut R) -> Schedule {
    let n = schedule.len();
    if n == 0 {
        return schedule.clone();
    }
    let count = ((n as f64 * MUTATION_SHARE) as usize).max(1);
    let inst = Arc::clone(schedule.instance());

    let mut mutated = schedule.clone();
    for i in index::sample(rng, n, count) {
        if let Some(&agent) = inst.capable_agents(i).choose(rng) {
            mutated.set_agent(i, agent);
        }
    }

    if repair(&mut mutated) {
        mutated
    } else {
        schedule.clone()
    }
}

/// Recomputes start times from the current agent assignments.
///
/// Clears every start time, then places tasks in dependency order at their
/// earliest start on their assigned agent. Fails if an assigned agent lacks
/// the task's skills or the result is not a valid schedule (for example
/// because a task has no agent). On success the makespan is up to date.
pub fn repair(schedule: &mut Schedule) -> bool {
    let inst = Arc::clone(schedule.instance());
    schedule.clear_start_times();

    for &task in &inst.dependency_order().order {
        let Some(agent) = schedule.slot(task).agent else {
            continue;
        };
        if !inst.can_perform(agent, task) {
            return false;
        }
        let start = earliest_start(schedule, task, agent);
        schedule.set_start(task, start);
    }

    schedule.calculate_makespan();
    schedule.is_valid()
}
