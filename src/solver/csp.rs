//! Backtracking CSP solver.
//!
//! # Algorithm
//!
//! 1. Visit tasks in dependency order.
//! 2. For the current task, try each capable agent in preference order,
//!    placing the task at its [`earliest_start`] on that agent.
//! 3. Move to the next task. When a task has no agent left to try, clear
//!    it and return to the previous decision point for its next agent.
//!
//! Decision points live on an explicit stack and task state lives in the
//! schedule overlay, so search depth is bounded by the task count without
//! recursion and every undo is an explicit slot reset.
//!
//! The search is complete for the fixed task order: it finds a schedule if
//! one exists under that order. It never reorders tasks.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6.3

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use super::earliest_start;
use crate::models::{ProblemInstance, Schedule};

/// Backtracking solver for the skill/dependency/no-overlap CSP.
///
/// # Example
///
/// ```
/// use u_taskplan::models::{Agent, ProblemInstance, Task};
/// use u_taskplan::solver::CspSolver;
///
/// let instance = ProblemInstance::new(
///     vec![
///         Task::new("T1", 3).with_skill("A"),
///         Task::new("T2", 2).with_skill("B"),
///     ],
///     vec![Agent::new("A1").with_skills(["A", "B"])],
/// )
/// .into_shared();
///
/// let schedule = CspSolver::new(&instance).solve().unwrap();
/// assert!(schedule.is_valid());
/// assert_eq!(schedule.makespan(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct CspSolver {
    instance: Arc<ProblemInstance>,
}

/// A decision point: which task is being placed and the next candidate to try.
#[derive(Debug, Clone, Copy)]
struct Decision {
    /// Position in the dependency order.
    pos: usize,
    /// Index into that position's candidate list.
    next: usize,
}

impl CspSolver {
    /// Creates a solver for an instance.
    pub fn new(instance: &Arc<ProblemInstance>) -> Self {
        Self {
            instance: Arc::clone(instance),
        }
    }

    /// The instance being solved.
    pub fn instance(&self) -> &Arc<ProblemInstance> {
        &self.instance
    }

    /// Solves with agents tried in instance order.
    ///
    /// Deterministic: repeated calls return identical schedules.
    pub fn solve(&self) -> Option<Schedule> {
        let agents: Vec<usize> = (0..self.instance.agent_count()).collect();
        self.solve_with_agent_order(&agents)
    }

    /// Solves with agents tried in a random order drawn from `rng`.
    ///
    /// Used to produce varied feasible schedules for an initial population.
    pub fn solve_shuffled<R: Rng>(&self, rng: &mut R) -> Option<Schedule> {
        let mut agents: Vec<usize> = (0..self.instance.agent_count()).collect();
        agents.shuffle(rng);
        self.solve_with_agent_order(&agents)
    }

    /// Solves with agents tried in the given order (agent positions).
    ///
    /// Agents missing from `agent_order` are never used. Returns `None` when
    /// no assignment satisfies all constraints.
    pub fn solve_with_agent_order(&self, agent_order: &[usize]) -> Option<Schedule> {
        let inst = &*self.instance;
        let order = &inst.dependency_order().order;
        trace!(order = ?inst.dependency_order().task_ids(inst), "CSP task order");

        // Candidate agents per order position, in preference order.
        let candidates: Vec<Vec<usize>> = order
            .iter()
            .map(|&t| {
                agent_order
                    .iter()
                    .copied()
                    .filter(|&a| a < inst.agent_count() && inst.can_perform(a, t))
                    .collect()
            })
            .collect();

        // A task nobody can perform fails every branch; stop before searching.
        if let Some(pos) = candidates.iter().position(Vec::is_empty) {
            debug!(task = %inst.task(order[pos]).id, "no capable agent; instance infeasible");
            return None;
        }

        let mut schedule = Schedule::empty(&self.instance);
        if order.is_empty() {
            return Some(schedule);
        }

        let mut stack: Vec<Decision> = Vec::with_capacity(order.len());
        stack.push(Decision { pos: 0, next: 0 });
        let mut backtracks: u64 = 0;

        while let Some(top) = stack.last_mut() {
            let pos = top.pos;
            let task = order[pos];
            schedule.clear(task);

            let Some(&agent) = candidates[pos].get(top.next) else {
                stack.pop();
                backtracks += 1;
                continue;
            };
            top.next += 1;

            let start = earliest_start(&schedule, task, agent);
            schedule.place(task, agent, start);

            if pos + 1 == order.len() {
                let makespan = schedule.calculate_makespan();
                debug!(makespan, backtracks, "CSP solver found a schedule");
                return Some(schedule);
            }
            stack.push(Decision {
                pos: pos + 1,
                next: 0,
            });
        }

        debug!(backtracks, "CSP search exhausted without a schedule");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Agent, Task};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn shared(tasks: Vec<Task>, agents: Vec<Agent>) -> Arc<ProblemInstance> {
        ProblemInstance::new(tasks, agents).into_shared()
    }

    fn sample_instance() -> Arc<ProblemInstance> {
        shared(
            vec![
                Task::new("T1", 3).with_skill("skill_A"),
                Task::new("T2", 2).with_skill("skill_B"),
                Task::new("T3", 4).with_dependency("T1").with_skill("skill_A"),
                Task::new("T4", 1).with_dependency("T2").with_skill("skill_C"),
                Task::new("T5", 3)
                    .with_dependencies(["T1", "T2"])
                    .with_skill("skill_B"),
                Task::new("T6", 2)
                    .with_dependencies(["T3", "T4"])
                    .with_skill("skill_A"),
                Task::new("T7", 1).with_dependency("T5").with_skill("skill_C"),
                Task::new("T8", 2)
                    .with_dependencies(["T6", "T7"])
                    .with_skill("skill_B"),
            ],
            vec![
                Agent::new("A1").with_skills(["skill_A", "skill_B"]),
                Agent::new("A2").with_skills(["skill_B", "skill_C"]),
                Agent::new("A3").with_skills(["skill_A", "skill_C"]),
            ],
        )
    }

    #[test]
    fn test_single_agent_sequential() {
        let inst = shared(
            vec![
                Task::new("T1", 3).with_skill("A"),
                Task::new("T2", 2).with_skill("B"),
            ],
            vec![Agent::new("A1").with_skills(["A", "B"])],
        );
        let s = CspSolver::new(&inst).solve().unwrap();
        assert!(s.is_valid());
        assert_eq!(s.makespan(), 5);
        assert_eq!(s.agent_of("T1").unwrap().id, "A1");
        assert_eq!(s.agent_of("T2").unwrap().id, "A1");
    }

    #[test]
    fn test_dependency_waits_for_busy_agent() {
        // Only A1 has skill A; T3 depends on T1.
        let inst = shared(
            vec![
                Task::new("T1", 3).with_skill("A"),
                Task::new("T3", 2).with_dependency("T1"),
            ],
            vec![Agent::new("A1").with_skill("A"), Agent::new("A2")],
        );
        for agents in [vec![0, 1], vec![1, 0]] {
            let s = CspSolver::new(&inst).solve_with_agent_order(&agents).unwrap();
            assert!(s.start_of("T3").unwrap() >= 3);
            assert!(s.is_valid());
        }
    }

    #[test]
    fn test_missing_skill_infeasible() {
        let inst = shared(
            vec![Task::new("T1", 1), Task::new("T2", 1).with_skill("Z")],
            vec![Agent::new("A1").with_skill("A")],
        );
        assert!(CspSolver::new(&inst).solve().is_none());
    }

    #[test]
    fn test_no_agents_infeasible() {
        let inst = shared(vec![Task::new("T1", 1)], vec![]);
        assert!(CspSolver::new(&inst).solve().is_none());
    }

    #[test]
    fn test_empty_instance() {
        let inst = shared(vec![], vec![Agent::new("A1")]);
        let s = CspSolver::new(&inst).solve().unwrap();
        assert!(s.is_empty());
        assert_eq!(s.makespan(), 0);
        assert!(s.is_valid());
    }

    #[test]
    fn test_sample_scenario_valid() {
        let inst = sample_instance();
        let s = CspSolver::new(&inst).solve().unwrap();
        assert!(s.is_valid(), "{:?}", s.violations());
        assert!(s.makespan() > 0);
    }

    #[test]
    fn test_deterministic() {
        let inst = sample_instance();
        let solver = CspSolver::new(&inst);
        let a = solver.solve().unwrap();
        let b = solver.solve().unwrap();
        assert_eq!(a.slots(), b.slots());
        assert_eq!(a.makespan(), b.makespan());
    }

    #[test]
    fn test_first_capable_agent_preferred() {
        let inst = sample_instance();
        let s = CspSolver::new(&inst).solve().unwrap();
        // T1 (skill_A) goes to the first capable agent in instance order.
        assert_eq!(s.agent_of("T1").unwrap().id, "A1");
        assert_eq!(s.start_of("T1"), Some(0));
    }

    #[test]
    fn test_agent_order_respected() {
        let inst = sample_instance();
        let s = CspSolver::new(&inst)
            .solve_with_agent_order(&[2, 1, 0])
            .unwrap();
        assert_eq!(s.agent_of("T1").unwrap().id, "A3");
        assert!(s.is_valid());
    }

    #[test]
    fn test_restricted_agent_order_can_be_infeasible() {
        let inst = sample_instance();
        // Without A2 and A3 nobody has skill_C.
        assert!(CspSolver::new(&inst).solve_with_agent_order(&[0]).is_none());
    }

    #[test]
    fn test_shuffled_solutions_valid() {
        let inst = sample_instance();
        let solver = CspSolver::new(&inst);
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let s = solver.solve_shuffled(&mut rng).unwrap();
            assert!(s.is_valid(), "{:?}", s.violations());
        }
    }

    #[test]
    fn test_shuffled_seed_reproducible() {
        let inst = sample_instance();
        let solver = CspSolver::new(&inst);
        let a = solver
            .solve_shuffled(&mut SmallRng::seed_from_u64(7))
            .unwrap();
        let b = solver
            .solve_shuffled(&mut SmallRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a.slots(), b.slots());
    }

    #[test]
    fn test_long_chain() {
        let n = 2_000;
        let tasks: Vec<Task> = (0..n)
            .map(|i| {
                let t = Task::new(format!("T{i}"), 1);
                if i > 0 {
                    t.with_dependency(format!("T{}", i - 1))
                } else {
                    t
                }
            })
            .collect();
        let inst = shared(tasks, vec![Agent::new("A1"), Agent::new("A2")]);
        let s = CspSolver::new(&inst).solve().unwrap();
        assert_eq!(s.makespan(), n as i64);
    }
}
