//! Schedule (solution) model.
//!
//! A schedule pairs a shared [`ProblemInstance`] with a per-task overlay of
//! agent assignments and start times. Cloning a schedule copies only the
//! overlay, so population members in the optimizer evolve independently
//! without duplicating the task and agent sets.
//!
//! Validity is always rechecked in full from the overlay, regardless of how
//! the schedule was produced.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Agent, ProblemInstance, Task};
use crate::error::Result;

/// Assignment state of one task within a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    /// Position of the assigned agent in the instance.
    pub agent: Option<usize>,
    /// Start time (time units).
    pub start: Option<i64>,
}

impl Slot {
    /// Whether both agent and start time are set.
    pub fn is_scheduled(&self) -> bool {
        self.agent.is_some() && self.start.is_some()
    }
}

/// A (possibly partial) schedule over a problem instance.
#[derive(Debug, Clone)]
pub struct Schedule {
    instance: Arc<ProblemInstance>,
    slots: Vec<Slot>,
    makespan: i64,
}

/// A task-agent-time assignment, as reported to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned task ID.
    pub task_id: String,
    /// Assigned agent ID.
    pub agent_id: String,
    /// Start time.
    pub start: i64,
    /// End time (start + duration).
    pub end: i64,
}

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related task ID.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Task lacks an agent or a start time.
    Unassigned,
    /// Assigned agent lacks a required skill.
    SkillMismatch,
    /// Task starts before one of its dependencies finishes.
    PrecedenceViolation,
    /// Two tasks on the same agent overlap in time.
    AgentOverlap,
}

impl Assignment {
    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

impl Violation {
    fn new(violation_type: ViolationType, task_id: &str, message: String) -> Self {
        Self {
            violation_type,
            entity_id: task_id.to_string(),
            message,
        }
    }
}

impl Schedule {
    /// Creates a schedule with every task unassigned.
    pub fn empty(instance: &Arc<ProblemInstance>) -> Self {
        Self {
            instance: Arc::clone(instance),
            slots: vec![Slot::default(); instance.task_count()],
            makespan: 0,
        }
    }

    /// The shared problem instance.
    pub fn instance(&self) -> &Arc<ProblemInstance> {
        &self.instance
    }

    /// Tasks, in instance order.
    pub fn tasks(&self) -> &[Task] {
        self.instance.tasks()
    }

    /// Agents, in instance order.
    pub fn agents(&self) -> &[Agent] {
        self.instance.agents()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the schedule covers no tasks.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Per-task overlay, indexed by task position.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Overlay entry for task `task_idx`.
    pub fn slot(&self, task_idx: usize) -> Slot {
        self.slots[task_idx]
    }

    pub(crate) fn place(&mut self, task_idx: usize, agent_idx: usize, start: i64) {
        self.slots[task_idx] = Slot {
            agent: Some(agent_idx),
            start: Some(start),
        };
    }

    pub(crate) fn set_agent(&mut self, task_idx: usize, agent_idx: usize) {
        self.slots[task_idx].agent = Some(agent_idx);
    }

    pub(crate) fn set_start(&mut self, task_idx: usize, start: i64) {
        self.slots[task_idx].start = Some(start);
    }

    pub(crate) fn clear(&mut self, task_idx: usize) {
        self.slots[task_idx] = Slot::default();
    }

    pub(crate) fn clear_start_times(&mut self) {
        for slot in &mut self.slots {
            slot.start = None;
        }
    }

    /// Assigns a task to an agent at a start time, by ID.
    ///
    /// No constraint is checked here; use [`is_valid`](Self::is_valid).
    pub fn assign(&mut self, task_id: &str, agent_id: &str, start: i64) -> Result<()> {
        let t = self.instance.require_task(task_id)?;
        let a = self.instance.require_agent(agent_id)?;
        self.place(t, a, start);
        Ok(())
    }

    /// Clears the agent and start time of a task.
    pub fn unassign(&mut self, task_id: &str) -> Result<()> {
        let t = self.instance.require_task(task_id)?;
        self.clear(t);
        Ok(())
    }

    /// Agent assigned to a task, if any.
    pub fn agent_of(&self, task_id: &str) -> Option<&Agent> {
        let t = self.instance.task_position(task_id)?;
        self.slots[t].agent.map(|a| self.instance.agent(a))
    }

    /// Start time of a task, if set.
    pub fn start_of(&self, task_id: &str) -> Option<i64> {
        let t = self.instance.task_position(task_id)?;
        self.slots[t].start
    }

    /// End time (start + duration) of a task, if started.
    pub fn task_end(&self, task_id: &str) -> Option<i64> {
        let t = self.instance.task_position(task_id)?;
        self.end_at(t)
    }

    pub(crate) fn end_at(&self, task_idx: usize) -> Option<i64> {
        self.slots[task_idx]
            .start
            .map(|s| s + self.instance.task(task_idx).duration)
    }

    /// Whether every task has an agent and a start time.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Slot::is_scheduled)
    }

    /// Recomputes, stores, and returns the makespan.
    ///
    /// Makespan is the latest end time over tasks with a start time,
    /// or 0 if no task has one.
    pub fn calculate_makespan(&mut self) -> i64 {
        self.makespan = (0..self.slots.len())
            .filter_map(|i| self.end_at(i))
            .max()
            .unwrap_or(0);
        self.makespan
    }

    /// Makespan as of the last [`calculate_makespan`](Self::calculate_makespan).
    pub fn makespan(&self) -> i64 {
        self.makespan
    }

    /// Whether the schedule satisfies every constraint.
    ///
    /// Checks that all tasks are assigned and started, assigned agents have
    /// the required skills, dependencies finish before dependents start,
    /// and no agent runs two tasks at once.
    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }

    /// Lists every constraint violation.
    pub fn violations(&self) -> Vec<Violation> {
        let inst = &*self.instance;
        let mut violations = Vec::new();

        for (i, slot) in self.slots.iter().enumerate() {
            let task = inst.task(i);
            if !slot.is_scheduled() {
                violations.push(Violation::new(
                    ViolationType::Unassigned,
                    &task.id,
                    format!("Task '{}' has no agent or start time", task.id),
                ));
                continue;
            }
            if let Some(a) = slot.agent {
                if !inst.agent(a).can_perform(task) {
                    violations.push(Violation::new(
                        ViolationType::SkillMismatch,
                        &task.id,
                        format!(
                            "Agent '{}' lacks skills required by task '{}'",
                            inst.agent(a).id,
                            task.id
                        ),
                    ));
                }
            }
        }

        for (i, slot) in self.slots.iter().enumerate() {
            let Some(start) = slot.start else { continue };
            for &dep in inst.dependencies_of(i) {
                if let Some(dep_end) = self.end_at(dep) {
                    if dep_end > start {
                        violations.push(Violation::new(
                            ViolationType::PrecedenceViolation,
                            &inst.task(i).id,
                            format!(
                                "Task '{}' starts at {} before dependency '{}' ends at {}",
                                inst.task(i).id,
                                start,
                                inst.task(dep).id,
                                dep_end
                            ),
                        ));
                    }
                }
            }
        }

        let mut by_agent: HashMap<usize, Vec<(i64, i64, usize)>> = HashMap::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if let (Some(a), Some(start)) = (slot.agent, slot.start) {
                by_agent
                    .entry(a)
                    .or_default()
                    .push((start, start + inst.task(i).duration, i));
            }
        }
        let mut agents: Vec<_> = by_agent.into_iter().collect();
        agents.sort_by_key(|(a, _)| *a);
        for (a, mut intervals) in agents {
            intervals.sort();
            for pair in intervals.windows(2) {
                let (_, prev_end, prev) = pair[0];
                let (next_start, _, next) = pair[1];
                if prev_end > next_start {
                    violations.push(Violation::new(
                        ViolationType::AgentOverlap,
                        &inst.task(next).id,
                        format!(
                            "Tasks '{}' and '{}' overlap on agent '{}'",
                            inst.task(prev).id,
                            inst.task(next).id,
                            inst.agent(a).id
                        ),
                    ));
                }
            }
        }

        violations
    }

    /// Assignments of all scheduled tasks, in task order.
    pub fn assignments(&self) -> Vec<Assignment> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let (a, start) = (slot.agent?, slot.start?);
                Some(Assignment {
                    task_id: self.instance.task(i).id.clone(),
                    agent_id: self.instance.agent(a).id.clone(),
                    start,
                    end: start + self.instance.task(i).duration,
                })
            })
            .collect()
    }

    /// Assignments of one agent, sorted by start time.
    pub fn assignments_for_agent(&self, agent_id: &str) -> Vec<Assignment> {
        let mut out: Vec<Assignment> = self
            .assignments()
            .into_iter()
            .filter(|a| a.agent_id == agent_id)
            .collect();
        out.sort_by_key(|a| a.start);
        out
    }

    /// Total busy time per agent ID (agents without tasks are omitted).
    pub fn busy_time_by_agent(&self) -> HashMap<String, i64> {
        let mut busy: HashMap<String, i64> = HashMap::new();
        for a in self.assignments() {
            *busy.entry(a.agent_id).or_insert(0) += a.end - a.start;
        }
        busy
    }

    /// Agent utilization: busy time / makespan.
    ///
    /// Returns `None` if the makespan is zero.
    pub fn agent_utilization(&self, agent_id: &str) -> Option<f64> {
        let horizon = self.makespan;
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self
            .assignments_for_agent(agent_id)
            .iter()
            .map(Assignment::duration)
            .sum();
        Some(busy as f64 / horizon as f64)
    }
}
