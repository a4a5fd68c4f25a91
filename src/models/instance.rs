//! Problem instance: the immutable base shared by every schedule.
//!
//! Holds the task and agent sets plus index structures derived from them
//! (ID lookups, resolved dependency edges, capable agents per task).
//! Schedules reference an instance through an [`Arc`] and only own their
//! per-task assignment overlay.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use super::{Agent, Task};
use crate::dependency::{resolve_order, DependencyOrder};
use crate::error::{Error, Result};
use crate::validation::validate_input;

/// Tasks and agents of one scheduling problem, with derived indices.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    tasks: Vec<Task>,
    agents: Vec<Agent>,
    task_index: HashMap<String, usize>,
    agent_index: HashMap<String, usize>,
    /// Per task: positions of the tasks it depends on (unknown IDs dropped).
    dependencies: Vec<Vec<usize>>,
    /// Per task: positions of agents able to perform it, in agent order.
    capable: Vec<Vec<usize>>,
    order: DependencyOrder,
}

impl ProblemInstance {
    /// Builds an instance without validating the input.
    ///
    /// Dependencies on IDs outside the task set are ignored. If IDs repeat,
    /// lookups resolve to the first occurrence. Dependency cycles are broken
    /// for ordering purposes and logged; see [`DependencyOrder::dropped_edges`].
    pub fn new(tasks: Vec<Task>, agents: Vec<Agent>) -> Self {
        let mut task_index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            task_index.entry(task.id.clone()).or_insert(i);
        }
        let mut agent_index = HashMap::with_capacity(agents.len());
        for (i, agent) in agents.iter().enumerate() {
            agent_index.entry(agent.id.clone()).or_insert(i);
        }

        let dependencies: Vec<Vec<usize>> = tasks
            .iter()
            .map(|task| {
                let mut deps: Vec<usize> = Vec::with_capacity(task.dependencies.len());
                for dep in &task.dependencies {
                    if let Some(&idx) = task_index.get(dep) {
                        if !deps.contains(&idx) {
                            deps.push(idx);
                        }
                    }
                }
                deps
            })
            .collect();

        let capable: Vec<Vec<usize>> = tasks
            .iter()
            .map(|task| {
                agents
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.can_perform(task))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        let order = resolve_order(&dependencies);
        if order.has_cycles() {
            warn!(
                dropped = order.dropped_edges.len(),
                "dependency cycle detected; cycle edges ignored for ordering"
            );
        }

        Self {
            tasks,
            agents,
            task_index,
            agent_index,
            dependencies,
            capable,
            order,
        }
    }

    /// Validates the input, then builds the instance.
    pub fn validated(tasks: Vec<Task>, agents: Vec<Agent>) -> Result<Self> {
        validate_input(&tasks, &agents).map_err(Error::Validation)?;
        Ok(Self::new(tasks, agents))
    }

    /// Wraps the instance for sharing between schedules.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// All tasks, in input order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// All agents, in input order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Position of a task by ID.
    pub fn task_position(&self, task_id: &str) -> Option<usize> {
        self.task_index.get(task_id).copied()
    }

    /// Position of an agent by ID.
    pub fn agent_position(&self, agent_id: &str) -> Option<usize> {
        self.agent_index.get(agent_id).copied()
    }

    /// Task at `idx`.
    pub fn task(&self, idx: usize) -> &Task {
        &self.tasks[idx]
    }

    /// Agent at `idx`.
    pub fn agent(&self, idx: usize) -> &Agent {
        &self.agents[idx]
    }

    /// Positions of the tasks `task_idx` depends on.
    pub fn dependencies_of(&self, task_idx: usize) -> &[usize] {
        &self.dependencies[task_idx]
    }

    /// Tasks ordered so that dependencies come first.
    pub fn dependency_order(&self) -> &DependencyOrder {
        &self.order
    }

    /// Positions of the agents able to perform `task_idx`.
    pub fn capable_agents(&self, task_idx: usize) -> &[usize] {
        &self.capable[task_idx]
    }

    /// Whether agent `agent_idx` can perform task `task_idx`.
    pub fn can_perform(&self, agent_idx: usize, task_idx: usize) -> bool {
        self.capable[task_idx].contains(&agent_idx)
    }

    /// Positions of tasks no agent can perform.
    pub fn uncovered_tasks(&self) -> Vec<usize> {
        (0..self.tasks.len())
            .filter(|&i| self.capable[i].is_empty())
            .collect()
    }

    /// Looks up a task position, failing with [`Error::UnknownTask`].
    pub(crate) fn require_task(&self, task_id: &str) -> Result<usize> {
        self.task_position(task_id)
            .ok_or_else(|| Error::UnknownTask(task_id.to_string()))
    }

    /// Looks up an agent position, failing with [`Error::UnknownAgent`].
    pub(crate) fn require_agent(&self, agent_id: &str) -> Result<usize> {
        self.agent_position(agent_id)
            .ok_or_else(|| Error::UnknownAgent(agent_id.to_string()))
    }
}
