//! Task model.
//!
//! A task is a unit of work with a fixed duration, a set of tasks it
//! depends on, and a set of skills an agent must have to perform it.
//! Tasks are immutable once built; the agent and start time chosen for a
//! task live in a [`Schedule`](super::Schedule) overlay.

use serde::{Deserialize, Serialize};

/// A task to be scheduled.
///
/// # Time Representation
/// Durations are abstract integer time units. A schedule starts at t=0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    #[serde(alias = "task_id")]
    pub id: String,
    /// Processing time (time units, expected > 0).
    pub duration: i64,
    /// IDs of tasks that must finish before this one starts.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Skill tags an agent needs to perform this task.
    #[serde(default, alias = "required_resources")]
    pub required_skills: Vec<String>,
}

impl Task {
    /// Creates a new task with the given ID and duration.
    pub fn new(id: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            duration,
            dependencies: Vec::new(),
            required_skills: Vec::new(),
        }
    }

    /// Adds a dependency on another task.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }

    /// Adds several dependencies.
    pub fn with_dependencies<I, S>(mut self, task_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(task_ids.into_iter().map(Into::into));
        self
    }

    /// Adds a required skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Adds several required skills.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills
            .extend(skills.into_iter().map(Into::into));
        self
    }

    /// Whether this task depends on `task_id`.
    pub fn depends_on(&self, task_id: &str) -> bool {
        self.dependencies.iter().any(|d| d == task_id)
    }

    /// Whether this task has no dependencies.
    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }
}
