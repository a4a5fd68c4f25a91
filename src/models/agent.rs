//! Agent model.
//!
//! Agents perform tasks. An agent can perform a task when its skill set
//! covers every skill the task requires.

use serde::{Deserialize, Serialize};

use super::Task;

/// An agent that can be assigned tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier.
    #[serde(alias = "agent_id")]
    pub id: String,
    /// Skill tags this agent has.
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Agent {
    /// Creates an agent with no skills.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            skills: Vec::new(),
        }
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Adds several skills.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills.extend(skills.into_iter().map(Into::into));
        self
    }

    /// Whether this agent has a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Whether this agent's skills are a superset of the task's required skills.
    pub fn can_perform(&self, task: &Task) -> bool {
        task.required_skills.iter().all(|s| self.has_skill(s))
    }
}
