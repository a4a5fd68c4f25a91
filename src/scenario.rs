//! Scenario files.
//!
//! A scenario is the raw input of a scheduling run: the task list and the
//! agent roster, stored as JSON.
//!
//! ```json
//! {
//!   "tasks": [
//!     { "id": "T1", "duration": 3, "required_skills": ["skill_A"] },
//!     { "id": "T3", "duration": 4, "dependencies": ["T1"], "required_skills": ["skill_A"] }
//!   ],
//!   "agents": [
//!     { "id": "A1", "skills": ["skill_A", "skill_B"] }
//!   ]
//! }
//! ```
//!
//! Older files using `task_id`, `agent_id` or `required_resources` are
//! accepted as well.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{Agent, ProblemInstance, Task};

/// Tasks and agents of one scheduling problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Tasks to schedule.
    pub tasks: Vec<Task>,
    /// Available agents.
    pub agents: Vec<Agent>,
}

impl Scenario {
    /// Creates a scenario.
    pub fn new(tasks: Vec<Task>, agents: Vec<Agent>) -> Self {
        Self { tasks, agents }
    }

    /// Distinct skills required by tasks or held by agents, sorted.
    pub fn skills(&self) -> BTreeSet<&str> {
        self.tasks
            .iter()
            .flat_map(|t| t.required_skills.iter())
            .chain(self.agents.iter().flat_map(|a| a.skills.iter()))
            .map(String::as_str)
            .collect()
    }

    /// Parses a scenario from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a scenario from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let scenario = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            tasks = scenario.tasks.len(),
            agents = scenario.agents.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the scenario as pretty-printed JSON.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// The built-in demo problem: ten tasks over three skills and four
    /// agents.
    pub fn default_scenario() -> Self {
        let tasks = vec![
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
            Task::new("T9", 2).with_dependency("T3").with_skill("skill_C"),
            Task::new("T10", 1)
                .with_dependencies(["T8", "T9"])
                .with_skill("skill_A"),
        ];
        let agents = vec![
            Agent::new("A1").with_skills(["skill_A", "skill_B"]),
            Agent::new("A2").with_skills(["skill_B", "skill_C"]),
            Agent::new("A3").with_skills(["skill_A", "skill_C"]),
            Agent::new("A4").with_skills(["skill_A", "skill_B", "skill_C"]),
        ];
        Self::new(tasks, agents)
    }

    /// Validates the scenario and builds a problem instance from it.
    ///
    /// # Errors
    /// [`Error::Validation`](crate::Error::Validation) listing every problem
    /// found.
    pub fn into_instance(self) -> Result<ProblemInstance> {
        ProblemInstance::validated(self.tasks, self.agents)
    }
}
