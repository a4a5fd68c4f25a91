//! Input validation for scheduling problems.
//!
//! Checks structural integrity of tasks and agents before scheduling.
//! Detects:
//! - Duplicate IDs
//! - Non-positive durations
//! - Dependencies on unknown tasks, or on the task itself
//! - Circular dependencies (DAG validation)
//! - Tasks no agent has the skills to perform
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dependency::resolve_order;
use crate::models::{Agent, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two tasks or two agents share the same ID.
    DuplicateId,
    /// A task's duration is zero or negative.
    InvalidDuration,
    /// A task depends on a task that doesn't exist.
    InvalidDependency,
    /// A task lists itself as a dependency.
    SelfDependency,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// No agent has every skill a task requires.
    UncoveredSkills,
    /// Total duration exceeds the representable time range.
    HorizonOverflow,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scheduling problem.
///
/// Checks:
/// 1. No duplicate agent IDs
/// 2. No duplicate task IDs
/// 3. All durations are positive
/// 4. All dependencies reference other existing tasks
/// 5. No circular dependencies
/// 6. Every task can be performed by at least one agent
/// 7. The sum of all durations fits in `i64`
///
/// No schedule built by earliest-fit placement ends later than the total
/// duration, so check 7 keeps every start and end time representable.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(tasks: &[Task], agents: &[Agent]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut agent_ids = HashSet::new();
    for a in agents {
        if !agent_ids.insert(a.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate agent ID: {}", a.id),
            ));
        }
    }

    let mut task_index: HashMap<&str, usize> = HashMap::new();
    for (i, task) in tasks.iter().enumerate() {
        if task_index.contains_key(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        } else {
            task_index.insert(task.id.as_str(), i);
        }

        if task.duration <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Task '{}' has non-positive duration {}", task.id, task.duration),
            ));
        }
    }

    // Dependency references; self-edges are reported here, not as cycles
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    for (i, task) in tasks.iter().enumerate() {
        for dep in &task.dependencies {
            if *dep == task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' depends on itself", task.id),
                ));
                continue;
            }
            match task_index.get(dep.as_str()) {
                Some(&d) => deps[i].push(d),
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Task '{}' references unknown dependency '{}'", task.id, dep),
                )),
            }
        }
    }

    let ordering = resolve_order(&deps);
    for &(task, dep) in &ordering.dropped_edges {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!(
                "Circular dependency detected: '{}' depends on '{}'",
                tasks[task].id, tasks[dep].id
            ),
        ));
    }

    for task in tasks {
        if !agents.iter().any(|a| a.can_perform(task)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UncoveredSkills,
                format!(
                    "No agent has all skills required by task '{}': [{}]",
                    task.id,
                    task.required_skills.join(", ")
                ),
            ));
        }
    }

    let horizon = tasks
        .iter()
        .filter(|t| t.duration > 0)
        .try_fold(0i64, |acc, t| acc.checked_add(t.duration));
    if horizon.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::HorizonOverflow,
            "Sum of task durations overflows the time range",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_agents() -> Vec<Agent> {
        vec![
            Agent::new("A1").with_skills(["skill_A", "skill_B"]),
            Agent::new("A2").with_skills(["skill_B", "skill_C"]),
        ]
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new("T1", 3).with_skill("skill_A"),
            Task::new("T2", 2).with_skill("skill_B"),
            Task::new("T3", 4).with_dependency("T1").with_skill("skill_C"),
        ]
    }

    fn has_kind(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_tasks(), &sample_agents()).is_ok());
    }

    #[test]
    fn test_duplicate_task_id() {
        let tasks = vec![Task::new("T1", 1), Task::new("T1", 2)];
        let errors = validate_input(&tasks, &sample_agents()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_duplicate_agent_id() {
        let agents = vec![Agent::new("A1"), Agent::new("A1")];
        let errors = validate_input(&[Task::new("T1", 1)], &agents).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("agent")));
    }

    #[test]
    fn test_invalid_duration() {
        let tasks = vec![Task::new("T1", 0), Task::new("T2", -3)];
        let errors = validate_input(&tasks, &sample_agents()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidDuration)
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_dependency() {
        let tasks = vec![Task::new("T1", 1).with_dependency("NONEXISTENT")];
        let errors = validate_input(&tasks, &sample_agents()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::InvalidDependency));
    }

    #[test]
    fn test_self_dependency() {
        let tasks = vec![Task::new("T1", 1).with_dependency("T1")];
        let errors = validate_input(&tasks, &sample_agents()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::SelfDependency));
        assert!(!has_kind(&errors, ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_cyclic_dependency() {
        // T1 → T2 → T3 → T1
        let tasks = vec![
            Task::new("T1", 1).with_dependency("T3"),
            Task::new("T2", 1).with_dependency("T1"),
            Task::new("T3", 1).with_dependency("T2"),
        ];
        let errors = validate_input(&tasks, &sample_agents()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let tasks = vec![
            Task::new("T1", 1),
            Task::new("T2", 1).with_dependency("T1"),
            Task::new("T3", 1).with_dependencies(["T1", "T2"]),
        ];
        assert!(validate_input(&tasks, &sample_agents()).is_ok());
    }

    #[test]
    fn test_uncovered_skills() {
        let tasks = vec![Task::new("T1", 1).with_skill("Z")];
        let errors = validate_input(&tasks, &sample_agents()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UncoveredSkills));
    }

    #[test]
    fn test_skill_split_across_agents_is_uncovered() {
        // skill_A and skill_C are held, but never by the same agent.
        let tasks = vec![Task::new("T1", 1).with_skills(["skill_A", "skill_C"])];
        let errors = validate_input(&tasks, &sample_agents()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UncoveredSkills));
    }

    #[test]
    fn test_duration_sum_overflow() {
        let agents = vec![Agent::new("A1")];
        let tasks = vec![Task::new("T1", i64::MAX), Task::new("T2", 1)];
        let errors = validate_input(&tasks, &agents).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::HorizonOverflow));

        let tasks = vec![Task::new("T1", i64::MAX)];
        assert!(validate_input(&tasks, &agents).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let tasks = vec![
            Task::new("T1", 0),
            Task::new("T2", 1).with_dependency("GHOST"),
        ];
        let errors = validate_input(&tasks, &[]).unwrap_err();
        // zero duration, unknown dependency, two uncovered tasks (no agents)
        assert!(errors.len() >= 4);
    }
}
