//! End-to-end scheduling pipeline.
//!
//! # Algorithm
//!
//! 1. Solve the instance with the CSP solver (agents in input order).
//! 2. Refine that schedule with the genetic optimizer.
//! 3. Compare the two makespans.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 14: Hybrid methods

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::ga::{GaConfig, GaResult, GeneticOptimizer};
use crate::models::{Assignment, ProblemInstance, Schedule};
use crate::solver::CspSolver;

/// CSP-then-GA scheduler.
///
/// # Example
///
/// ```
/// use u_taskplan::ga::GaConfig;
/// use u_taskplan::scenario::Scenario;
/// use u_taskplan::scheduler::TaskScheduler;
///
/// let instance = Scenario::default_scenario().into_instance().unwrap();
/// let config = GaConfig::quick().with_generations(5).with_seed(1);
/// let outcome = TaskScheduler::new(config).run(instance).unwrap();
/// assert!(outcome.optimized.best.is_valid());
/// assert!(outcome.comparison.optimized_makespan <= outcome.comparison.initial_makespan);
/// ```
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    config: GaConfig,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct SchedulingOutcome {
    /// The CSP schedule used as the optimizer seed.
    pub initial: Schedule,
    /// Optimizer output.
    pub optimized: GaResult,
    /// Makespan comparison between the two.
    pub comparison: Comparison,
    /// Wall-clock time spent in the solver and optimizer.
    pub elapsed: Duration,
}

/// Makespan before and after optimization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    /// CSP makespan.
    pub initial_makespan: i64,
    /// Optimized makespan.
    pub optimized_makespan: i64,
    /// `initial_makespan - optimized_makespan`.
    pub improvement: i64,
    /// Improvement as a percentage of the initial makespan (0 when that is 0).
    pub improvement_pct: f64,
}

impl Comparison {
    /// Compares two makespans.
    pub fn new(initial_makespan: i64, optimized_makespan: i64) -> Self {
        let improvement = initial_makespan - optimized_makespan;
        let improvement_pct = if initial_makespan > 0 {
            improvement as f64 / initial_makespan as f64 * 100.0
        } else {
            0.0
        };
        Self {
            initial_makespan,
            optimized_makespan,
            improvement,
            improvement_pct,
        }
    }
}

/// Serializable view of a schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    /// Completion time of the last task.
    pub makespan: i64,
    /// Whether the schedule passes every check.
    pub valid: bool,
    /// Assignments sorted by start time, then task ID.
    pub assignments: Vec<Assignment>,
}

impl ScheduleReport {
    /// Builds a report from a schedule.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut assignments = schedule.assignments();
        assignments.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.task_id.cmp(&b.task_id)));
        Self {
            makespan: schedule.makespan(),
            valid: schedule.is_valid(),
            assignments,
        }
    }
}

impl TaskScheduler {
    /// Creates a scheduler with the given optimizer configuration.
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }

    /// The optimizer configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs CSP then GA on `instance`.
    ///
    /// # Errors
    /// - [`Error::InvalidConfig`] if the optimizer configuration is out of range
    /// - [`Error::Infeasible`] if no schedule satisfies the constraints
    pub fn run(&self, instance: ProblemInstance) -> Result<SchedulingOutcome> {
        self.run_shared(&instance.into_shared())
    }

    /// Like [`run`](Self::run) for an already shared instance.
    pub fn run_shared(&self, instance: &Arc<ProblemInstance>) -> Result<SchedulingOutcome> {
        let optimizer = GeneticOptimizer::new(self.config.clone())?;
        let started = Instant::now();

        let initial = CspSolver::new(instance).solve().ok_or(Error::Infeasible)?;
        info!(
            tasks = instance.task_count(),
            agents = instance.agent_count(),
            makespan = initial.makespan(),
            "initial schedule found"
        );

        let optimized = optimizer.optimize(&initial)?;
        let comparison = Comparison::new(initial.makespan(), optimized.best_makespan);
        let elapsed = started.elapsed();
        info!(
            initial = comparison.initial_makespan,
            optimized = comparison.optimized_makespan,
            improvement = comparison.improvement,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "scheduling finished"
        );

        Ok(SchedulingOutcome {
            initial,
            optimized,
            comparison,
            elapsed,
        })
    }
}
