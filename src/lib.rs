//! Skill-constrained multi-agent task scheduling.
//!
//! Assigns tasks with durations, dependencies, and required skills to agents
//! that have those skills, then minimizes the makespan.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Agent`, `ProblemInstance`, `Schedule`,
//!   `Assignment`, `Violation`
//! - **`dependency`**: Dependency ordering with cycle reporting
//! - **`validation`**: Input integrity checks (duplicate IDs, durations, DAG cycles, skill coverage)
//! - **`solver`**: CSP backtracking solver and earliest-fit placement
//! - **`ga`**: Genetic makespan optimizer
//! - **`scheduler`**: CSP-then-GA pipeline and KPIs
//! - **`scenario`**: JSON scenario files and the built-in demo problem
//!
//! # Example
//!
//! ```
//! use u_taskplan::ga::GaConfig;
//! use u_taskplan::models::{Agent, ProblemInstance, Task};
//! use u_taskplan::scheduler::TaskScheduler;
//!
//! let instance = ProblemInstance::validated(
//!     vec![
//!         Task::new("T1", 3).with_skill("A"),
//!         Task::new("T2", 2).with_dependency("T1").with_skill("B"),
//!     ],
//!     vec![Agent::new("A1").with_skills(["A", "B"])],
//! )
//! .unwrap();
//!
//! let outcome = TaskScheduler::new(GaConfig::quick().with_seed(7))
//!     .run(instance)
//!     .unwrap();
//! assert_eq!(outcome.optimized.best_makespan, 5);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

pub mod dependency;
pub mod error;
pub mod ga;
pub mod models;
pub mod scenario;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{Error, Result};
