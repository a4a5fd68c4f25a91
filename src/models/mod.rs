//! Scheduling domain models.
//!
//! Provides the data types for task-to-agent scheduling problems and
//! their solutions.
//!
//! | Type | Role |
//! |------|------|
//! | `Task` | Unit of work: duration, dependencies, required skills |
//! | `Agent` | Worker with a skill set |
//! | `ProblemInstance` | Immutable task/agent base shared by all schedules |
//! | `Schedule` | Per-task agent/start overlay over an instance |

mod agent;
mod instance;
mod schedule;
mod task;

pub use agent::Agent;
pub use instance::ProblemInstance;
pub use schedule::{Assignment, Schedule, Slot, Violation, ViolationType};
pub use task::Task;
