//! Scheduling pipeline and KPI evaluation.
//!
//! # Pipeline
//!
//! `TaskScheduler` finds a feasible schedule with the CSP solver, then
//! shortens it with the genetic optimizer and reports the makespan gain.
//!
//! # KPI
//!
//! `ScheduleKpi` computes standard scheduling metrics: makespan, busy time,
//! utilization, and idle agents.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1, 14
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod kpi;
mod pipeline;

pub use kpi::ScheduleKpi;
pub use pipeline::{Comparison, ScheduleReport, SchedulingOutcome, TaskScheduler};
