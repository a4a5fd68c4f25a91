//! Constraint-satisfaction solving.
//!
//! Produces a first feasible schedule by backtracking over agent choices
//! in dependency order.
//!
//! # Constraints
//!
//! | Constraint | Enforced by |
//! |------------|-------------|
//! | Skills | Only capable agents are candidates |
//! | Dependencies | Start no earlier than the latest dependency end |
//! | No overlap | Earliest-fit gap search on the agent's timeline |
//!
//! # Submodules
//!
//! - [`earliest_start`]: gap search, shared with the optimizer's repair step

mod csp;
mod placement;

pub use csp::CspSolver;
pub use placement::earliest_start;
