//! GA-based makespan optimization.
//!
//! Refines a feasible schedule with a generational genetic algorithm.
//!
//! # Encoding
//!
//! A genome is the agent assignment per task. Start times are not part of
//! the genome: after crossover or mutation they are recomputed by
//! [`operators::repair`] with the same earliest-fit placement the CSP
//! solver uses. Offspring that cannot be repaired into a valid schedule are
//! replaced by fresh CSP schedules.
//!
//! # Submodules
//!
//! - [`operators`]: fitness, tournament selection, crossover, mutation, repair
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"

mod config;
pub mod operators;
mod optimizer;

pub use config::GaConfig;
pub use optimizer::{GaResult, GeneticOptimizer};
