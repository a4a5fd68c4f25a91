//! Generational GA runner.
//!
//! # Algorithm
//!
//! 1. **Initialize**: the seed schedule plus CSP solutions under randomly
//!    shuffled agent orders.
//! 2. **Each generation**:
//!    - Evaluate fitness (`1000 / (makespan + 1)`).
//!    - Keep a copy of the best schedule seen so far.
//!    - Carry the top `elite_size` schedules over unchanged.
//!    - Fill the rest: tournament-select two parents, cross them over,
//!      maybe mutate, and accept the child only if it is valid. Otherwise
//!      substitute a fresh random CSP schedule.
//! 3. **Return** the best schedule seen.
//!
//! The returned makespan never gets worse as generations are added.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::operators::{crossover, fitness, mutate, tournament_select};
use super::GaConfig;
use crate::error::{Error, Result};
use crate::models::Schedule;
use crate::solver::CspSolver;

/// Generations between progress log lines.
const PROGRESS_INTERVAL: usize = 20;

/// Genetic optimizer for schedule makespan.
///
/// # Example
///
/// ```
/// use u_taskplan::ga::{GaConfig, GeneticOptimizer};
/// use u_taskplan::models::{Agent, ProblemInstance, Task};
/// use u_taskplan::solver::CspSolver;
///
/// let instance = ProblemInstance::new(
///     vec![
///         Task::new("T1", 3).with_skill("A"),
///         Task::new("T2", 2).with_skill("A"),
///     ],
///     vec![Agent::new("A1").with_skill("A"), Agent::new("A2").with_skill("A")],
/// )
/// .into_shared();
/// let seed = CspSolver::new(&instance).solve().unwrap();
///
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_generations(5)
///     .with_elite_size(2)
///     .with_seed(42);
/// let result = GeneticOptimizer::new(config).unwrap().optimize(&seed).unwrap();
/// assert!(result.best.is_valid());
/// assert!(result.best_makespan <= seed.makespan());
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOptimizer {
    config: GaConfig,
}

/// Outcome of an optimizer run.
#[derive(Debug, Clone, Serialize)]
pub struct GaResult {
    /// Best schedule observed over the run.
    #[serde(skip)]
    pub best: Schedule,
    /// Makespan of `best`.
    pub best_makespan: i64,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Generations executed.
    pub generations: usize,
    /// Best-so-far makespan after each generation (non-increasing).
    pub history: Vec<i64>,
    /// Offspring replaced by random schedules because they were invalid.
    pub fallbacks: usize,
}

/// Per-run state: RNG, solver for replacements, and counters.
struct Run<'a> {
    config: &'a GaConfig,
    solver: CspSolver,
    seed: &'a Schedule,
    rng: SmallRng,
    fallbacks: usize,
}

impl GeneticOptimizer {
    /// Creates an optimizer, rejecting out-of-range configuration.
    pub fn new(config: GaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Evolves a population seeded with `seed` and returns the best
    /// schedule observed.
    ///
    /// # Errors
    /// [`Error::InvalidSeed`] if `seed` is not a valid schedule.
    pub fn optimize(&self, seed: &Schedule) -> Result<GaResult> {
        let mut seed = seed.clone();
        seed.calculate_makespan();
        if !seed.is_valid() {
            return Err(Error::InvalidSeed);
        }

        let rng = match self.config.seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_os_rng(),
        };
        let mut run = Run {
            config: &self.config,
            solver: CspSolver::new(seed.instance()),
            seed: &seed,
            rng,
            fallbacks: 0,
        };

        info!(
            population = self.config.population_size,
            generations = self.config.generations,
            seed_makespan = seed.makespan(),
            "starting genetic optimization"
        );

        let mut population = run.initial_population();
        let mut best = seed.clone();
        let mut best_fitness = 0.0;
        let mut history = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            let scores: Vec<f64> = population.iter().map(|s| fitness(s.makespan())).collect();

            let leader = argmax(&scores);
            if scores[leader] > best_fitness {
                best_fitness = scores[leader];
                best = population[leader].clone();
            }
            history.push(best.makespan());

            if generation % PROGRESS_INTERVAL == 0 {
                debug!(generation, best_makespan = best.makespan(), "generation");
            }

            population = run.next_generation(&population, &scores);
        }

        info!(
            best_makespan = best.makespan(),
            fallbacks = run.fallbacks,
            "genetic optimization finished"
        );

        Ok(GaResult {
            best_makespan: best.makespan(),
            best_fitness: fitness(best.makespan()),
            best,
            generations: self.config.generations,
            history,
            fallbacks: run.fallbacks,
        })
    }
}

impl Run<'_> {
    fn initial_population(&mut self) -> Vec<Schedule> {
        let mut population = Vec::with_capacity(self.config.population_size);
        population.push(self.seed.clone());
        while population.len() < self.config.population_size {
            let s = self.random_schedule();
            population.push(s);
        }
        population
    }

    fn next_generation(&mut self, population: &[Schedule], scores: &[f64]) -> Vec<Schedule> {
        let size = self.config.population_size;

        // Stable sort keeps population order among equal scores.
        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let mut next: Vec<Schedule> = ranked
            .iter()
            .take(self.config.elite_size)
            .map(|&i| population[i].clone())
            .collect();

        while next.len() < size {
            let p1 = tournament_select(scores, self.config.tournament_size, &mut self.rng);
            let p2 = tournament_select(scores, self.config.tournament_size, &mut self.rng);

            let rate = self.config.mutation_rate;
            let offspring = crossover(&population[p1], &population[p2], &mut self.rng).map(
                |child| {
                    if self.rng.random_bool(rate) {
                        mutate(&child, &mut self.rng)
                    } else {
                        child
                    }
                },
            );

            let accepted = offspring.and_then(|mut child| {
                child.calculate_makespan();
                child.is_valid().then_some(child)
            });
            match accepted {
                Some(child) => next.push(child),
                None => {
                    self.fallbacks += 1;
                    trace!("offspring rejected; substituting a random schedule");
                    let s = self.random_schedule();
                    next.push(s);
                }
            }
        }

        next
    }

    /// A CSP schedule under a random agent order, retried up to the
    /// configured cap. Falls back to the seed schedule when every attempt fails.
    fn random_schedule(&mut self) -> Schedule {
        for _ in 0..self.config.max_fallback_attempts {
            if let Some(s) = self.solver.solve_shuffled(&mut self.rng) {
                return s;
            }
        }
        warn!(
            attempts = self.config.max_fallback_attempts,
            "no random schedule found; reusing the seed schedule"
        );
        self.seed.clone()
    }
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::{Agent, ProblemInstance, Task};

    fn sample_instance() -> Arc<ProblemInstance> {
        ProblemInstance::new(
            vec![
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
            ],
            vec![
                Agent::new("A1").with_skills(["skill_A", "skill_B"]),
                Agent::new("A2").with_skills(["skill_B", "skill_C"]),
                Agent::new("A3").with_skills(["skill_A", "skill_C"]),
            ],
        )
        .into_shared()
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(12)
            .with_generations(15)
            .with_elite_size(3)
            .with_mutation_rate(0.3)
            .with_seed(42)
    }

    #[test]
    fn test_optimize_returns_valid_schedule() {
        let inst = sample_instance();
        let seed = CspSolver::new(&inst).solve().unwrap();
        let result = GeneticOptimizer::new(small_config())
            .unwrap()
            .optimize(&seed)
            .unwrap();

        assert!(result.best.is_valid(), "{:?}", result.best.violations());
        assert!(result.best_makespan <= seed.makespan());
        assert_eq!(result.generations, 15);
        assert_eq!(result.history.len(), 15);
        assert!((result.best_fitness - fitness(result.best_makespan)).abs() < 1e-12);
    }

    #[test]
    fn test_history_non_increasing() {
        let inst = sample_instance();
        let seed = CspSolver::new(&inst).solve().unwrap();
        let result = GeneticOptimizer::new(small_config().with_generations(40))
            .unwrap()
            .optimize(&seed)
            .unwrap();
        for w in result.history.windows(2) {
            assert!(w[1] <= w[0], "history regressed: {:?}", result.history);
        }
        assert_eq!(*result.history.last().unwrap(), result.best_makespan);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let inst = sample_instance();
        let seed = CspSolver::new(&inst).solve().unwrap();
        let opt = GeneticOptimizer::new(small_config()).unwrap();
        let a = opt.optimize(&seed).unwrap();
        let b = opt.optimize(&seed).unwrap();
        assert_eq!(a.best.slots(), b.best.slots());
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_zero_generations_returns_seed() {
        let inst = sample_instance();
        let seed = CspSolver::new(&inst).solve().unwrap();
        let result = GeneticOptimizer::new(small_config().with_generations(0))
            .unwrap()
            .optimize(&seed)
            .unwrap();
        assert_eq!(result.best.slots(), seed.slots());
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_single_member_population() {
        let inst = sample_instance();
        let seed = CspSolver::new(&inst).solve().unwrap();
        let config = GaConfig::default()
            .with_population_size(1)
            .with_elite_size(0)
            .with_generations(5)
            .with_seed(1);
        let result = GeneticOptimizer::new(config).unwrap().optimize(&seed).unwrap();
        assert!(result.best.is_valid());
    }

    #[test]
    fn test_invalid_seed_rejected() {
        let inst = sample_instance();
        let empty = Schedule::empty(&inst);
        let err = GeneticOptimizer::new(small_config())
            .unwrap()
            .optimize(&empty)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSeed));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = GeneticOptimizer::new(GaConfig::default().with_population_size(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_improves_obviously_bad_seed() {
        // Four independent tasks, all stacked on one agent by hand.
        let inst = ProblemInstance::new(
            (1..=4).map(|i| Task::new(format!("T{i}"), 5)).collect(),
            vec![Agent::new("A1"), Agent::new("A2")],
        )
        .into_shared();
        let mut seed = Schedule::empty(&inst);
        for i in 0..4 {
            seed.assign(&format!("T{}", i + 1), "A1", i * 5).unwrap();
        }
        seed.calculate_makespan();
        assert_eq!(seed.makespan(), 20);

        let config = GaConfig::default()
            .with_population_size(20)
            .with_generations(10)
            .with_elite_size(2)
            .with_seed(7);
        let result = GeneticOptimizer::new(config).unwrap().optimize(&seed).unwrap();
        // CSP seeds stack everything on their first-choice agent; only
        // crossover and mutation can split the load.
        assert!(result.best_makespan < 20);
        assert!(result.best_makespan >= 10);
    }

    fn uncovered_run<'a>(config: &'a GaConfig, seed: &'a Schedule) -> Run<'a> {
        Run {
            config,
            solver: CspSolver::new(seed.instance()),
            seed,
            rng: SmallRng::seed_from_u64(3),
            fallbacks: 0,
        }
    }

    fn uncovered_instance() -> Arc<ProblemInstance> {
        ProblemInstance::new(
            vec![
                Task::new("T1", 2).with_skill("skill_A"),
                Task::new("T2", 1).with_skill("skill_Z"),
            ],
            vec![Agent::new("A1").with_skill("skill_A")],
        )
        .into_shared()
    }

    #[test]
    fn test_random_schedule_falls_back_to_seed() {
        let inst = uncovered_instance();
        let mut seed = Schedule::empty(&inst);
        seed.assign("T1", "A1", 0).unwrap();
        let config = small_config().with_max_fallback_attempts(4);
        let mut run = uncovered_run(&config, &seed);

        let s = run.random_schedule();
        assert_eq!(s.slots(), seed.slots());
        assert_eq!(run.fallbacks, 0);
    }

    #[test]
    fn test_rejected_offspring_counted_as_fallbacks() {
        let inst = uncovered_instance();
        let seed = Schedule::empty(&inst);
        let config = GaConfig::default()
            .with_population_size(3)
            .with_elite_size(0)
            .with_max_fallback_attempts(2);
        let mut run = uncovered_run(&config, &seed);

        let population = vec![seed.clone(), seed.clone()];
        let next = run.next_generation(&population, &[1.0, 1.0]);
        assert_eq!(next.len(), 3);
        assert_eq!(run.fallbacks, 3);
        assert!(next.iter().all(|s| s.slots() == seed.slots()));
    }

    #[test]
    fn test_argmax_first_of_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[5.0]), 0);
    }
}
