//! Optimizer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Genetic optimizer parameters.
///
/// # Example
///
/// ```
/// use u_taskplan::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_generations(30)
///     .with_elite_size(4)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of schedules per generation (default: 50).
    pub population_size: usize,
    /// Number of generations to run (default: 100).
    pub generations: usize,
    /// Probability of mutating each offspring (default: 0.1).
    pub mutation_rate: f64,
    /// Schedules carried unchanged into the next generation (default: 10).
    pub elite_size: usize,
    /// Candidates sampled per tournament (default: 3).
    pub tournament_size: usize,
    /// CSP attempts per random replacement before falling back to the seed
    /// schedule (default: 32).
    pub max_fallback_attempts: usize,
    /// RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            elite_size: 10,
            tournament_size: 3,
            max_fallback_attempts: 32,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Smaller preset for interactive runs: 30 schedules, 50 generations.
    pub fn quick() -> Self {
        Self {
            population_size: 30,
            generations: 50,
            ..Self::default()
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_size(mut self, elite: usize) -> Self {
        self.elite_size = elite;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the retry cap for random replacement schedules.
    pub fn with_max_fallback_attempts(mut self, attempts: usize) -> Self {
        self.max_fallback_attempts = attempts;
        self
    }

    /// Sets the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.elite_size > self.population_size {
            return Err(Error::InvalidConfig(format!(
                "elite_size {} exceeds population_size {}",
                self.elite_size, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidConfig(format!(
                "mutation_rate {} is outside [0, 1]",
                self.mutation_rate
            )));
        }
        if self.tournament_size == 0 {
            return Err(Error::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        if self.max_fallback_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_fallback_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
