//! Task planning CLI.
//!
//! Schedules a scenario with the CSP solver, optimizes it with the genetic
//! optimizer, and prints both schedules with a comparison and KPIs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_taskplan::ga::{GaConfig, GaResult};
use u_taskplan::scenario::Scenario;
use u_taskplan::scheduler::{Comparison, ScheduleKpi, ScheduleReport, TaskScheduler};

#[derive(Parser)]
#[command(name = "u-taskplan")]
#[command(about = "Skill-constrained task scheduling with CSP and GA optimization")]
struct Cli {
    /// Scenario JSON file (defaults to the built-in demo scenario)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Write the built-in demo scenario to this path and exit
    #[arg(long)]
    write_default: Option<PathBuf>,

    /// Population size
    #[arg(long)]
    population: Option<usize>,

    /// Number of generations
    #[arg(long)]
    generations: Option<usize>,

    /// Mutation probability per offspring
    #[arg(long)]
    mutation_rate: Option<f64>,

    /// Elite schedules kept per generation
    #[arg(long)]
    elite: Option<usize>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn ga_config(&self) -> GaConfig {
        let mut config = GaConfig::quick();
        if let Some(n) = self.population {
            config = config.with_population_size(n);
        }
        if let Some(n) = self.generations {
            config = config.with_generations(n);
        }
        if let Some(rate) = self.mutation_rate {
            config = config.with_mutation_rate(rate);
        }
        if let Some(n) = self.elite {
            config = config.with_elite_size(n);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

#[derive(Serialize)]
struct Report<'a> {
    initial: ScheduleReport,
    optimized: ScheduleReport,
    optimizer: &'a GaResult,
    comparison: Comparison,
    kpi: ScheduleKpi,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &cli.write_default {
        Scenario::default_scenario()
            .write_to_path(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote default scenario");
        return Ok(());
    }

    let scenario = match &cli.scenario {
        Some(path) => Scenario::from_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Scenario::default_scenario(),
    };
    info!(
        tasks = scenario.tasks.len(),
        agents = scenario.agents.len(),
        skills = ?scenario.skills(),
        "loaded scenario"
    );
    let instance = scenario.into_instance()?;

    let outcome = TaskScheduler::new(cli.ga_config()).run(instance)?;
    let kpi = ScheduleKpi::calculate(&outcome.optimized.best);
    let elapsed_ms = outcome.elapsed.as_secs_f64() * 1000.0;

    if cli.json {
        let report = Report {
            initial: ScheduleReport::from_schedule(&outcome.initial),
            optimized: ScheduleReport::from_schedule(&outcome.optimized.best),
            optimizer: &outcome.optimized,
            comparison: outcome.comparison,
            kpi,
            elapsed_ms,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_schedule("Initial schedule (CSP)", &ScheduleReport::from_schedule(&outcome.initial));
    print_schedule(
        "Optimized schedule (GA)",
        &ScheduleReport::from_schedule(&outcome.optimized.best),
    );

    let c = &outcome.comparison;
    println!("\n=== Comparison ===");
    println!("Initial makespan: {}", c.initial_makespan);
    println!("Optimized makespan: {}", c.optimized_makespan);
    println!("Improvement: {} ({:.1}%)", c.improvement, c.improvement_pct);
    println!("Fallback schedules: {}", outcome.optimized.fallbacks);
    println!("Elapsed: {elapsed_ms:.1} ms");

    println!("\n=== KPI ===");
    println!("Total busy time: {}", kpi.total_busy_time);
    println!("Average utilization: {:.1}%", kpi.avg_utilization * 100.0);
    for (agent, util) in &kpi.utilization_by_agent {
        println!("  {agent}: {:.1}%", util * 100.0);
    }
    if !kpi.idle_agents.is_empty() {
        println!("Idle agents: {}", kpi.idle_agents.join(", "));
    }

    Ok(())
}

fn print_schedule(title: &str, report: &ScheduleReport) {
    println!("\n=== {title} ===");
    println!("Makespan: {} (valid: {})", report.makespan, report.valid);
    for a in &report.assignments {
        println!("  {}: {} [{} - {}]", a.task_id, a.agent_id, a.start, a.end);
    }
}
