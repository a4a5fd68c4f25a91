//! Schedule quality metrics (KPIs).
//!
//! Computes performance indicators from a completed schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Total Busy Time | Sum of task durations |
//! | Utilization | Agent busy time / makespan |
//! | Avg Utilization | Mean over all agents, idle ones included |
//! | Idle Agents | Agents with no assigned task |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: i64,
    /// Sum of durations of all scheduled tasks.
    pub total_busy_time: i64,
    /// Per-agent utilization (0.0..1.0), every agent listed.
    pub utilization_by_agent: BTreeMap<String, f64>,
    /// Mean utilization over all agents (0.0..1.0).
    pub avg_utilization: f64,
    /// Agents with no assigned task.
    pub idle_agents: Vec<String>,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let makespan = schedule.makespan();
        let busy = schedule.busy_time_by_agent();
        let total_busy_time: i64 = busy.values().sum();

        let mut utilization_by_agent = BTreeMap::new();
        let mut idle_agents = Vec::new();
        for agent in schedule.agents() {
            let agent_busy = busy.get(&agent.id).copied().unwrap_or(0);
            if agent_busy == 0 {
                idle_agents.push(agent.id.clone());
            }
            let util = schedule.agent_utilization(&agent.id).unwrap_or(0.0);
            utilization_by_agent.insert(agent.id.clone(), util);
        }

        let avg_utilization = if utilization_by_agent.is_empty() {
            0.0
        } else {
            utilization_by_agent.values().sum::<f64>() / utilization_by_agent.len() as f64
        };

        Self {
            makespan,
            total_busy_time,
            utilization_by_agent,
            avg_utilization,
            idle_agents,
        }
    }
}
