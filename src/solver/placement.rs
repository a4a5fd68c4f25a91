//! Earliest-start placement shared by the solver and repair.

use crate::models::Schedule;

/// Earliest start for `task_idx` on `agent_idx`, given the tasks already
/// placed in `schedule`.
///
/// The start is the first gap on the agent's timeline at or after the
/// dependency-ready time that can hold the task's duration. The
/// dependency-ready time is the latest end among dependencies that already
/// have a start time (0 if none).
///
/// Single pass over the agent's placed tasks in start order: the first fit
/// wins, and if no gap fits the task goes after the agent's last task.
pub fn earliest_start(schedule: &Schedule, task_idx: usize, agent_idx: usize) -> i64 {
    let inst = schedule.instance();
    let duration = inst.task(task_idx).duration;

    let ready = inst
        .dependencies_of(task_idx)
        .iter()
        .filter_map(|&d| schedule.end_at(d))
        .max()
        .unwrap_or(0)
        .max(0);

    let mut busy: Vec<(i64, i64)> = schedule
        .slots()
        .iter()
        .enumerate()
        .filter(|&(i, slot)| i != task_idx && slot.agent == Some(agent_idx))
        .filter_map(|(i, slot)| slot.start.map(|s| (s, s + inst.task(i).duration)))
        .collect();
    busy.sort_unstable();

    let mut current = ready;
    for (start, end) in busy {
        if current + duration <= start {
            return current;
        }
        current = current.max(end);
    }
    current
}
