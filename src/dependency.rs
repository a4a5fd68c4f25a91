//! Dependency ordering.
//!
//! Produces a linear task order in which every task follows the tasks it
//! depends on. The order drives both the CSP solver and the optimizer's
//! repair step.
//!
//! # Algorithm
//! Depth-first post-order over the dependency graph, visiting roots in input
//! order and dependencies in listed order. Runs on an explicit stack, so
//! deep dependency chains cannot overflow the call stack.
//!
//! A dependency met while its task is still on the active path closes a
//! cycle. That edge is dropped so the order stays total, and it is reported
//! in [`DependencyOrder::dropped_edges`].
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::ProblemInstance;

/// A dependency-consistent task order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOrder {
    /// Task positions, dependencies first.
    pub order: Vec<usize>,
    /// Edges `(task, dependency)` ignored because they close a cycle.
    pub dropped_edges: Vec<(usize, usize)>,
}

impl DependencyOrder {
    /// Whether any cycle edge was dropped.
    pub fn has_cycles(&self) -> bool {
        !self.dropped_edges.is_empty()
    }

    /// Task IDs in order.
    pub fn task_ids<'a>(&self, instance: &'a ProblemInstance) -> Vec<&'a str> {
        self.order
            .iter()
            .map(|&i| instance.task(i).id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Orders nodes of an adjacency list (`deps[i]` = nodes `i` depends on).
pub fn resolve_order<D: AsRef<[usize]>>(deps: &[D]) -> DependencyOrder {
    let n = deps.len();
    let mut marks = vec![Mark::Unvisited; n];
    let mut order = Vec::with_capacity(n);
    let mut dropped_edges = Vec::new();
    // (node, index of the next dependency to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::Visiting;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let node_deps = deps[node].as_ref();
            if frame.1 < node_deps.len() {
                let dep = node_deps[frame.1];
                frame.1 += 1;
                match marks[dep] {
                    Mark::Unvisited => {
                        marks[dep] = Mark::Visiting;
                        stack.push((dep, 0));
                    }
                    Mark::Visiting => dropped_edges.push((node, dep)),
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                order.push(node);
                stack.pop();
            }
        }
    }

    DependencyOrder {
        order,
        dropped_edges,
    }
}
