//! Restart strategy derivation for a failed task (spec §4.8).

use crate::types::Task;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartStrategy {
    IsolatedRetry,
    CascadeRestart { affected: Vec<String> },
    Escalate { affected: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct RestartDecision {
    pub strategy: RestartStrategy,
    pub reason: String,
}

/// Derives how to recover from a failed task: retry it alone when safe,
/// cascade-restart everything downstream of its writes/mutexes, or
/// escalate to a human when a completed task already consumed its output.
pub fn derive_restart_strategy(
    failed_task: &Task,
    all_tasks: &[Task],
    completed_ids: &HashSet<String>,
    dispatched_ids: &HashSet<String>,
) -> RestartDecision {
    if failed_task.touches.writes.is_empty() && failed_task.mutexes.is_empty() {
        return RestartDecision {
            strategy: RestartStrategy::IsolatedRetry,
            reason: format!("{} declares no writes or mutexes; retrying in isolation is always safe", failed_task.id),
        };
    }

    let mut affected: Vec<(&Task, Vec<String>)> = Vec::new();
    for task in all_tasks {
        if task.id == failed_task.id {
            continue;
        }
        if !completed_ids.contains(&task.id) && !dispatched_ids.contains(&task.id) {
            continue;
        }

        let mut overlaps = Vec::new();
        let read_overlap: Vec<&String> = task.touches.reads.iter().filter(|c| failed_task.touches.writes.contains(*c)).collect();
        for component in &read_overlap {
            overlaps.push(format!("reads {component} written by {}", failed_task.id));
        }
        let mutex_overlap: Vec<&String> = task.mutexes.iter().filter(|m| failed_task.mutexes.contains(*m)).collect();
        for mutex in &mutex_overlap {
            overlaps.push(format!("shares mutex {mutex} with {}", failed_task.id));
        }

        if !overlaps.is_empty() {
            affected.push((task, overlaps));
        }
    }

    if affected.is_empty() {
        return RestartDecision {
            strategy: RestartStrategy::IsolatedRetry,
            reason: format!("no completed or dispatched task overlaps {}'s writes or mutexes", failed_task.id),
        };
    }

    let completed_consumer = affected.iter().find(|(task, _)| completed_ids.contains(&task.id));
    if let Some((task, overlaps)) = completed_consumer {
        return RestartDecision {
            strategy: RestartStrategy::Escalate {
                affected: affected.iter().map(|(t, _)| t.id.clone()).collect(),
            },
            reason: format!(
                "{} already completed and {}; a consumer has already committed to a potentially-incorrect output",
                task.id,
                overlaps.join(", ")
            ),
        };
    }

    let affected_ids: Vec<String> = affected.iter().map(|(t, _)| t.id.clone()).collect();
    let reasons: Vec<String> = affected.iter().flat_map(|(_, overlaps)| overlaps.clone()).collect();
    RestartDecision {
        strategy: RestartStrategy::CascadeRestart {
            affected: affected_ids,
        },
        reason: format!("dispatched tasks overlap {}'s writes/mutexes and must be cancelled and rescheduled: {}", failed_task.id, reasons.join(", ")),
    }
}
