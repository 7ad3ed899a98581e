//! Pairwise hazard detection over a task list's declared touch sets
//! (spec §4.7).

use crate::types::Task;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Raw,
    War,
    Waw,
    Mutex,
}

#[derive(Debug, Clone)]
pub struct Hazard {
    pub kind: HazardKind,
    pub source: String,
    pub target: String,
    pub component: String,
}

/// Detects RAW/WAR/WAW/MUTEX hazards between every ordered task pair
/// `(i, j)` with `i` preceding `j` in `tasks`. Emits in deterministic
/// order: outer loop by task index, inner loop by sorted component (or
/// mutex) name.
pub fn detect_hazards(tasks: &[Task]) -> Vec<Hazard> {
    let mut hazards = Vec::new();

    for i in 0..tasks.len() {
        for j in (i + 1)..tasks.len() {
            let task_i = &tasks[i];
            let task_j = &tasks[j];

            let components: BTreeSet<&String> = task_i
                .touches
                .reads
                .iter()
                .chain(task_i.touches.writes.iter())
                .chain(task_j.touches.reads.iter())
                .chain(task_j.touches.writes.iter())
                .collect();

            for component in components {
                let i_writes = task_i.touches.writes.contains(component);
                let i_reads = task_i.touches.reads.contains(component);
                let j_writes = task_j.touches.writes.contains(component);
                let j_reads = task_j.touches.reads.contains(component);

                if i_writes && j_reads {
                    hazards.push(Hazard {
                        kind: HazardKind::Raw,
                        source: task_i.id.clone(),
                        target: task_j.id.clone(),
                        component: component.clone(),
                    });
                }
                if j_writes && i_reads && !i_writes {
                    hazards.push(Hazard {
                        kind: HazardKind::War,
                        source: task_j.id.clone(),
                        target: task_i.id.clone(),
                        component: component.clone(),
                    });
                }
                if i_writes && j_writes {
                    hazards.push(Hazard {
                        kind: HazardKind::Waw,
                        source: task_i.id.clone(),
                        target: task_j.id.clone(),
                        component: component.clone(),
                    });
                }
            }

            let mutexes: BTreeSet<&String> = task_i.mutexes.iter().filter(|m| task_j.mutexes.contains(m)).collect();
            for mutex in mutexes {
                hazards.push(Hazard {
                    kind: HazardKind::Mutex,
                    source: task_i.id.clone(),
                    target: task_j.id.clone(),
                    component: mutex.clone(),
                });
            }
        }
    }

    hazards
}
