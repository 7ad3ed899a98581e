//! Wave assignment over the combined RAW∪WAW∪MUTEX dependency graph
//! (spec §4.7).

use super::critical_path::critical_path;
use super::hazards::{Hazard, HazardKind};
use crate::error::{CoreError, Result};
use crate::types::Task;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Tasks grouped by wave index (0-based), each wave internally ordered
/// with critical-path tasks first (by decreasing path length), then the
/// remaining tasks by id.
pub fn assign_waves(tasks: &[Task], hazards: &[Hazard]) -> Result<Vec<Vec<String>>> {
    let mut deps: HashMap<&str, Vec<&str>> = HashMap::new();
    for hazard in hazards {
        if matches!(hazard.kind, HazardKind::Raw | HazardKind::Waw | HazardKind::Mutex) {
            deps.entry(hazard.target.as_str()).or_default().push(hazard.source.as_str());
        }
    }

    let mut wave_of: HashMap<String, u32> = HashMap::new();
    let mut in_progress: HashSet<String> = HashSet::new();
    for task in tasks {
        compute_wave(&task.id, &deps, &mut wave_of, &mut in_progress)?;
    }

    let (chain, longest_path) = critical_path(tasks, hazards)?;
    let on_critical_path: HashSet<&str> = chain.iter().map(|s| s.as_str()).collect();

    let max_wave = wave_of.values().copied().max().unwrap_or(0);
    let mut waves: Vec<Vec<String>> = vec![Vec::new(); (max_wave + 1) as usize];
    for task in tasks {
        waves[wave_of[&task.id] as usize].push(task.id.clone());
    }

    for wave in waves.iter_mut() {
        wave.sort_by(|a, b| {
            let a_on = on_critical_path.contains(a.as_str());
            let b_on = on_critical_path.contains(b.as_str());
            match (a_on, b_on) {
                (true, true) => longest_path[b].cmp(&longest_path[a]),
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => a.cmp(b),
            }
        });
    }

    Ok(waves)
}

fn compute_wave(
    id: &str,
    deps: &HashMap<&str, Vec<&str>>,
    memo: &mut HashMap<String, u32>,
    in_progress: &mut HashSet<String>,
) -> Result<u32> {
    if let Some(value) = memo.get(id) {
        return Ok(*value);
    }
    if !in_progress.insert(id.to_string()) {
        return Err(CoreError::CyclicPlan {
            task_ids: in_progress.iter().cloned().collect(),
        });
    }

    let preds = deps.get(id).cloned().unwrap_or_default();
    let mut best: Option<u32> = None;
    for pred in preds {
        let value = compute_wave(pred, deps, memo, in_progress)?;
        best = Some(best.map_or(value, |b| b.max(value)));
    }

    in_progress.remove(id);
    let value = best.map_or(0, |b| b + 1);
    memo.insert(id.to_string(), value);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionVerb, Touches};

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            description: String::new(),
            action: ActionVerb::Implement,
            values: vec![],
            touches: Touches::default(),
            mutexes: vec![],
            budget: None,
        }
    }

    fn hazard(kind: HazardKind, source: &str, target: &str) -> Hazard {
        Hazard {
            kind,
            source: source.to_string(),
            target: target.to_string(),
            component: "c".to_string(),
        }
    }

    #[test]
    fn independent_tasks_share_wave_zero() {
        let tasks = vec![task("t1"), task("t2")];
        let waves = assign_waves(&tasks, &[]).unwrap();
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0], vec!["t1".to_string(), "t2".to_string()]);
    }

    #[test]
    fn raw_dependency_forces_separate_waves() {
        let tasks = vec![task("t1"), task("t2")];
        let hazards = vec![hazard(HazardKind::Raw, "t1", "t2")];
        let waves = assign_waves(&tasks, &hazards).unwrap();
        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0], vec!["t1".to_string()]);
        assert_eq!(waves[1], vec!["t2".to_string()]);
    }

    #[test]
    fn mutex_hazard_also_forces_separate_waves() {
        let tasks = vec![task("t1"), task("t2")];
        let hazards = vec![hazard(HazardKind::Mutex, "t1", "t2")];
        let waves = assign_waves(&tasks, &hazards).unwrap();
        assert_eq!(waves.len(), 2);
    }

    #[test]
    fn cyclic_dependency_graph_errors() {
        let tasks = vec![task("t1"), task("t2")];
        let hazards = vec![hazard(HazardKind::Raw, "t1", "t2"), hazard(HazardKind::Waw, "t2", "t1")];
        let err = assign_waves(&tasks, &hazards).unwrap_err();
        assert!(matches!(err, CoreError::CyclicPlan { .. }));
    }

    #[test]
    fn critical_path_tasks_sort_before_others_within_a_wave() {
        let tasks = vec![task("t1"), task("t2"), task("t3"), task("t4")];
        let hazards = vec![
            hazard(HazardKind::Raw, "t1", "t3"),
            hazard(HazardKind::Raw, "t1", "t2"),
            hazard(HazardKind::Raw, "t2", "t4"),
        ];
        let waves = assign_waves(&tasks, &hazards).unwrap();
        assert_eq!(waves[0], vec!["t1".to_string()]);
        assert_eq!(waves[1][0], "t2");
    }
}
