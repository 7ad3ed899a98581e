//! Critical-path reconstruction over the RAW-only dependency graph
//! (spec §4.7).

use super::hazards::{Hazard, HazardKind};
use crate::error::{CoreError, Result};
use crate::types::Task;
use std::collections::{HashMap, HashSet};

/// Returns the longest RAW-dependency chain (task ids, source-to-sink
/// order) and the memoized `longest_path_to` value for every task.
pub fn critical_path(tasks: &[Task], hazards: &[Hazard]) -> Result<(Vec<String>, HashMap<String, u32>)> {
    let mut raw_preds: HashMap<&str, Vec<&str>> = HashMap::new();
    for hazard in hazards {
        if hazard.kind == HazardKind::Raw {
            raw_preds.entry(hazard.target.as_str()).or_default().push(hazard.source.as_str());
        }
    }

    let mut memo: HashMap<String, u32> = HashMap::new();
    let mut in_progress: HashSet<String> = HashSet::new();
    for task in tasks {
        longest_path_to(&task.id, &raw_preds, &mut memo, &mut in_progress)?;
    }

    let Some(sink) = tasks.iter().map(|t| t.id.clone()).max_by_key(|id| memo[id]) else {
        return Ok((Vec::new(), memo));
    };

    let mut chain = vec![sink.clone()];
    let mut current = sink;
    loop {
        let preds = raw_preds.get(current.as_str()).cloned().unwrap_or_default();
        let current_value = memo[&current];
        let Some(next) = preds
            .iter()
            .filter(|p| memo[**p] == current_value - 1)
            .min()
            .map(|p| p.to_string())
        else {
            break;
        };
        chain.push(next.clone());
        current = next;
    }
    chain.reverse();

    Ok((chain, memo))
}

fn longest_path_to(
    id: &str,
    raw_preds: &HashMap<&str, Vec<&str>>,
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

    let preds = raw_preds.get(id).cloned().unwrap_or_default();
    let mut best = 0;
    for pred in preds {
        best = best.max(longest_path_to(pred, raw_preds, memo, in_progress)?);
    }

    in_progress.remove(id);
    let value = 1 + best;
    memo.insert(id.to_string(), value);
    Ok(value)
}
