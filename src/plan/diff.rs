//! Structural diff between two plans, matched by id (spec §4.6, §8
//! round-trip law: diffing a plan against itself yields no changes).

use super::model::Plan;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone)]
pub struct FieldChange {
    pub field: String,
    pub kind: ChangeKind,
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConditionChange {
    pub id: String,
    pub section: &'static str,
    pub kind: ChangeKind,
    pub detail: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TaskChange {
    pub id: String,
    pub kind: ChangeKind,
    pub detail: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanDiff {
    pub metadata: Vec<FieldChange>,
    pub contracts: Vec<ConditionChange>,
    pub tasks: Vec<TaskChange>,
}

pub fn diff_plans(a: &Plan, b: &Plan) -> PlanDiff {
    PlanDiff {
        metadata: diff_metadata(&a.metadata.fields, &b.metadata.fields),
        contracts: diff_contracts(a, b),
        tasks: diff_tasks(a, b),
    }
}

fn diff_metadata(a: &BTreeMap<String, String>, b: &BTreeMap<String, String>) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let all_fields: std::collections::BTreeSet<&String> = a.keys().chain(b.keys()).collect();

    for field in all_fields {
        match (a.get(field), b.get(field)) {
            (None, Some(value)) => changes.push(FieldChange {
                field: field.clone(),
                kind: ChangeKind::Added,
                before: None,
                after: Some(value.clone()),
            }),
            (Some(value), None) => changes.push(FieldChange {
                field: field.clone(),
                kind: ChangeKind::Removed,
                before: Some(value.clone()),
                after: None,
            }),
            (Some(before), Some(after)) if before != after => changes.push(FieldChange {
                field: field.clone(),
                kind: ChangeKind::Modified,
                before: Some(before.clone()),
                after: Some(after.clone()),
            }),
            _ => {}
        }
    }

    changes
}

fn diff_contracts(a: &Plan, b: &Plan) -> Vec<ConditionChange> {
    let mut changes = Vec::new();

    changes.extend(diff_condition_section(
        "preconditions",
        &a.contract.preconditions,
        &b.contract.preconditions,
    ));
    changes.extend(diff_condition_section(
        "postconditions",
        &a.contract.postconditions,
        &b.contract.postconditions,
    ));

    let a_invariants: BTreeMap<&str, (&str, &str, bool)> = a
        .contract
        .invariants
        .iter()
        .map(|i| (i.id.as_str(), (i.description.as_str(), i.verify.as_str(), i.critical)))
        .collect();
    let b_invariants: BTreeMap<&str, (&str, &str, bool)> = b
        .contract
        .invariants
        .iter()
        .map(|i| (i.id.as_str(), (i.description.as_str(), i.verify.as_str(), i.critical)))
        .collect();
    let all_ids: std::collections::BTreeSet<&str> = a_invariants.keys().chain(b_invariants.keys()).copied().collect();

    for id in all_ids {
        match (a_invariants.get(id), b_invariants.get(id)) {
            (None, Some(_)) => changes.push(ConditionChange {
                id: id.to_string(),
                section: "invariants",
                kind: ChangeKind::Added,
                detail: vec![],
            }),
            (Some(_), None) => changes.push(ConditionChange {
                id: id.to_string(),
                section: "invariants",
                kind: ChangeKind::Removed,
                detail: vec![],
            }),
            (Some(before), Some(after)) if before != after => {
                let mut detail = Vec::new();
                if before.0 != after.0 {
                    detail.push(format!("description: {:?} -> {:?}", before.0, after.0));
                }
                if before.1 != after.1 {
                    detail.push(format!("verify: {:?} -> {:?}", before.1, after.1));
                }
                if before.2 != after.2 {
                    detail.push(format!("critical: {} -> {}", before.2, after.2));
                }
                changes.push(ConditionChange {
                    id: id.to_string(),
                    section: "invariants",
                    kind: ChangeKind::Modified,
                    detail,
                });
            }
            _ => {}
        }
    }

    changes
}

fn diff_condition_section(
    section: &'static str,
    a: &[super::model::Condition],
    b: &[super::model::Condition],
) -> Vec<ConditionChange> {
    let a_map: BTreeMap<&str, (&str, &str)> = a.iter().map(|c| (c.id.as_str(), (c.description.as_str(), c.verify.as_str()))).collect();
    let b_map: BTreeMap<&str, (&str, &str)> = b.iter().map(|c| (c.id.as_str(), (c.description.as_str(), c.verify.as_str()))).collect();
    let all_ids: std::collections::BTreeSet<&str> = a_map.keys().chain(b_map.keys()).copied().collect();

    let mut changes = Vec::new();
    for id in all_ids {
        match (a_map.get(id), b_map.get(id)) {
            (None, Some(_)) => changes.push(ConditionChange {
                id: id.to_string(),
                section,
                kind: ChangeKind::Added,
                detail: vec![],
            }),
            (Some(_), None) => changes.push(ConditionChange {
                id: id.to_string(),
                section,
                kind: ChangeKind::Removed,
                detail: vec![],
            }),
            (Some(before), Some(after)) if before != after => {
                let mut detail = Vec::new();
                if before.0 != after.0 {
                    detail.push(format!("description: {:?} -> {:?}", before.0, after.0));
                }
                if before.1 != after.1 {
                    detail.push(format!("verify: {:?} -> {:?}", before.1, after.1));
                }
                changes.push(ConditionChange {
                    id: id.to_string(),
                    section,
                    kind: ChangeKind::Modified,
                    detail,
                });
            }
            _ => {}
        }
    }
    changes
}

fn diff_tasks(a: &Plan, b: &Plan) -> Vec<TaskChange> {
    let a_map: BTreeMap<&str, &crate::types::Task> = a.tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let b_map: BTreeMap<&str, &crate::types::Task> = b.tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let all_ids: std::collections::BTreeSet<&str> = a_map.keys().chain(b_map.keys()).copied().collect();

    let mut changes = Vec::new();
    for id in all_ids {
        match (a_map.get(id), b_map.get(id)) {
            (None, Some(_)) => changes.push(TaskChange {
                id: id.to_string(),
                kind: ChangeKind::Added,
                detail: vec![],
            }),
            (Some(_), None) => changes.push(TaskChange {
                id: id.to_string(),
                kind: ChangeKind::Removed,
                detail: vec![],
            }),
            (Some(before), Some(after)) => {
                let mut detail = Vec::new();
                if before.description != after.description {
                    detail.push("description changed".to_string());
                }
                if before.touches.reads != after.touches.reads || before.touches.writes != after.touches.writes {
                    detail.push("touches changed".to_string());
                }
                if before.mutexes != after.mutexes {
                    detail.push("mutexes changed".to_string());
                }
                if before.budget != after.budget {
                    detail.push("budget changed".to_string());
                }
                if !detail.is_empty() {
                    changes.push(TaskChange {
                        id: id.to_string(),
                        kind: ChangeKind::Modified,
                        detail,
                    });
                }
            }
            (None, None) => unreachable!(),
        }
    }
    changes
}
