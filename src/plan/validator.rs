//! Plan validation against a manifest and (optionally) scheduler output
//! (spec §4.6).

use super::model::Plan;
use crate::error::{CoreError, Result};
use crate::imports::ImportScanResult;
use crate::scheduler::hazards::{Hazard, HazardKind};
use crate::types::Manifest;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

pub fn validate_plan(
    plan: &Plan,
    manifest: &Manifest,
    hazards: Option<&[Hazard]>,
    import_deps: Option<&HashSet<(String, String)>>,
) -> Result<ValidationReport> {
    check_unique_ids(plan)?;
    check_touches_reference_known_components(plan, manifest)?;
    check_verify_commands_nonempty(plan)?;

    let mut warnings = Vec::new();

    if let Some(hazards) = hazards {
        for hazard in hazards {
            if hazard.kind == HazardKind::Waw {
                warnings.push(format!(
                    "WAW hazard between {} and {} on component {}: both tasks write the same component",
                    hazard.source, hazard.target, hazard.component
                ));
            }
        }
    }

    if let Some(import_deps) = import_deps {
        for task in &plan.tasks {
            for write_component in &task.touches.writes {
                let undeclared_import_targets: Vec<&String> = import_deps
                    .iter()
                    .filter(|(from, to)| from == write_component && !task.touches.reads.contains(to))
                    .map(|(_, to)| to)
                    .collect();
                for target in undeclared_import_targets {
                    warnings.push(format!(
                        "task {}: writes {} which imports from {} but does not declare it as a read",
                        task.id, write_component, target
                    ));
                }
            }
        }
    }

    Ok(ValidationReport { warnings })
}

fn check_unique_ids(plan: &Plan) -> Result<()> {
    let mut seen = HashSet::new();
    for task in &plan.tasks {
        if !seen.insert(&task.id) {
            return Err(CoreError::PlanInvalid {
                reason: format!("duplicate task id: {}", task.id),
            });
        }
    }
    Ok(())
}

fn check_touches_reference_known_components(plan: &Plan, manifest: &Manifest) -> Result<()> {
    for task in &plan.tasks {
        for component in task.touches.reads.iter().chain(task.touches.writes.iter()) {
            if !manifest.components.contains_key(component) {
                return Err(CoreError::PlanInvalid {
                    reason: format!("task {}: unknown component {component:?} in touches", task.id),
                });
            }
        }
    }
    Ok(())
}

fn check_verify_commands_nonempty(plan: &Plan) -> Result<()> {
    let all_verify = plan
        .contract
        .preconditions
        .iter()
        .map(|c| (&c.id, &c.verify))
        .chain(plan.contract.postconditions.iter().map(|c| (&c.id, &c.verify)))
        .chain(plan.contract.invariants.iter().map(|i| (&i.id, &i.verify)));

    for (id, verify) in all_verify {
        if verify.trim().is_empty() {
            return Err(CoreError::PlanInvalid {
                reason: format!("condition {id}: verify command is empty"),
            });
        }
    }
    Ok(())
}
