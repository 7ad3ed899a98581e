//! Plan data model: metadata, three-section contract, and tasks
//! (spec §3.2, §6).

use crate::types::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub fields: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub id: String,
    pub description: String,
    pub verify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invariant {
    pub id: String,
    pub description: String,
    pub verify: String,
    pub critical: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contract {
    pub preconditions: Vec<Condition>,
    pub invariants: Vec<Invariant>,
    pub postconditions: Vec<Condition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub metadata: PlanMetadata,
    pub contract: Contract,
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_roundtrips_through_json() {
        let plan = Plan {
            metadata: PlanMetadata::default(),
            contract: Contract::default(),
            tasks: vec![],
        };
        let json = serde_json::to_string(&plan).unwrap();
        let restored: Plan = serde_json::from_str(&json).unwrap();
        assert!(restored.tasks.is_empty());
    }
}
