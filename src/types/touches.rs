//! Task and touch-set shapes shared between the plan model and the
//! scheduler (spec §3.2).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionVerb {
    Implement,
    Test,
    Document,
    Refactor,
    Migrate,
}

/// The read/write footprint a task declares against the component graph.
/// These are component references, not file paths — hazard detection
/// operates at component granularity (spec §4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Touches {
    #[serde(default)]
    pub reads: Vec<String>,
    #[serde(default)]
    pub writes: Vec<String>,
}

impl Touches {
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.writes.is_empty()
    }
}

/// A task's optional `<budget tokens="N" minutes="M" />` (spec §4.6, §6).
/// Advisory metadata only — the core models it but does not enforce it
/// (spec §9 open-question decision).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub tokens: Option<i64>,
    pub minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub action: ActionVerb,
    /// Priority ordering hints (the plan document's `<values>` list,
    /// comma-split and numeric-parsed). Advisory only — the scheduler's
    /// wave and critical-path computation derive entirely from touches
    /// and mutexes (spec §3.2, §4.7).
    #[serde(default)]
    pub values: Vec<i64>,
    #[serde(default)]
    pub touches: Touches,
    /// Named mutual-exclusion locks this task must hold exclusively while
    /// running, independent of its touch set (spec §4.3, MUTEX hazard).
    #[serde(default)]
    pub mutexes: Vec<String>,
    #[serde(default)]
    pub budget: Option<Budget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touches_default_is_empty() {
        assert!(Touches::default().is_empty());
    }

    #[test]
    fn touches_with_only_reads_is_not_empty() {
        let touches = Touches {
            reads: vec!["core".into()],
            writes: vec![],
        };
        assert!(!touches.is_empty());
    }

    #[test]
    fn task_roundtrips_through_json() {
        let task = Task {
            id: "t1".into(),
            description: "implement auth".into(),
            action: ActionVerb::Implement,
            values: vec![10, 5],
            touches: Touches {
                reads: vec!["core".into()],
                writes: vec!["auth".into()],
            },
            mutexes: vec!["migration-lock".into()],
            budget: Some(Budget {
                tokens: Some(30_000),
                minutes: Some(10),
            }),
        };
        let json = serde_json::to_string(&task).unwrap();
        let restored: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, task.id);
        assert_eq!(restored.touches.writes, vec!["auth".to_string()]);
        assert_eq!(restored.budget, task.budget);
    }

    #[test]
    fn task_without_budget_defaults_to_none() {
        let json = r#"{"id":"t1","description":"","action":"implement","touches":{}}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.budget.is_none());
    }
}
