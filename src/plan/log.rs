//! Execution log parsing — the record an orchestration layer leaves
//! behind after running a plan (spec §4.6).

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Complete,
    Partial,
    Blocked,
    NeedsReplan,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskMetrics {
    #[serde(default)]
    pub tokens: u64,
    #[serde(default)]
    pub minutes: f64,
    #[serde(default)]
    pub tools: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostconditionResult {
    pub id: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLogRecord {
    pub id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub metrics: TaskMetrics,
    #[serde(default)]
    pub files_modified: Vec<String>,
    #[serde(default)]
    pub postconditions: Vec<PostconditionResult>,
    #[serde(default)]
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvariantCheck {
    pub id: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveLogRecord {
    pub wave: u32,
    #[serde(default)]
    pub invariant_checks: Vec<InvariantCheck>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub started: String,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub session: SessionInfo,
    pub tasks: Vec<TaskLogRecord>,
    #[serde(default)]
    pub waves: Vec<WaveLogRecord>,
}

pub fn parse_execution_log(raw: &str) -> Result<ExecutionLog> {
    serde_json::from_str(raw).map_err(|e| CoreError::PlanInvalid {
        reason: format!("malformed execution log: {e}"),
    })
}
