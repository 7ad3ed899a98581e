//! Plan document parsing, validation, diffing, and execution-log ingestion
//! (spec §4.6).

mod diff;
mod log;
mod model;
mod parser;
mod validator;

pub use diff::{diff_plans, ChangeKind, ConditionChange, FieldChange, PlanDiff, TaskChange};
pub use log::{
    parse_execution_log, ExecutionLog, InvariantCheck, PostconditionResult, SessionInfo, TaskLogRecord, TaskMetrics,
    TaskStatus, WaveLogRecord,
};
pub use model::{Condition, Contract, Invariant, Plan, PlanMetadata};
pub use parser::parse_plan;
pub use validator::{validate_plan, ValidationReport};
