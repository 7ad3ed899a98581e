//! Tagged error taxonomy for the analysis core (see spec §7).
//!
//! Every failure mode is a named variant carrying the structured context
//! needed to locate the cause — component name, task id, file path, or
//! commit sha — rather than a pre-formatted string. Validation failures
//! (manifest, plan) are terminal for the call that raised them; scan
//! failures (per-file import parse, per-commit git parse) are represented
//! as data (`ImportWarning`, not a `CoreError` variant) and accumulated
//! instead of aborting the caller.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest invalid: {reason}")]
    ManifestInvalid { reason: String },

    #[error("plan invalid: {reason}")]
    PlanInvalid { reason: String },

    #[error("cyclic plan: tasks {task_ids:?} form a scheduling cycle")]
    CyclicPlan { task_ids: Vec<String> },

    #[error("git invocation failed: {command}: {stderr}")]
    GitInvocation { command: String, stderr: String },

    #[error("filesystem error at {path}: {source}")]
    FileSystemIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown component or tag reference: {reference}")]
    UnknownRef { reference: String },
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystemIo {
            path: path.into(),
            source,
        }
    }
}

/// Advisory outcome of a git-backed operation that degrades gracefully
/// instead of failing the caller (spec §7: `GitUnavailable` returns an
/// empty result with a flag, it does not abort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GitAvailability {
    pub available: bool,
}

impl GitAvailability {
    pub fn unavailable() -> Self {
        Self { available: false }
    }

    pub fn available() -> Self {
        Self { available: true }
    }
}
