//! Doc freshness is handled in `manifest::freshness`; this module covers
//! the remaining enforcement surface: capability violations and restart
//! strategy derivation (spec §4.8).

pub mod capability;
pub mod restart;

pub use capability::{verify_capabilities, CapabilityReport, CapabilityViolation};
pub use restart::{derive_restart_strategy, RestartDecision, RestartStrategy};
