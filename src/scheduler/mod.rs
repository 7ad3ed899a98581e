//! Task scheduling: hazard detection, wave assignment, critical path
//! (spec §4.7).

pub mod critical_path;
pub mod hazards;
pub mod waves;

pub use critical_path::critical_path;
pub use hazards::{detect_hazards, Hazard, HazardKind};
pub use waves::assign_waves;
