//! Validated schemas shared by every downstream analysis: the manifest's
//! component table, touches/task shapes, and the longest-prefix
//! file-to-component lookup (spec §4.1, "Types & Ownership").

mod manifest;
mod ownership;
mod touches;

pub use manifest::{Component, Manifest, PathSpec, Stability};
pub use ownership::{build_component_paths, component_paths, find_owning_component, ComponentPathEntry};
pub use touches::{ActionVerb, Budget, Task, Touches};
