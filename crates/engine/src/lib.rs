//! Pebble engine: the operations behind every `pebble` command
//!
//! This crate provides:
//! - Gather (change detection into the staging state)
//! - Throw (commit staged changes as a new linked snapshot)
//! - Reset (step back one throw, or rebuild the tree at head)
//! - Clone (materialize a registered project's head elsewhere)
//! - Project bootstrap, deletion and the project registry
//! - Read-only inspection (status, log)

pub mod clone;
pub mod commit;
pub mod gather;
pub mod init;
pub mod inspect;
pub mod lock;
pub mod materialize;
pub mod project;
pub mod registry;
pub mod reset;

pub use clone::{clone_project, CloneOutcome};
pub use commit::{throw, ThrowOutcome};
pub use gather::{gather, GatherReport};
pub use init::{delete_project, init_project, InitOptions};
pub use inspect::{log, status, LogEntry, StatusReport};
pub use lock::ProjectLock;
pub use materialize::materialize;
pub use project::Project;
pub use registry::{FileRegistry, Registry, RegistryEntry};
pub use reset::{rebuild_to_head, step_back, ResetOutcome};
