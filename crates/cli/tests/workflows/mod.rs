//! Workflow integration tests
//!
//! Tests for complete workflows that exercise multiple commands
//! and validate end-to-end behavior.

pub mod edge_cases;
pub mod project_lifecycle;
pub mod reset_clone;
pub mod throw_lifecycle;
