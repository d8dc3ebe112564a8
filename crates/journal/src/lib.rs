//! Throw history and project state
//!
//! This crate provides:
//! - Throw records (random alphanumeric IDs, parent links, captured content)
//! - The append-only throw journal
//! - The project baseline (last committed digests + head)
//! - The staging state produced by gather
//! - Chain indexing and history replay

pub mod baseline;
pub mod journal;
pub mod replay;
pub mod staging;
pub mod throw;

// Re-exports
pub use baseline::Baseline;
pub use journal::Journal;
pub use replay::{reconstruct, ChainIndex, FileState};
pub use staging::StagingState;
pub use throw::{ChangeSet, Throw, ThrowId};
