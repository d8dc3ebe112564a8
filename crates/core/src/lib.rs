//! Pebble Core - storage primitives for the Pebble snapshot engine
//!
//! This crate provides the foundational layer shared by every other crate:
//! - BLAKE3 content digests
//! - Captured file content (text or binary blobs)
//! - The `.pebble/` control directory with atomic, all-or-nothing updates
//! - The typed error taxonomy

pub mod blob;
pub mod error;
pub mod hash;
pub mod store;

// Re-export main types for convenience
pub use blob::Blob;
pub use error::{ErrorCategory, PebbleError, PebbleResult};
pub use hash::Blake3Hash;
pub use store::{ControlDir, Transaction};
