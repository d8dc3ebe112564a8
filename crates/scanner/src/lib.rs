//! Working-tree scanning for Pebble
//!
//! This crate provides:
//! - Ignore rules read from `.pebbleignore` / `pebbleignore`
//! - Scoped directory walks that honour those rules
//! - Digest scans (with per-file failure markers) and content capture

pub mod ignore;
pub mod scan;
pub mod walk;

// Re-exports
pub use ignore::{is_ignored, IgnoreRules};
pub use scan::{read_contents, scan_digests, Capture, DigestScan};
pub use walk::{collect_files, ScanScope};
