//! Digest scans and content capture

use crate::ignore::IgnoreRules;
use crate::walk::{collect_files, ScanScope};
use pebble_core::hash::hash_file;
use pebble_core::{Blake3Hash, Blob, PebbleError, PebbleResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Result of hashing every file in a scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestScan {
    /// Relative path -> digest
    pub digests: BTreeMap<String, Blake3Hash>,
    /// Files that exist but could not be read, with the reason
    pub unreadable: BTreeMap<String, String>,
}

impl DigestScan {
    /// Check if a path was seen at all (readable or not)
    pub fn contains(&self, rel_path: &str) -> bool {
        self.digests.contains_key(rel_path) || self.unreadable.contains_key(rel_path)
    }
}

/// Hash every file in scope
///
/// Per-file read failures are recorded in [`DigestScan::unreadable`] and do
/// not abort the scan.
pub fn scan_digests(root: &Path, rules: &IgnoreRules, scope: &ScanScope) -> PebbleResult<DigestScan> {
    let files = collect_files(root, rules, scope)?;
    let mut scan = DigestScan::default();

    for rel in files {
        match hash_file(&root.join(&rel)) {
            Ok(digest) => {
                scan.digests.insert(rel, digest);
            }
            Err(e) => {
                warn!("Could not hash {}: {}", rel, e);
                scan.unreadable.insert(rel, e.to_string());
            }
        }
    }

    debug!(
        "Scanned {} files ({} unreadable)",
        scan.digests.len(),
        scan.unreadable.len()
    );
    Ok(scan)
}

/// Content captured for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// The file exists; its full content
    Present(Blob),
    /// No regular file at this path any more
    Missing,
}

/// Read the full content of specific paths
///
/// An ignored path counts as missing, so a tracked file that became ignored
/// can still be recorded as deleted. A file that exists but cannot be read is
/// an error: its content cannot be captured.
pub fn read_contents<'a, I>(root: &Path, rules: &IgnoreRules, paths: I) -> PebbleResult<BTreeMap<String, Capture>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut captured = BTreeMap::new();

    for rel in paths {
        let abs = root.join(rel);
        let capture = if rules.should_ignore_nested(rel) {
            debug!("Treating ignored path {} as missing", rel);
            Capture::Missing
        } else if abs.is_file() {
            let data = fs::read(&abs).map_err(|e| PebbleError::at(&abs, e))?;
            Capture::Present(Blob::from_bytes(data))
        } else {
            Capture::Missing
        };
        captured.insert(rel.to_string(), capture);
    }

    Ok(captured)
}
