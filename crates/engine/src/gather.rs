//! Change detection: compare the working tree against the baseline and
//! stage the differences

use crate::project::Project;
use journal::{StagingState, ThrowId};
use pebble_core::{Blake3Hash, PebbleResult};
use scanner::{scan_digests, ScanScope};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of a gather
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatherReport {
    pub added: BTreeMap<String, Blake3Hash>,
    pub modified: BTreeMap<String, Blake3Hash>,
    /// Only ever filled by a full-project gather
    pub deleted: BTreeSet<String>,
    /// Files that could not be read, with the reason; never staged
    pub unreadable: BTreeMap<String, String>,
    /// Head at gather time
    pub last_commit: Option<ThrowId>,
    /// Whether the whole project was scanned
    pub full_scan: bool,
}

impl GatherReport {
    /// Check if no change was detected
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// Detect changes in `subpaths` (everything when empty) and replace the
/// staging state with them
pub fn gather(project: &Project, subpaths: &[PathBuf]) -> PebbleResult<GatherReport> {
    let baseline = project.baseline()?;
    let scope = ScanScope::resolve(project.root(), subpaths)?;
    let scan = scan_digests(project.root(), &project.rules()?, &scope)?;

    let mut report = GatherReport {
        last_commit: baseline.head.clone(),
        full_scan: scope.is_full(),
        unreadable: scan.unreadable.clone(),
        ..Default::default()
    };

    for (path, digest) in &scan.digests {
        match baseline.digest(path) {
            None => {
                report.added.insert(path.clone(), *digest);
            }
            Some(old) if old != digest => {
                report.modified.insert(path.clone(), *digest);
            }
            Some(_) => {}
        }
    }

    if scope.is_full() {
        report.deleted = baseline
            .file_digests
            .keys()
            .filter(|path| !scan.contains(path))
            .cloned()
            .collect();
    }

    for (path, reason) in &report.unreadable {
        warn!("Not staging unreadable file {}: {}", path, reason);
    }

    let staging = StagingState {
        added: report.added.clone(),
        modified: report.modified.clone(),
        deleted: report.deleted.clone(),
        last_commit: report.last_commit.clone(),
    };
    staging.save(project.control())?;

    info!(
        "Gathered {} added, {} modified, {} deleted",
        report.added.len(),
        report.modified.len(),
        report.deleted.len()
    );
    Ok(report)
}
