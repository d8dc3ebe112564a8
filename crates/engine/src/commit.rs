//! Throw: commit the staged changes as a new snapshot
//!
//! The staging state only names candidate paths. Every candidate is read
//! again at commit time and reclassified against the baseline, so the throw
//! records what is on disk now rather than what gather saw.

use crate::project::Project;
use crate::registry::Registry;
use journal::{ChangeSet, StagingState, Throw, ThrowId};
use pebble_core::{Blake3Hash, Blob, PebbleError, PebbleResult};
use rand::Rng;
use scanner::{read_contents, Capture};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Result of a successful throw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowOutcome {
    pub id: ThrowId,
    pub project_name: String,
    pub parent: Option<ThrowId>,
    pub changes: ChangeSet,
    /// False when the local commit succeeded but the registry head update failed
    pub registry_synced: bool,
}

/// Commit the staged changes of `project`
pub fn throw(project: &Project, message: &str, registry: &dyn Registry) -> PebbleResult<ThrowOutcome> {
    throw_with_rng(project, message, registry, &mut rand::thread_rng())
}

/// [`throw`] with an explicit ID source
pub fn throw_with_rng<R: Rng>(
    project: &Project,
    message: &str,
    registry: &dyn Registry,
    rng: &mut R,
) -> PebbleResult<ThrowOutcome> {
    let mut baseline = project.baseline()?;
    let mut journal = project.journal()?;
    let id = journal.generate_id(rng)?;

    let staging = project.staging()?;
    if staging.is_empty() {
        return Err(PebbleError::NothingStaged);
    }

    let captured = read_contents(project.root(), &project.rules()?, staging.candidates())?;
    let (changes, contents) = classify(&baseline.file_digests, captured);
    if changes.is_empty() {
        debug!("All {} staged paths match the baseline", staging.len());
        return Err(PebbleError::NothingStaged);
    }

    let parent = baseline.head.clone();
    journal.append(Throw::new(id.clone(), parent.clone(), changes.clone(), contents, message))?;
    baseline.apply(&id, &changes);

    let mut tx = project.control().transaction();
    journal.stage(&mut tx)?;
    baseline.stage(&mut tx)?;
    StagingState::default().stage(&mut tx)?;
    tx.commit()?;

    info!(
        "Created throw {} ({} added, {} modified, {} deleted)",
        id,
        changes.added.len(),
        changes.modified.len(),
        changes.deleted.len()
    );

    let registry_synced = match registry.update_head(&baseline.project_name, Some(&id)) {
        Ok(()) => true,
        Err(e) => {
            warn!("Throw {} committed but registry head not updated: {}", id, e);
            false
        }
    };

    Ok(ThrowOutcome {
        id,
        project_name: baseline.project_name,
        parent,
        changes,
        registry_synced,
    })
}

/// Fresh classification of captured candidates against the baseline digests
fn classify(
    baseline: &BTreeMap<String, Blake3Hash>,
    captured: BTreeMap<String, Capture>,
) -> (ChangeSet, BTreeMap<String, Blob>) {
    let mut changes = ChangeSet::default();
    let mut contents = BTreeMap::new();

    for (path, capture) in captured {
        match capture {
            Capture::Present(blob) => {
                let digest = blob.digest();
                match baseline.get(&path) {
                    None => {
                        changes.added.insert(path.clone(), digest);
                    }
                    Some(old) if *old != digest => {
                        changes.modified.insert(path.clone(), digest);
                    }
                    Some(_) => continue,
                }
                contents.insert(path, blob);
            }
            Capture::Missing if baseline.contains_key(&path) => {
                changes.deleted.insert(path);
            }
            Capture::Missing => debug!("Dropping vanished candidate {}", path),
        }
    }

    (changes, contents)
}
