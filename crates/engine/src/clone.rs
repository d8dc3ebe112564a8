//! Clone: materialize a registered project's head into a new directory

use crate::materialize::materialize;
use crate::project::Project;
use crate::registry::Registry;
use journal::{reconstruct, ThrowId};
use pebble_core::{PebbleError, PebbleResult};
use scanner::IgnoreRules;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a clone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOutcome {
    pub project_name: String,
    pub head: ThrowId,
    pub destination: PathBuf,
    pub files: usize,
}

/// Write the head state of project `name` into `destination`
///
/// The destination must be missing or an empty directory. It gets plain
/// files only; no `.pebble` directory is created there.
pub fn clone_project(name: &str, destination: &Path, registry: &dyn Registry) -> PebbleResult<CloneOutcome> {
    let entry = registry.lookup(name)?;
    check_destination(destination)?;

    let source = Project::open(&entry.folder_location)?;
    let head = source.baseline()?.head.ok_or(PebbleError::NoHistory)?;
    let journal = source.journal()?;
    let state = reconstruct(journal.throws(), &head)?;

    fs::create_dir_all(destination).map_err(|e| PebbleError::at(destination, e))?;
    let report = materialize(destination, &IgnoreRules::empty(destination), &state)?;
    info!(
        "Cloned {} at {} into {}",
        name,
        head,
        destination.display()
    );

    Ok(CloneOutcome {
        project_name: entry.project_name,
        head,
        destination: destination.to_path_buf(),
        files: report.written,
    })
}

fn check_destination(destination: &Path) -> PebbleResult<()> {
    if !destination.exists() {
        return Ok(());
    }
    if !destination.is_dir() {
        return Err(PebbleError::DestinationNotEmpty(destination.to_path_buf()));
    }
    let mut entries = fs::read_dir(destination).map_err(|e| PebbleError::at(destination, e))?;
    if entries.next().is_some() {
        return Err(PebbleError::DestinationNotEmpty(destination.to_path_buf()));
    }
    Ok(())
}
