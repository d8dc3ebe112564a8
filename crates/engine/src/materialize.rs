//! Materialization of a reconstructed file state into a directory
//!
//! Used by reset (into the project root) and clone (into a fresh
//! destination):
//! 1. Write every path of the state, creating parent directories
//! 2. Delete every non-ignored file that is not part of the state
//! 3. Prune directories emptied by step 2
//!
//! Step 2 uses the ignore files as written in step 1. The control directory
//! is never touched, and neither is any ignored file: a state that would have
//! to replace one is refused before anything is written.

use journal::FileState;
use pebble_core::store::{atomic_write, is_control_path, normalize_path, CONTROL_DIR};
use pebble_core::{PebbleError, PebbleResult};
use scanner::{collect_files, IgnoreRules, ScanScope};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// What a materialization changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Files written from the state
    pub written: usize,
    /// Files removed because the state does not have them
    pub removed: Vec<String>,
}

/// Make the files under `root` match `state`
pub fn materialize(root: &Path, rules: &IgnoreRules, state: &FileState) -> PebbleResult<MaterializeReport> {
    // Reject the whole state before writing anything
    for path in state.keys() {
        check_target(path)?;
        check_conflicts(root, rules, path)?;
    }

    let mut report = MaterializeReport::default();
    for (path, blob) in state {
        write_file(root, path, blob.as_bytes())?;
        report.written += 1;
    }

    let mut rules = rules.clone();
    rules
        .reload_ignore_files()
        .map_err(|e| PebbleError::at(root, e))?;

    let existing = collect_files(root, &rules, &ScanScope::Full)?;
    for path in existing.into_iter().filter(|p| !state.contains_key(p)) {
        let abs = root.join(&path);
        fs::remove_file(&abs).map_err(|e| PebbleError::at(&abs, e))?;
        prune_empty_parents(root, &path);
        debug!("Removed {}", path);
        report.removed.push(path);
    }

    info!(
        "Materialized {} files into {} ({} removed)",
        report.written,
        root.display(),
        report.removed.len()
    );
    Ok(report)
}

/// A history path must be a plain relative path outside the control directory
fn check_target(path: &str) -> PebbleResult<()> {
    let normalized = normalize_path(Path::new(path))
        .map_err(|_| PebbleError::MalformedHistory(format!("unusable path '{}' in history", path)))?;
    if normalized != path {
        return Err(PebbleError::MalformedHistory(format!(
            "non-normalized path '{}' in history",
            path
        )));
    }
    if is_control_path(path) {
        return Err(PebbleError::MalformedHistory(format!(
            "history writes into {}: '{}'",
            CONTROL_DIR, path
        )));
    }
    Ok(())
}

/// Refuse to replace an ignored file that stands where `path` or one of its
/// parent directories must go
fn check_conflicts(root: &Path, rules: &IgnoreRules, path: &str) -> PebbleResult<()> {
    let parts: Vec<&str> = path.split('/').collect();
    for depth in 1..=parts.len() {
        let prefix = parts[..depth].join("/");
        let meta = match fs::symlink_metadata(root.join(&prefix)) {
            Ok(meta) => meta,
            Err(_) => return Ok(()),
        };

        let blocker = if depth == parts.len() {
            if meta.is_dir() {
                find_ignored(root, rules, &prefix)?
            } else {
                None
            }
        } else if !meta.is_dir() && rules.should_ignore_nested(&prefix) {
            Some(prefix)
        } else {
            None
        };

        if let Some(ignored) = blocker {
            return Err(PebbleError::invalid_path(
                path,
                format!("writing it would remove ignored file '{}'", ignored),
            ));
        }
    }
    Ok(())
}

/// First ignored entry below directory `dir`, if any
fn find_ignored(root: &Path, rules: &IgnoreRules, dir: &str) -> PebbleResult<Option<String>> {
    let abs = root.join(dir);
    let entries = fs::read_dir(&abs).map_err(|e| PebbleError::at(&abs, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| PebbleError::at(&abs, e))?;
        let rel = format!("{}/{}", dir, entry.file_name().to_string_lossy());
        if rules.should_ignore_nested(&rel) {
            return Ok(Some(rel));
        }
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            if let Some(found) = find_ignored(root, rules, &rel)? {
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}

fn write_file(root: &Path, rel: &str, data: &[u8]) -> PebbleResult<()> {
    let target = root.join(rel);

    // A file where a parent directory must go is replaced by the directory
    let mut ancestor = root.to_path_buf();
    let parts: Vec<&str> = rel.split('/').collect();
    for part in &parts[..parts.len() - 1] {
        ancestor.push(part);
        let meta = fs::symlink_metadata(&ancestor);
        if matches!(&meta, Ok(m) if !m.is_dir()) {
            fs::remove_file(&ancestor).map_err(|e| PebbleError::at(&ancestor, e))?;
        }
    }

    // And a directory where the file must go is removed
    if fs::symlink_metadata(&target).map(|m| m.is_dir()).unwrap_or(false) {
        fs::remove_dir_all(&target).map_err(|e| PebbleError::at(&target, e))?;
    }

    let parent = target.parent().unwrap_or(root);
    fs::create_dir_all(parent).map_err(|e| PebbleError::at(parent, e))?;
    atomic_write(parent, &target, data).map_err(|e| PebbleError::at(&target, e))
}

/// Remove the now-empty directories above a deleted file, up to `root`
fn prune_empty_parents(root: &Path, rel: &str) {
    let mut dir = Path::new(rel).parent();
    while let Some(current) = dir {
        if current.as_os_str().is_empty() {
            break;
        }
        // Not empty: nothing above it can be empty either
        if fs::remove_dir(root.join(current)).is_err() {
            break;
        }
        debug!("Pruned empty directory {}", current.display());
        dir = current.parent();
    }
}
