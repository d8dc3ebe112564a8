//! Scoped working-tree walks
//!
//! Enumerates regular files under the project root (or under a list of
//! scoped entries), pruning ignored directories and the control directory.
//! Symlinks are not followed and not reported.

use crate::ignore::IgnoreRules;
use pebble_core::store::{normalize_path, relative_to_root};
use pebble_core::PebbleResult;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What part of the working tree a scan covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanScope {
    /// Everything under the project root
    Full,
    /// Only these normalized entries (files or directories); the empty
    /// string stands for the root itself
    Paths(BTreeSet<String>),
}

impl ScanScope {
    /// Build a scope from user-supplied entries
    ///
    /// No entries means a full scan. Entries are normalized relative to
    /// `root`; anything outside of it is rejected.
    pub fn resolve(root: &Path, subpaths: &[PathBuf]) -> PebbleResult<Self> {
        if subpaths.is_empty() {
            return Ok(Self::Full);
        }

        let mut entries = BTreeSet::new();
        for subpath in subpaths {
            let rel = relative_to_root(root, subpath)?;
            entries.insert(rel.unwrap_or_default());
        }
        Ok(Self::Paths(entries))
    }

    /// Check if this scope covers the whole project
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Collect relative paths of every regular file in scope
pub fn collect_files(
    root: &Path,
    rules: &IgnoreRules,
    scope: &ScanScope,
) -> PebbleResult<BTreeSet<String>> {
    let mut files = BTreeSet::new();

    match scope {
        ScanScope::Full => walk_dir(root, root, rules, &mut files),
        ScanScope::Paths(entries) => {
            for rel in entries {
                if rel.is_empty() {
                    walk_dir(root, root, rules, &mut files);
                    continue;
                }

                if rules.should_ignore_nested(rel) {
                    debug!("Skipping ignored scope entry {}", rel);
                    continue;
                }

                let abs = root.join(rel);
                if abs.is_file() {
                    files.insert(rel.clone());
                } else if abs.is_dir() {
                    walk_dir(root, &abs, rules, &mut files);
                } else {
                    warn!("Scope entry {} does not exist, skipping", rel);
                }
            }
        }
    }

    Ok(files)
}

/// Walk one directory, adding files relative to `root`
fn walk_dir(root: &Path, base: &Path, rules: &IgnoreRules, files: &mut BTreeSet<String>) {
    let walker = WalkDir::new(base)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || rel_of(root, entry.path())
                    .map(|rel| !rules.should_ignore(&rel))
                    .unwrap_or(true)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry during scan: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match rel_of(root, entry.path()) {
            Some(rel) => {
                files.insert(rel);
            }
            None => warn!("Skipping unrepresentable path {}", entry.path().display()),
        }
    }
}

fn rel_of(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    normalize_path(rel).ok()
}
