//! Ignore rule management for Pebble
//!
//! Sources of ignore entries:
//! 1. Built-in: the `.pebble/` control directory (always active)
//! 2. `.pebbleignore` at the project root
//! 3. `pebbleignore` at the project root
//!
//! Entries are literal, one per line. A path is ignored when its full
//! relative form or its final segment equals an entry. There is no glob
//! syntax: `*.log` only matches a file literally named `*.log`.

use pebble_core::store::CONTROL_DIR;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ignore file names recognised at the project root
pub const IGNORE_FILES: [&str; 2] = [".pebbleignore", "pebbleignore"];

/// Ignore rule set for one project root
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    /// Project root directory
    root: PathBuf,

    /// Union of the entries of every ignore file present
    entries: BTreeSet<String>,

    /// Ignore files that were found
    sources: Vec<PathBuf>,
}

impl IgnoreRules {
    /// Load ignore rules for a project root
    pub fn load(root: &Path) -> io::Result<Self> {
        let mut rules = Self::empty(root);
        rules.reload_ignore_files()?;
        Ok(rules)
    }

    /// Rules with only the built-in control directory entry
    pub fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            entries: BTreeSet::new(),
            sources: Vec::new(),
        }
    }

    /// Reload ignore files from disk
    pub fn reload_ignore_files(&mut self) -> io::Result<()> {
        self.entries.clear();
        self.sources.clear();

        for name in IGNORE_FILES {
            let path = self.root.join(name);
            if !path.is_file() {
                continue;
            }

            let text = fs::read_to_string(&path)?;
            self.entries.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
            self.sources.push(path);
        }

        debug!(
            "Loaded {} ignore entries from {} file(s)",
            self.entries.len(),
            self.sources.len()
        );
        Ok(())
    }

    /// Check if a `/`-separated relative path should be ignored
    pub fn should_ignore(&self, rel_path: &str) -> bool {
        let rel_path = rel_path.trim_end_matches('/');

        // 1. Built-in (always enforced)
        if Self::is_builtin_ignored(rel_path) {
            return true;
        }

        // 2. Full relative form
        if self.entries.contains(rel_path) {
            return true;
        }

        // 3. Final segment
        let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
        self.entries.contains(name)
    }

    /// Check the path and every ancestor directory
    ///
    /// A directory walk prunes ignored directories; this gives the same answer
    /// for a path handed in directly.
    pub fn should_ignore_nested(&self, rel_path: &str) -> bool {
        let ancestor_ignored = rel_path
            .match_indices('/')
            .any(|(idx, _)| self.should_ignore(&rel_path[..idx]));
        ancestor_ignored || self.should_ignore(rel_path)
    }

    /// The control directory is ignored at any depth, matching the walk
    fn is_builtin_ignored(rel_path: &str) -> bool {
        rel_path.split('/').any(|part| part == CONTROL_DIR)
    }

    /// Get number of active ignore sources (built-in counts as one)
    pub fn active_sources(&self) -> usize {
        1 + self.sources.len()
    }

    /// Literal entries in effect
    pub fn entries(&self) -> &BTreeSet<String> {
        &self.entries
    }

    /// Get project root
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Check a single path against the ignore files under `root`
pub fn is_ignored(root: &Path, rel_path: &str) -> io::Result<bool> {
    Ok(IgnoreRules::load(root)?.should_ignore(rel_path))
}
