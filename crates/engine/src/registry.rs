//! Central project registry
//!
//! Every registered project has one JSON entry, `<registry_dir>/<name>.json`,
//! recording where the project lives and its current head. The registry
//! directory is always handed in explicitly.

use journal::ThrowId;
use pebble_core::store::atomic_write;
use pebble_core::{PebbleError, PebbleResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry operations the engine needs
pub trait Registry {
    /// Check if a project name is taken
    fn project_exists(&self, name: &str) -> PebbleResult<bool>;

    /// Record a new project
    fn register(&self, name: &str, folder: &Path, description: &str) -> PebbleResult<()>;

    /// Record a new head for a project
    fn update_head(&self, name: &str, head: Option<&ThrowId>) -> PebbleResult<()>;

    /// Fetch a project's entry
    fn lookup(&self, name: &str) -> PebbleResult<RegistryEntry>;

    /// Forget a project
    fn remove(&self, name: &str) -> PebbleResult<()>;
}

/// One registered project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntry {
    pub project_name: String,
    pub folder_location: PathBuf,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub head: Option<ThrowId>,
}

/// Project names must be usable as a file name
pub fn validate_project_name(name: &str) -> PebbleResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if bad {
        return Err(PebbleError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

/// Registry stored as a directory of JSON entries
#[derive(Debug, Clone)]
pub struct FileRegistry {
    dir: PathBuf,
}

impl FileRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Registry directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, name: &str) -> PebbleResult<PathBuf> {
        validate_project_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }

    fn write_entry(&self, entry: &RegistryEntry) -> PebbleResult<()> {
        let path = self.entry_path(&entry.project_name)?;
        fs::create_dir_all(&self.dir).map_err(|e| PebbleError::at(&self.dir, e))?;
        let bytes = serde_json::to_vec_pretty(entry)
            .map_err(|e| PebbleError::malformed(path.display().to_string(), e))?;
        atomic_write(&self.dir, &path, &bytes).map_err(|e| PebbleError::at(&path, e))
    }
}

impl Registry for FileRegistry {
    fn project_exists(&self, name: &str) -> PebbleResult<bool> {
        Ok(self.entry_path(name)?.is_file())
    }

    fn register(&self, name: &str, folder: &Path, description: &str) -> PebbleResult<()> {
        if self.project_exists(name)? {
            return Err(PebbleError::ProjectExists(name.to_string()));
        }
        self.write_entry(&RegistryEntry {
            project_name: name.to_string(),
            folder_location: folder.to_path_buf(),
            description: description.to_string(),
            head: None,
        })?;
        debug!("Registered project {} at {}", name, folder.display());
        Ok(())
    }

    fn update_head(&self, name: &str, head: Option<&ThrowId>) -> PebbleResult<()> {
        let mut entry = self.lookup(name)?;
        entry.head = head.cloned();
        self.write_entry(&entry)
    }

    fn lookup(&self, name: &str) -> PebbleResult<RegistryEntry> {
        let path = self.entry_path(name)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PebbleError::UnknownProject(name.to_string()));
            }
            Err(e) => return Err(PebbleError::at(path, e)),
        };
        serde_json::from_str(&data)
            .map_err(|e| PebbleError::malformed(path.display().to_string(), e))
    }

    fn remove(&self, name: &str) -> PebbleResult<()> {
        let path = self.entry_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(PebbleError::UnknownProject(name.to_string()))
            }
            Err(e) => Err(PebbleError::at(path, e)),
        }
    }
}
