//! On-disk control directory management
//!
//! Every project keeps its state in a `.pebble/` directory at the root:
//! ```text
//! .pebble/
//!   project_info.json     baseline: digests + head
//!   track.json            staging state
//!   project_throws.json   throw history
//!   pending.json          write-ahead record (only while a transaction is applied)
//!   lock                  advisory writer lock
//! ```
//!
//! Documents are always replaced whole via [`atomic_write`]. Updates that span
//! several documents go through a [`Transaction`]: the new documents are first
//! written together into `pending.json`, then applied one by one. A record left
//! behind by a crash is replayed by [`ControlDir::open`] before anything reads
//! the project, so a multi-document update is never observed half-applied.

use crate::error::{PebbleError, PebbleResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Name of the control directory
pub const CONTROL_DIR: &str = ".pebble";
/// Baseline document
pub const BASELINE_FILE: &str = "project_info.json";
/// Staging document
pub const STAGING_FILE: &str = "track.json";
/// Throw history document
pub const HISTORY_FILE: &str = "project_throws.json";
/// Write-ahead record
pub const PENDING_FILE: &str = "pending.json";
/// Advisory lock file
pub const LOCK_FILE: &str = "lock";

/// Handle on a project's `.pebble/` directory
#[derive(Debug, Clone)]
pub struct ControlDir {
    /// Project root
    root: PathBuf,
    /// Path to .pebble directory
    dir: PathBuf,
}

impl ControlDir {
    /// Create the control directory for a fresh project
    pub fn create(root: &Path) -> PebbleResult<Self> {
        let dir = root.join(CONTROL_DIR);
        if dir.exists() {
            return Err(PebbleError::AlreadyInitialized(root.to_path_buf()));
        }
        fs::create_dir_all(&dir).map_err(|e| PebbleError::at(&dir, e))?;

        Ok(Self {
            root: root.to_path_buf(),
            dir,
        })
    }

    /// Open an existing control directory, replaying any interrupted transaction
    pub fn open(root: &Path) -> PebbleResult<Self> {
        let dir = root.join(CONTROL_DIR);
        if !dir.is_dir() {
            return Err(PebbleError::NotInitialized(root.to_path_buf()));
        }

        let control = Self {
            root: root.to_path_buf(),
            dir,
        };
        control.recover()?;
        Ok(control)
    }

    /// Get the project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .pebble directory path
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Path of a document inside the control directory
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read and parse a JSON document
    ///
    /// A missing document is a precondition failure: the bootstrap step
    /// creates every document and the engine never repairs them.
    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> PebbleResult<T> {
        let path = self.file_path(name);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PebbleError::MissingControlFile(path));
            }
            Err(e) => return Err(PebbleError::at(path, e)),
        };

        serde_json::from_str(&data).map_err(|e| PebbleError::malformed(name, e))
    }

    /// Atomically replace a single document
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> PebbleResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| PebbleError::malformed(name, e))?;
        let target = self.file_path(name);
        atomic_write(&self.dir, &target, &bytes).map_err(|e| PebbleError::at(&target, e))
    }

    /// Start a multi-document transaction
    pub fn transaction(&self) -> Transaction<'_> {
        Transaction {
            control: self,
            writes: Vec::new(),
        }
    }

    /// Replay a write-ahead record left behind by an interrupted transaction
    ///
    /// Returns true if a record was found and applied.
    pub fn recover(&self) -> PebbleResult<bool> {
        let pending_path = self.file_path(PENDING_FILE);
        if !pending_path.exists() {
            return Ok(false);
        }

        warn!(
            "Replaying interrupted update from {}",
            pending_path.display()
        );
        let record: PendingRecord = self.read_json(PENDING_FILE)?;
        self.apply(&record)?;
        fs::remove_file(&pending_path).map_err(|e| PebbleError::at(&pending_path, e))?;
        Ok(true)
    }

    fn apply(&self, record: &PendingRecord) -> PebbleResult<()> {
        for write in &record.writes {
            if Path::new(&write.file).components().count() != 1 || write.file == PENDING_FILE {
                return Err(PebbleError::malformed(
                    PENDING_FILE,
                    format!("refusing to write '{}'", write.file),
                ));
            }
            self.write_json(&write.file, &write.contents)?;
        }
        Ok(())
    }
}

/// One document replacement inside a write-ahead record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PendingWrite {
    file: String,
    contents: serde_json::Value,
}

/// Write-ahead record persisted as `pending.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PendingRecord {
    writes: Vec<PendingWrite>,
}

/// All-or-nothing replacement of several control documents
pub struct Transaction<'a> {
    control: &'a ControlDir,
    writes: Vec<PendingWrite>,
}

impl Transaction<'_> {
    /// Queue a document for replacement
    pub fn stage<T: Serialize>(&mut self, name: &str, value: &T) -> PebbleResult<()> {
        let contents = serde_json::to_value(value).map_err(|e| PebbleError::malformed(name, e))?;
        self.writes.retain(|w| w.file != name);
        self.writes.push(PendingWrite {
            file: name.to_string(),
            contents,
        });
        Ok(())
    }

    /// Number of queued documents
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Persist the write-ahead record, apply it, then discard it
    pub fn commit(self) -> PebbleResult<()> {
        if self.writes.is_empty() {
            return Ok(());
        }

        let record = PendingRecord {
            writes: self.writes,
        };
        // Once pending.json is durable the update is decided; everything
        // after this point is replayable by `recover`.
        self.control.write_json(PENDING_FILE, &record)?;
        self.control.apply(&record)?;

        let pending_path = self.control.file_path(PENDING_FILE);
        fs::remove_file(&pending_path).map_err(|e| PebbleError::at(&pending_path, e))?;
        debug!("Committed {} control documents", record.writes.len());
        Ok(())
    }
}

/// Atomic write helper
///
/// Writes data to a temporary file, fsyncs it, then renames it to the target path.
pub fn atomic_write(tmp_dir: &Path, target: &Path, data: &[u8]) -> io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(tmp_dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;

    #[cfg(unix)]
    if let Some(parent) = target.parent() {
        File::open(parent)?.sync_all()?;
    }

    Ok(())
}

/// Normalize a relative path for storage
///
/// - Produces a `/`-separated relative path
/// - Rejects `..`, absolute and empty paths
/// - Removes `./` components
pub fn normalize_path(path: &Path) -> PebbleResult<String> {
    let display = path.to_string_lossy().to_string();
    let mut parts: Vec<&str> = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err(PebbleError::invalid_path(display, "not valid UTF-8")),
            },
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(PebbleError::invalid_path(display, "'..' is not allowed"));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PebbleError::invalid_path(display, "expected a relative path"));
            }
        }
    }

    if parts.is_empty() {
        return Err(PebbleError::invalid_path(display, "empty path"));
    }
    Ok(parts.join("/"))
}

/// Express a user-supplied path relative to the project root
///
/// Absolute paths must lie under `root`; relative paths are taken as relative
/// to `root`. Returns `None` for the root itself.
pub fn relative_to_root(root: &Path, path: &Path) -> PebbleResult<Option<String>> {
    let relative = if path.is_absolute() {
        match path.strip_prefix(root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => {
                // Unresolvable paths count as outside
                let outside = || {
                    PebbleError::invalid_path(
                        path.to_string_lossy(),
                        format!("outside of project root {}", root.display()),
                    )
                };
                let canonical = path.canonicalize().map_err(|_| outside())?;
                canonical
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .map_err(|_| outside())?
            }
        }
    } else {
        path.to_path_buf()
    };

    if relative.components().all(|c| matches!(c, Component::CurDir)) {
        return Ok(None);
    }
    normalize_path(&relative).map(Some)
}

/// Check if a normalized relative path lies inside the control directory
pub fn is_control_path(rel: &str) -> bool {
    rel.split('/').next() == Some(CONTROL_DIR)
}
