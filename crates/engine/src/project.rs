//! An opened, locked project

use crate::lock::ProjectLock;
use journal::{Baseline, Journal, StagingState};
use pebble_core::store::CONTROL_DIR;
use pebble_core::{ControlDir, PebbleError, PebbleResult};
use scanner::IgnoreRules;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A project root with its control directory and writer lock
///
/// The lock is taken before any interrupted update is replayed and is held
/// until the project is dropped. Documents and ignore rules are read from
/// disk on every access.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    control: ControlDir,
    _lock: ProjectLock,
}

impl Project {
    /// Open and lock the project at `root`
    pub fn open(root: &Path) -> PebbleResult<Self> {
        let root = root.canonicalize().map_err(|e| PebbleError::at(root, e))?;
        let dir = root.join(CONTROL_DIR);
        if !dir.is_dir() {
            return Err(PebbleError::NotInitialized(root));
        }

        let lock = ProjectLock::acquire(&dir)?;
        let control = ControlDir::open(&root)?;
        debug!("Opened project at {}", root.display());

        Ok(Self {
            root,
            control,
            _lock: lock,
        })
    }

    /// Canonical project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn control(&self) -> &ControlDir {
        &self.control
    }

    /// Ignore rules as currently on disk
    pub fn rules(&self) -> PebbleResult<IgnoreRules> {
        IgnoreRules::load(&self.root).map_err(|e| PebbleError::at(&self.root, e))
    }

    pub fn baseline(&self) -> PebbleResult<Baseline> {
        Baseline::load(&self.control)
    }

    pub fn staging(&self) -> PebbleResult<StagingState> {
        StagingState::load(&self.control)
    }

    pub fn journal(&self) -> PebbleResult<Journal> {
        Journal::load(&self.control)
    }
}
