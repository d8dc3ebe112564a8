//! Advisory writer lock on `.pebble/lock`

use journal::throw::now_unix_ms;
use pebble_core::store::LOCK_FILE;
use pebble_core::{PebbleError, PebbleResult};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Exclusive lock held for the duration of one operation
///
/// The kernel releases the lock when the file is closed, so a crashed
/// process never leaves a stale lock behind.
#[derive(Debug)]
pub struct ProjectLock {
    path: PathBuf,
    #[allow(dead_code)]
    file: File,
}

/// Lock file content
#[derive(Debug, Serialize, Deserialize)]
struct LockContent {
    pid: u32,
    acquired_at: u64,
}

impl ProjectLock {
    /// Acquire the lock of the control directory `control_dir`
    ///
    /// Fails fast with [`PebbleError::Locked`] if another writer holds it.
    pub fn acquire(control_dir: &Path) -> PebbleResult<Self> {
        let path = control_dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| PebbleError::at(&path, e))?;

        if !try_flock_exclusive(&file).map_err(|e| PebbleError::at(&path, e))? {
            match read_lock_content(&mut file) {
                Ok(holder) => warn!("Project lock held by pid {}", holder.pid),
                Err(_) => warn!("Project lock held by another process"),
            }
            return Err(PebbleError::Locked(path));
        }

        write_lock_content(&mut file).map_err(|e| PebbleError::at(&path, e))?;
        debug!("Acquired {}", path.display());
        Ok(Self { path, file })
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_lock_content(file: &mut File) -> io::Result<()> {
    let content = LockContent {
        pid: std::process::id(),
        acquired_at: now_unix_ms(),
    };
    let serialized = serde_json::to_string(&content)?;

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(serialized.as_bytes())?;
    file.sync_all()
}

fn read_lock_content(file: &mut File) -> io::Result<LockContent> {
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Try to acquire exclusive file lock (non-blocking)
#[cfg(unix)]
fn try_flock_exclusive(file: &File) -> io::Result<bool> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
        Ok(()) => Ok(true),
        Err(nix::errno::Errno::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(io::Error::from(e)),
    }
}

/// Without flock the lock is advisory only
#[cfg(not(unix))]
fn try_flock_exclusive(_file: &File) -> io::Result<bool> {
    Ok(true)
}
