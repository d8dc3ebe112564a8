//! Read-only views of a project: status and log

use crate::project::Project;
use journal::{ChainIndex, StagingState, Throw, ThrowId};
use pebble_core::PebbleResult;

/// Project summary for `pebble status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub project_name: String,
    pub description: String,
    pub head: Option<ThrowId>,
    /// Throws on the chain ending at head
    pub chain_len: usize,
    /// Throws in the history, including abandoned ones
    pub total_throws: usize,
    pub tracked_files: usize,
    pub staged: StagingState,
}

/// One line of `pebble log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: ThrowId,
    pub parent: Option<ThrowId>,
    pub ts_unix_ms: u64,
    pub message: String,
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl From<&Throw> for LogEntry {
    fn from(throw: &Throw) -> Self {
        Self {
            id: throw.id.clone(),
            parent: throw.parent.clone(),
            ts_unix_ms: throw.ts_unix_ms,
            message: throw.message.clone(),
            added: throw.changes.added.len(),
            modified: throw.changes.modified.len(),
            deleted: throw.changes.deleted.len(),
        }
    }
}

pub fn status(project: &Project) -> PebbleResult<StatusReport> {
    let baseline = project.baseline()?;
    let staged = project.staging()?;
    let journal = project.journal()?;

    let chain_len = match &baseline.head {
        Some(head) => ChainIndex::build(journal.throws())?.chain_to(head)?.len(),
        None => 0,
    };

    Ok(StatusReport {
        project_name: baseline.project_name,
        description: baseline.description,
        head: baseline.head,
        chain_len,
        total_throws: journal.len(),
        tracked_files: baseline.file_digests.len(),
        staged,
    })
}

/// Throws from head back to the root, newest first, at most `limit`
pub fn log(project: &Project, limit: Option<usize>) -> PebbleResult<Vec<LogEntry>> {
    let head = match project.baseline()?.head {
        Some(head) => head,
        None => return Ok(Vec::new()),
    };

    let journal = project.journal()?;
    let index = ChainIndex::build(journal.throws())?;
    let entries = index
        .ancestry(&head)?
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(LogEntry::from)
        .collect();
    Ok(entries)
}
