//! Project baseline: last committed digests and the head pointer

use crate::replay::FileState;
use crate::throw::{now_unix_ms, ChangeSet, ThrowId};
use pebble_core::store::{is_control_path, BASELINE_FILE};
use pebble_core::{Blake3Hash, ControlDir, PebbleError, PebbleResult, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted as `project_info.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Baseline {
    /// Registered project name
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    /// Creation time (Unix milliseconds)
    pub created_at_ms: u64,
    /// Most recent throw; `None` until the first throw
    pub head: Option<ThrowId>,
    /// Relative path -> digest, as of `head`
    #[serde(default)]
    pub file_digests: BTreeMap<String, Blake3Hash>,
}

impl Baseline {
    /// Fresh baseline for a never-committed project
    pub fn new(project_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            description: description.into(),
            created_at_ms: now_unix_ms(),
            head: None,
            file_digests: BTreeMap::new(),
        }
    }

    /// Load and validate the baseline of a project
    pub fn load(control: &ControlDir) -> PebbleResult<Self> {
        let baseline: Self = control.read_json(BASELINE_FILE)?;
        if baseline.project_name.is_empty() {
            return Err(PebbleError::malformed(BASELINE_FILE, "empty project name"));
        }
        if let Some(path) = baseline.file_digests.keys().find(|p| is_control_path(p)) {
            return Err(PebbleError::malformed(
                BASELINE_FILE,
                format!("control path '{}' in digests", path),
            ));
        }
        Ok(baseline)
    }

    /// Queue the baseline for writing in a transaction
    pub fn stage(&self, tx: &mut Transaction<'_>) -> PebbleResult<()> {
        tx.stage(BASELINE_FILE, self)
    }

    /// Recorded digest of a path
    pub fn digest(&self, path: &str) -> Option<&Blake3Hash> {
        self.file_digests.get(path)
    }

    /// Fold a committed change set in and advance the head
    pub fn apply(&mut self, id: &ThrowId, changes: &ChangeSet) {
        for path in &changes.deleted {
            self.file_digests.remove(path);
        }
        for (path, digest) in changes.added.iter().chain(&changes.modified) {
            self.file_digests.insert(path.clone(), *digest);
        }
        self.head = Some(id.clone());
    }

    /// Point the head at `head` and recompute every digest from `state`
    pub fn reset_to(&mut self, head: &ThrowId, state: &FileState) {
        self.file_digests = state
            .iter()
            .map(|(path, blob)| (path.clone(), blob.digest()))
            .collect();
        self.head = Some(head.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pebble_core::hash::hash_bytes;
    use pebble_core::Blob;
    use std::fs;
    use tempfile::TempDir;

    fn id(s: &str) -> ThrowId {
        ThrowId::parse(s).unwrap()
    }

    #[test]
    fn test_apply_change_set() {
        let mut baseline = Baseline::new("demo", "");
        assert!(baseline.head.is_none());

        let mut first = ChangeSet::default();
        first.added.insert("a.txt".into(), hash_bytes(b"hello"));
        first.added.insert("b.txt".into(), hash_bytes(b"b"));
        baseline.apply(&id("aaaaaaaaaa"), &first);

        let mut second = ChangeSet::default();
        second.modified.insert("a.txt".into(), hash_bytes(b"hello world"));
        second.deleted.insert("b.txt".into());
        baseline.apply(&id("bbbbbbbbbb"), &second);

        assert_eq!(baseline.head, Some(id("bbbbbbbbbb")));
        assert_eq!(baseline.file_digests.len(), 1);
        assert_eq!(baseline.digest("a.txt"), Some(&hash_bytes(b"hello world")));
        assert!(baseline.digest("b.txt").is_none());
    }

    #[test]
    fn test_reset_to_recomputes_digests() {
        let mut baseline = Baseline::new("demo", "");
        baseline.file_digests.insert("stale".into(), hash_bytes(b"old"));

        let mut state = FileState::new();
        state.insert("a.txt".into(), Blob::from("hello"));
        baseline.reset_to(&id("aaaaaaaaaa"), &state);

        assert_eq!(baseline.head, Some(id("aaaaaaaaaa")));
        assert_eq!(baseline.file_digests.len(), 1);
        assert_eq!(baseline.digest("a.txt"), Some(&hash_bytes(b"hello")));
    }

    #[test]
    fn test_load_and_reject() {
        let temp = TempDir::new().unwrap();
        let control = ControlDir::create(temp.path()).unwrap();

        let baseline = Baseline::new("demo", "a project");
        control.write_json(BASELINE_FILE, &baseline).unwrap();
        assert_eq!(Baseline::load(&control).unwrap(), baseline);

        fs::write(
            control.file_path(BASELINE_FILE),
            r#"{"project_name":"demo","created_at_ms":1,"head":null,"bogus":1}"#,
        )
        .unwrap();
        assert!(matches!(
            Baseline::load(&control),
            Err(PebbleError::MalformedDocument { .. })
        ));

        fs::write(
            control.file_path(BASELINE_FILE),
            r#"{"project_name":"","created_at_ms":1,"head":null}"#,
        )
        .unwrap();
        assert!(Baseline::load(&control).is_err());
    }
}
