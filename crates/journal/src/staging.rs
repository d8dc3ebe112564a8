//! Staging state written by gather and consumed by throw

use crate::throw::ThrowId;
use pebble_core::store::STAGING_FILE;
use pebble_core::{Blake3Hash, ControlDir, PebbleError, PebbleResult, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Persisted as `track.json`
///
/// Digests are the gather-time values and are for display only; throw
/// re-derives them from the files it actually reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StagingState {
    #[serde(default)]
    pub added: BTreeMap<String, Blake3Hash>,
    #[serde(default)]
    pub modified: BTreeMap<String, Blake3Hash>,
    #[serde(default)]
    pub deleted: BTreeSet<String>,
    /// Head observed when the changes were gathered
    #[serde(default)]
    pub last_commit: Option<ThrowId>,
}

impl StagingState {
    /// Check if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Number of staged paths
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// Load and validate the staging state of a project
    pub fn load(control: &ControlDir) -> PebbleResult<Self> {
        let staging: Self = control.read_json(STAGING_FILE)?;
        staging
            .validate()
            .map_err(|e| PebbleError::malformed(STAGING_FILE, e))?;
        Ok(staging)
    }

    /// Check that the three sets are disjoint
    pub fn validate(&self) -> Result<(), String> {
        let overlap = self
            .added
            .keys()
            .find(|p| self.modified.contains_key(*p) || self.deleted.contains(*p))
            .or_else(|| self.modified.keys().find(|p| self.deleted.contains(*p)));
        match overlap {
            Some(path) => Err(format!("'{}' is staged more than once", path)),
            None => Ok(()),
        }
    }

    /// Queue the staging state for writing in a transaction
    pub fn stage(&self, tx: &mut Transaction<'_>) -> PebbleResult<()> {
        tx.stage(STAGING_FILE, self)
    }

    /// Replace the staging state on disk
    pub fn save(&self, control: &ControlDir) -> PebbleResult<()> {
        control.write_json(STAGING_FILE, self)
    }

    /// Empty every set and forget the observed head
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Every staged path, in order
    pub fn candidates(&self) -> BTreeSet<&str> {
        self.added
            .keys()
            .chain(self.modified.keys())
            .chain(self.deleted.iter())
            .map(String::as_str)
            .collect()
    }
}
