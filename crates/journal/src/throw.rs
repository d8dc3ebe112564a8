//! Throw data structures

use chrono::Utc;
use pebble_core::{Blake3Hash, Blob};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Length of a throw ID
pub const THROW_ID_LEN: usize = 10;

/// Throw identifier: 10 characters of `[A-Za-z0-9]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThrowId(String);

impl ThrowId {
    /// Generate a random ID
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let id = (0..THROW_ID_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        Self(id)
    }

    /// Parse an ID, checking length and alphabet
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.len() != THROW_ID_LEN || !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(format!(
                "invalid throw id '{}': expected {} alphanumeric characters",
                s, THROW_ID_LEN
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ThrowId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ThrowId> for String {
    fn from(id: ThrowId) -> Self {
        id.0
    }
}

impl fmt::Display for ThrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paths changed by a throw
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeSet {
    /// New paths with their digests
    #[serde(default)]
    pub added: BTreeMap<String, Blake3Hash>,
    /// Changed paths with their new digests
    #[serde(default)]
    pub modified: BTreeMap<String, Blake3Hash>,
    /// Removed paths
    #[serde(default)]
    pub deleted: BTreeSet<String>,
}

impl ChangeSet {
    /// Check if nothing changed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Number of touched paths
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// Paths whose content is carried by the throw
    pub fn content_paths(&self) -> impl Iterator<Item = &String> {
        self.added.keys().chain(self.modified.keys())
    }

    /// Check that the three sets are disjoint
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = self.added.keys().find(|p| self.modified.contains_key(*p)) {
            return Err(format!("'{}' is both added and modified", path));
        }
        if let Some(path) = self.content_paths().find(|p| self.deleted.contains(*p)) {
            return Err(format!("'{}' is both changed and deleted", path));
        }
        Ok(())
    }
}

/// A throw is one immutable, linked snapshot of a content change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Throw {
    /// Unique ID
    pub id: ThrowId,
    /// Head at creation time; `None` for the root throw
    pub parent: Option<ThrowId>,
    /// What changed relative to the parent
    pub changes: ChangeSet,
    /// Full content of every added or modified path
    pub contents: BTreeMap<String, Blob>,
    /// Timestamp (Unix milliseconds)
    pub ts_unix_ms: u64,
    /// Commit message
    #[serde(default)]
    pub message: String,
}

impl Throw {
    /// Create a new throw stamped with the current time
    pub fn new(
        id: ThrowId,
        parent: Option<ThrowId>,
        changes: ChangeSet,
        contents: BTreeMap<String, Blob>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            parent,
            changes,
            contents,
            ts_unix_ms: now_unix_ms(),
            message: message.into(),
        }
    }

    /// Check internal consistency
    ///
    /// Content must be present for exactly the added and modified paths.
    pub fn validate(&self) -> Result<(), String> {
        self.changes
            .validate()
            .map_err(|e| format!("throw {}: {}", self.id, e))?;

        if let Some(path) = self.changes.content_paths().find(|p| !self.contents.contains_key(*p)) {
            return Err(format!("throw {}: no content for '{}'", self.id, path));
        }
        if let Some(path) = self.contents.keys().find(|p| {
            !self.changes.added.contains_key(*p) && !self.changes.modified.contains_key(*p)
        }) {
            return Err(format!("throw {}: unexpected content for '{}'", self.id, path));
        }
        if self.parent.as_ref() == Some(&self.id) {
            return Err(format!("throw {} is its own parent", self.id));
        }
        Ok(())
    }
}

/// Current time in Unix milliseconds
pub fn now_unix_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}
