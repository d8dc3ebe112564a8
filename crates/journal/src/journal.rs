//! Append-only throw journal
//!
//! The whole history lives in one document (`project_throws.json`) that is
//! always replaced whole, so every load sees a fully written history.

use crate::throw::{Throw, ThrowId};
use pebble_core::store::HISTORY_FILE;
use pebble_core::{ControlDir, PebbleError, PebbleResult, Transaction};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Attempts at drawing an unused throw ID before giving up
pub const MAX_ID_ATTEMPTS: usize = 64;

/// Append-only journal of throws, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Journal {
    throws: Vec<Throw>,
}

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate the journal of a project
    pub fn load(control: &ControlDir) -> PebbleResult<Self> {
        let journal: Self = control.read_json(HISTORY_FILE)?;
        journal
            .validate()
            .map_err(|e| PebbleError::malformed(HISTORY_FILE, e))?;
        debug!("Loaded {} throws", journal.throws.len());
        Ok(journal)
    }

    /// Queue the journal for writing in a transaction
    pub fn stage(&self, tx: &mut Transaction<'_>) -> PebbleResult<()> {
        tx.stage(HISTORY_FILE, self)
    }

    /// Check every throw and ID uniqueness
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.throws.len());
        for throw in &self.throws {
            throw.validate()?;
            if !seen.insert(&throw.id) {
                return Err(format!("duplicate throw id {}", throw.id));
            }
        }
        Ok(())
    }

    /// All throws, in append order
    pub fn throws(&self) -> &[Throw] {
        &self.throws
    }

    /// Get the total number of throws
    pub fn len(&self) -> usize {
        self.throws.len()
    }

    /// Check if the journal is empty
    pub fn is_empty(&self) -> bool {
        self.throws.is_empty()
    }

    /// Check if an ID is already taken
    pub fn contains(&self, id: &ThrowId) -> bool {
        self.throws.iter().any(|t| &t.id == id)
    }

    /// Get a throw by ID
    pub fn get(&self, id: &ThrowId) -> Option<&Throw> {
        self.throws.iter().find(|t| &t.id == id)
    }

    /// Draw a random ID not used by any throw in the journal
    pub fn generate_id<R: Rng>(&self, rng: &mut R) -> PebbleResult<ThrowId> {
        let taken: HashSet<&ThrowId> = self.throws.iter().map(|t| &t.id).collect();

        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = ThrowId::generate(rng);
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
            debug!("Throw id {} already taken, drawing again", candidate);
        }
        Err(PebbleError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
    }

    /// Append a throw
    pub fn append(&mut self, throw: Throw) -> PebbleResult<()> {
        if self.contains(&throw.id) {
            return Err(PebbleError::MalformedHistory(format!(
                "throw id {} already exists",
                throw.id
            )));
        }
        throw
            .validate()
            .map_err(PebbleError::MalformedHistory)?;
        self.throws.push(throw);
        Ok(())
    }
}
