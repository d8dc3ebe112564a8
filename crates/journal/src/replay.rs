//! History replay
//!
//! Rebuilds the full file state at any throw by replaying the chain from the
//! root throw. Throws are indexed by ID once per load; the chain to a target
//! is recovered by following parent links back to the root.
//!
//! A step-back reset never deletes throws, so after a reset and a new throw
//! a parent can have several children. Walking parent links from the target
//! stays unambiguous in that case.

use crate::throw::{Throw, ThrowId};
use pebble_core::{Blob, PebbleError, PebbleResult};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Full working-tree content: relative path -> content
pub type FileState = BTreeMap<String, Blob>;

/// Index over a set of throws
#[derive(Debug)]
pub struct ChainIndex<'a> {
    by_id: HashMap<&'a str, &'a Throw>,
    root: Option<&'a Throw>,
}

impl<'a> ChainIndex<'a> {
    /// Index the throws and locate the unique root
    ///
    /// The root is the throw whose parent is absent or unknown. An empty
    /// history has no root; any non-empty history must have exactly one.
    pub fn build(throws: &'a [Throw]) -> PebbleResult<Self> {
        let mut by_id = HashMap::with_capacity(throws.len());
        for throw in throws {
            if by_id.insert(throw.id.as_str(), throw).is_some() {
                return Err(PebbleError::MalformedHistory(format!(
                    "duplicate throw id {}",
                    throw.id
                )));
            }
        }

        let roots: Vec<&Throw> = throws
            .iter()
            .filter(|t| match &t.parent {
                None => true,
                Some(parent) => !by_id.contains_key(parent.as_str()),
            })
            .collect();

        let root = match (throws.is_empty(), roots.as_slice()) {
            (true, _) => None,
            (false, [root]) => Some(*root),
            (false, found) => {
                return Err(PebbleError::MalformedHistory(format!(
                    "expected exactly one root throw, found {}",
                    found.len()
                )));
            }
        };

        Ok(Self { by_id, root })
    }

    /// The root throw, if the history is not empty
    pub fn root(&self) -> Option<&'a Throw> {
        self.root
    }

    /// Get a throw by ID
    pub fn get(&self, id: &ThrowId) -> Option<&'a Throw> {
        self.by_id.get(id.as_str()).copied()
    }

    /// Number of indexed throws
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Parent of a throw, if it resolves
    pub fn parent_of(&self, throw: &Throw) -> Option<&'a Throw> {
        throw
            .parent
            .as_ref()
            .and_then(|p| self.by_id.get(p.as_str()).copied())
    }

    /// Throws from the root to `target`, inclusive, in replay order
    pub fn chain_to(&self, target: &ThrowId) -> PebbleResult<Vec<&'a Throw>> {
        let (root, mut node) = match (self.root, self.get(target)) {
            (Some(root), Some(node)) => (root, node),
            _ => return Err(PebbleError::BrokenChain(target.to_string())),
        };

        let mut seen = HashSet::new();
        let mut chain = vec![node];
        seen.insert(node.id.as_str());

        while let Some(parent) = self.parent_of(node) {
            if !seen.insert(parent.id.as_str()) {
                return Err(PebbleError::MalformedHistory(format!(
                    "parent cycle through throw {}",
                    parent.id
                )));
            }
            chain.push(parent);
            node = parent;
        }

        if node.id != root.id {
            return Err(PebbleError::BrokenChain(target.to_string()));
        }

        chain.reverse();
        Ok(chain)
    }

    /// Rebuild the full file state at `target`
    pub fn reconstruct(&self, target: &ThrowId) -> PebbleResult<FileState> {
        let chain = self.chain_to(target)?;
        debug!("Replaying {} throws up to {}", chain.len(), target);
        Ok(replay(&chain))
    }

    /// Throws from `head` back to the root (newest first)
    pub fn ancestry(&self, head: &ThrowId) -> PebbleResult<Vec<&'a Throw>> {
        let mut chain = self.chain_to(head)?;
        chain.reverse();
        Ok(chain)
    }
}

/// Apply throws in order: deletions first, then content of each throw
pub fn replay(chain: &[&Throw]) -> FileState {
    let mut state = FileState::new();
    for throw in chain {
        for path in &throw.changes.deleted {
            state.remove(path);
        }
        for (path, blob) in &throw.contents {
            state.insert(path.clone(), blob.clone());
        }
    }
    state
}

/// Rebuild the full file state at `target` from an unindexed set of throws
pub fn reconstruct(throws: &[Throw], target: &ThrowId) -> PebbleResult<FileState> {
    ChainIndex::build(throws)?.reconstruct(target)
}
