//! Reversion: move the head back one throw, or rebuild the tree at head
//!
//! Both modes reconstruct the target state in full before the working tree
//! is touched. Throws are never removed from the history.

use crate::materialize::{materialize, MaterializeReport};
use crate::project::Project;
use crate::registry::Registry;
use journal::{ChainIndex, StagingState, ThrowId};
use pebble_core::{PebbleError, PebbleResult};
use tracing::{info, warn};

/// Result of a reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    /// Head after the reset
    pub head: ThrowId,
    /// Head before the reset
    pub previous: ThrowId,
    pub materialized: MaterializeReport,
    pub registry_synced: bool,
}

/// Move the head to its parent and make the working tree match it
pub fn step_back(project: &Project, registry: &dyn Registry) -> PebbleResult<ResetOutcome> {
    let baseline = project.baseline()?;
    let head = baseline.head.clone().ok_or(PebbleError::NoPreviousThrow)?;

    let journal = project.journal()?;
    let index = ChainIndex::build(journal.throws())?;
    let current = index
        .get(&head)
        .ok_or_else(|| PebbleError::BrokenChain(head.to_string()))?;
    let parent = index
        .parent_of(current)
        .ok_or(PebbleError::NoPreviousThrow)?;

    let outcome = move_to(project, &index, &parent.id, head)?;
    info!("Stepped back from {} to {}", outcome.previous, outcome.head);

    let registry_synced = match registry.update_head(&baseline.project_name, Some(&outcome.head)) {
        Ok(()) => true,
        Err(e) => {
            warn!("Reset to {} done but registry head not updated: {}", outcome.head, e);
            false
        }
    };
    Ok(ResetOutcome {
        registry_synced,
        ..outcome
    })
}

/// Make the working tree match the current head
pub fn rebuild_to_head(project: &Project) -> PebbleResult<ResetOutcome> {
    let baseline = project.baseline()?;
    let head = baseline.head.clone().ok_or(PebbleError::NoHistory)?;

    let journal = project.journal()?;
    let index = ChainIndex::build(journal.throws())?;
    let outcome = move_to(project, &index, &head, head.clone())?;
    info!("Rebuilt working tree at {}", head);
    Ok(outcome)
}

fn move_to(
    project: &Project,
    index: &ChainIndex<'_>,
    target: &ThrowId,
    previous: ThrowId,
) -> PebbleResult<ResetOutcome> {
    let state = index.reconstruct(target)?;
    let materialized = materialize(project.root(), &project.rules()?, &state)?;

    let mut baseline = project.baseline()?;
    baseline.reset_to(target, &state);

    let mut tx = project.control().transaction();
    baseline.stage(&mut tx)?;
    StagingState::default().stage(&mut tx)?;
    tx.commit()?;

    Ok(ResetOutcome {
        head: target.clone(),
        previous,
        materialized,
        registry_synced: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::throw;
    use crate::gather::gather;
    use crate::init::{init_project, InitOptions};
    use crate::registry::FileRegistry;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        project: Project,
        registry: FileRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path().join("proj");
            fs::create_dir(&root).unwrap();
            let registry = FileRegistry::new(temp.path().join("registry"));
            init_project(&root, &InitOptions::named("proj"), &registry).unwrap();
            let project = Project::open(&root).unwrap();
            Self {
                _temp: temp,
                project,
                registry,
            }
        }

        fn write(&self, path: &str, text: &str) {
            fs::write(self.project.root().join(path), text).unwrap();
        }

        fn read(&self, path: &str) -> Option<String> {
            fs::read_to_string(self.project.root().join(path)).ok()
        }

        fn commit(&self, message: &str) -> ThrowId {
            gather(&self.project, &[]).unwrap();
            throw(&self.project, message, &self.registry).unwrap().id
        }
    }

    #[test]
    fn test_step_back_restores_parent() {
        let f = Fixture::new();
        f.write("a.txt", "hello");
        let s1 = f.commit("first");
        f.write("a.txt", "hello world");
        f.write("b.txt", "world");
        let s2 = f.commit("second");

        let outcome = step_back(&f.project, &f.registry).unwrap();
        assert_eq!(outcome.head, s1);
        assert_eq!(outcome.previous, s2);
        assert!(outcome.registry_synced);
        assert_eq!(f.read("a.txt").as_deref(), Some("hello"));
        assert_eq!(f.read("b.txt"), None);

        assert_eq!(f.project.baseline().unwrap().head, Some(s1.clone()));
        assert_eq!(f.registry.lookup("proj").unwrap().head, Some(s1));
        // History is append-only
        assert_eq!(f.project.journal().unwrap().len(), 2);
        // Tree and baseline agree
        assert!(gather(&f.project, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_step_back_without_parent() {
        let f = Fixture::new();
        assert!(matches!(
            step_back(&f.project, &f.registry),
            Err(PebbleError::NoPreviousThrow)
        ));

        f.write("a.txt", "a");
        f.commit("only");
        assert!(matches!(
            step_back(&f.project, &f.registry),
            Err(PebbleError::NoPreviousThrow)
        ));
        assert_eq!(f.read("a.txt").as_deref(), Some("a"));
    }

    #[test]
    fn test_step_back_clears_staging() {
        let f = Fixture::new();
        f.write("a.txt", "1");
        f.commit("one");
        f.write("a.txt", "2");
        f.commit("two");

        f.write("c.txt", "pending");
        gather(&f.project, &[]).unwrap();
        assert!(!f.project.staging().unwrap().is_empty());

        step_back(&f.project, &f.registry).unwrap();
        assert!(f.project.staging().unwrap().is_empty());
        assert_eq!(f.read("c.txt"), None);
    }

    #[test]
    fn test_throw_after_step_back_forks_history() {
        let f = Fixture::new();
        f.write("a.txt", "hello");
        let s1 = f.commit("first");
        f.write("b.txt", "abandoned");
        f.commit("second");

        step_back(&f.project, &f.registry).unwrap();
        f.write("c.txt", "new line of work");
        let s3 = f.commit("third");

        let journal = f.project.journal().unwrap();
        assert_eq!(journal.get(&s3).unwrap().parent, Some(s1));

        // Rebuilding at the new head ignores the abandoned throw
        f.write("a.txt", "scribbled");
        rebuild_to_head(&f.project).unwrap();
        assert_eq!(f.read("a.txt").as_deref(), Some("hello"));
        assert_eq!(f.read("b.txt"), None);
        assert_eq!(f.read("c.txt").as_deref(), Some("new line of work"));
    }

    #[test]
    fn test_rebuild_to_head() {
        let f = Fixture::new();
        assert!(matches!(
            rebuild_to_head(&f.project),
            Err(PebbleError::NoHistory)
        ));

        f.write("a.txt", "committed");
        let head = f.commit("one");
        f.write("a.txt", "local edit");
        f.write("stray.txt", "stray");
        fs::create_dir(f.project.root().join("tmp")).unwrap();
        f.write("tmp/x", "x");

        let outcome = rebuild_to_head(&f.project).unwrap();
        assert_eq!(outcome.head, head);
        assert_eq!(outcome.previous, head);
        assert_eq!(f.read("a.txt").as_deref(), Some("committed"));
        assert_eq!(f.read("stray.txt"), None);
        assert!(!f.project.root().join("tmp").exists());
        assert!(f.project.root().join(".pebble").is_dir());
    }
}
