//! Project bootstrap and deletion

use crate::project::Project;
use crate::registry::{validate_project_name, Registry};
use journal::{Baseline, Journal, StagingState};
use pebble_core::{ControlDir, PebbleError, PebbleResult};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Options for creating a project
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Project name; defaults to the root directory's name
    pub name: Option<String>,
    pub description: String,
}

impl InitOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: String::new(),
        }
    }
}

/// Create `.pebble/` with an empty baseline, staging state and history, then
/// register the project
pub fn init_project(root: &Path, options: &InitOptions, registry: &dyn Registry) -> PebbleResult<Baseline> {
    fs::create_dir_all(root).map_err(|e| PebbleError::at(root, e))?;
    let root = root.canonicalize().map_err(|e| PebbleError::at(root, e))?;

    let name = match &options.name {
        Some(name) => name.clone(),
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| PebbleError::InvalidProjectName(root.display().to_string()))?,
    };
    validate_project_name(&name)?;
    if registry.project_exists(&name)? {
        return Err(PebbleError::ProjectExists(name));
    }

    let control = ControlDir::create(&root)?;
    let baseline = Baseline::new(&name, &options.description);

    let mut tx = control.transaction();
    baseline.stage(&mut tx)?;
    StagingState::default().stage(&mut tx)?;
    Journal::new().stage(&mut tx)?;
    let created = tx
        .commit()
        .and_then(|()| registry.register(&name, &root, &options.description));

    if let Err(e) = created {
        // Leave no half-initialized project behind
        if let Err(cleanup) = fs::remove_dir_all(control.path()) {
            warn!("Could not remove {}: {}", control.path().display(), cleanup);
        }
        return Err(e);
    }

    info!("Initialized project {} at {}", name, root.display());
    Ok(baseline)
}

/// Unregister the project at `root` and remove its control directory
///
/// The working tree is left as it is. Returns the project name.
pub fn delete_project(root: &Path, registry: &dyn Registry) -> PebbleResult<String> {
    let project = Project::open(root)?;
    let name = project.baseline()?.project_name;

    match registry.remove(&name) {
        Ok(()) => {}
        Err(PebbleError::UnknownProject(_)) => warn!("Project {} was not registered", name),
        Err(e) => return Err(e),
    }

    let dir = project.control().path().to_path_buf();
    fs::remove_dir_all(&dir).map_err(|e| PebbleError::at(&dir, e))?;
    info!("Deleted project {}", name);
    Ok(name)
}
