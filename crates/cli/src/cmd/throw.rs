//! Commit the staged changes

use crate::util;
use anyhow::{Context, Result};
use engine::{throw, FileRegistry, Project};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(project: Option<&Path>, message: &str, registry: &FileRegistry) -> Result<()> {
    let root = util::project_root(project)?;
    let project = Project::open(&root).context("Unable to open project")?;

    let outcome = throw(&project, message, registry).context("Unable to create throw")?;

    println!("Throw created successfully with ID: {}", outcome.id);
    println!(
        "  {} added, {} modified, {} deleted",
        outcome.changes.added.len(),
        outcome.changes.modified.len(),
        outcome.changes.deleted.len()
    );
    if !outcome.registry_synced {
        println!(
            "{}",
            format!(
                "Warning: registry entry for '{}' was not updated",
                outcome.project_name
            )
            .yellow()
        );
    }
    Ok(())
}
