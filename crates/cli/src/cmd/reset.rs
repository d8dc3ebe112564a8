//! Step back one throw, or rebuild the working tree at head

use crate::util;
use anyhow::{Context, Result};
use engine::{rebuild_to_head, step_back, FileRegistry, Project};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(project: Option<&Path>, to_head: bool, registry: &FileRegistry) -> Result<()> {
    let root = util::project_root(project)?;
    let project = Project::open(&root).context("Unable to open project")?;

    let outcome = if to_head {
        let outcome = rebuild_to_head(&project).context("Unable to rebuild working tree")?;
        println!("Rebuilt working tree at throw {}", outcome.head.to_string().yellow());
        outcome
    } else {
        let outcome = step_back(&project, registry).context("Unable to reset")?;
        println!(
            "Reset from {} to {}",
            outcome.previous.to_string().dimmed(),
            outcome.head.to_string().yellow()
        );
        outcome
    };

    println!(
        "  {} file(s) written, {} removed",
        outcome.materialized.written,
        outcome.materialized.removed.len()
    );
    if !outcome.registry_synced {
        println!("{}", "Warning: registry head was not updated".yellow());
    }
    Ok(())
}
