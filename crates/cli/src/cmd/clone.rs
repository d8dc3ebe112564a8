//! Copy a registered project's head into a new directory

use crate::util;
use anyhow::{Context, Result};
use engine::{clone_project, FileRegistry};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(name: &str, dest: &Path, registry: &FileRegistry) -> Result<()> {
    let dest = util::absolutize(&[dest.to_path_buf()])?.remove(0);

    let outcome = clone_project(name, &dest, registry)
        .with_context(|| format!("Unable to clone project '{}'", name))?;

    println!(
        "Cloned {} at throw {} into {}",
        outcome.project_name.cyan(),
        outcome.head.to_string().yellow(),
        outcome.destination.display()
    );
    println!("  {} file(s) written", outcome.files);
    Ok(())
}
