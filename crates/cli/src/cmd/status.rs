//! Show project, head and staged changes

use crate::util;
use anyhow::{Context, Result};
use engine::{status, Project};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(project: Option<&Path>) -> Result<()> {
    let root = util::project_root(project)?;
    let project = Project::open(&root).context("Unable to open project")?;
    let report = status(&project).context("Unable to read project status")?;

    println!("{}", "Project Status".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Project:       {}", report.project_name.cyan());
    if !report.description.is_empty() {
        println!("Description:   {}", report.description);
    }
    println!("Location:      {}", project.root().display());
    match &report.head {
        Some(head) => println!(
            "Head:          {} ({} of {} throws on chain)",
            head.to_string().yellow(),
            report.chain_len,
            report.total_throws
        ),
        None => println!("Head:          {}", "none (no throws yet)".dimmed()),
    }
    println!("Tracked files: {}", report.tracked_files);
    println!();

    let staged = &report.staged;
    if staged.is_empty() {
        println!("Nothing staged");
        return Ok(());
    }

    println!("Staged changes:");
    for path in staged.added.keys() {
        println!("  + {}", path.green());
    }
    for path in staged.modified.keys() {
        println!("  ~ {}", path.yellow());
    }
    for path in &staged.deleted {
        println!("  - {}", path.red());
    }
    Ok(())
}
