//! Stage changes against the last throw

use crate::util;
use anyhow::{Context, Result};
use engine::{gather, Project};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

pub fn run(project: Option<&Path>, folders: &[PathBuf]) -> Result<()> {
    let root = util::project_root(project)?;
    let project = Project::open(&root).context("Unable to open project")?;
    let folders = util::absolutize(folders)?;

    let report = gather(&project, &folders).context("Unable to gather changes")?;

    if !report.added.is_empty() {
        println!("{}", "Added:".green().bold());
        for path in report.added.keys() {
            println!("  + {}", path.green());
        }
    }
    if !report.modified.is_empty() {
        println!("{}", "Modified:".yellow().bold());
        for path in report.modified.keys() {
            println!("  ~ {}", path.yellow());
        }
    }
    if !report.deleted.is_empty() {
        println!("{}", "Deleted:".red().bold());
        for path in &report.deleted {
            println!("  - {}", path.red());
        }
    }
    if !report.unreadable.is_empty() {
        println!("{}", "Unreadable (not staged):".dimmed());
        for (path, reason) in &report.unreadable {
            println!("  ! {} ({})", path, reason.dimmed());
        }
    }

    if report.is_empty() {
        println!("No changes detected");
    } else {
        let total = report.added.len() + report.modified.len() + report.deleted.len();
        println!();
        println!("Staged {} change(s). Run 'pebble throw -m <message>' to commit.", total);
    }
    if !report.full_scan {
        println!("{}", "Partial gather: deletions are only detected by a full gather".dimmed());
    }
    Ok(())
}
