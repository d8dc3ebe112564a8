//! Show throws from head back to the first one

use crate::util;
use anyhow::{Context, Result};
use engine::{log, Project};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(project: Option<&Path>, limit: Option<usize>) -> Result<()> {
    let root = util::project_root(project)?;
    let project = Project::open(&root).context("Unable to open project")?;

    let entries = log(&project, Some(limit.unwrap_or(20))).context("Unable to read history")?;
    if entries.is_empty() {
        println!("No throws yet");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {} {}",
            entry.id.to_string().yellow(),
            util::format_relative_time(entry.ts_unix_ms).dimmed(),
            entry.message
        );
        println!(
            "    {} (+{} ~{} -{})",
            util::format_absolute_time(entry.ts_unix_ms).dimmed(),
            entry.added,
            entry.modified,
            entry.deleted
        );
    }
    Ok(())
}
