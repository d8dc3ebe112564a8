//! Unregister a project and remove its .pebble directory

use crate::util;
use anyhow::{Context, Result};
use engine::{delete_project, FileRegistry, Project};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub fn run(project: Option<&Path>, yes: bool, registry: &FileRegistry) -> Result<()> {
    let root = util::project_root(project)?;

    if !yes {
        let name = {
            let project = Project::open(&root).context("Unable to open project")?;
            project.baseline()?.project_name
        };

        println!(
            "{}",
            format!("This removes the history of '{}' for good.", name).red()
        );
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        for prompt in ["Type YES to delete the project: ", "Type YES again to confirm: "] {
            print!("{}", prompt);
            io::stdout().flush()?;
            let answer = lines.next().transpose()?.unwrap_or_default();
            if answer.trim() != "YES" {
                println!("Aborted");
                return Ok(());
            }
        }
    }

    let name = delete_project(&root, registry).context("Unable to delete project")?;
    println!("Deleted project {} (working files kept)", name.cyan());
    Ok(())
}
