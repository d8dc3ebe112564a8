//! Initialize a pebble project

use anyhow::{Context, Result};
use engine::{init_project, FileRegistry, InitOptions};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(project: Option<&Path>, name: Option<String>, description: String, registry: &FileRegistry) -> Result<()> {
    let root = match project {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let options = InitOptions { name, description };
    let baseline = init_project(&root, &options, registry).context("Unable to initialize project")?;

    println!(
        "Initialized pebble project {} at {}",
        baseline.project_name.cyan(),
        root.display()
    );
    println!();
    println!("Created .pebble/ with:");
    println!("  - project_info.json    (baseline and head)");
    println!("  - track.json           (staged changes)");
    println!("  - project_throws.json  (throw history)");
    println!();
    println!("Next steps:");
    println!("  - Run 'pebble gather' to stage your files");
    println!("  - Run 'pebble throw -m <message>' to commit them");
    Ok(())
}
