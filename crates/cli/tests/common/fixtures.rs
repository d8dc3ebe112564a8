//! Test project fixtures

use super::cli::{CommandResult, PebbleCommand};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding one project and a private registry
pub struct TestProject {
    temp: TempDir,
    root: PathBuf,
    registry: PathBuf,
}

impl TestProject {
    /// Empty, uninitialized project directory named `proj`
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let root = temp.path().canonicalize()?.join("proj");
        let registry = temp.path().canonicalize()?.join("registry");
        fs::create_dir(&root)?;
        Ok(Self {
            temp,
            root,
            registry,
        })
    }

    /// Project initialized under the name `proj`
    pub fn initialized() -> Result<Self> {
        let project = Self::new()?;
        project.pebble(&["init", "--name", "proj"]).assert_success()?;
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scratch space next to the project
    pub fn scratch(&self) -> &Path {
        self.temp.path()
    }

    /// Command running inside the project root
    pub fn pebble(&self, args: &[&str]) -> PebbleCommand {
        self.pebble_in(&self.root, args)
    }

    /// Command running inside another directory, same registry
    pub fn pebble_in(&self, dir: &Path, args: &[&str]) -> PebbleCommand {
        let mut cmd = PebbleCommand::new(dir, &self.registry);
        cmd.args(args);
        cmd
    }

    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.root.join(rel)).ok()
    }

    pub fn remove(&self, rel: &str) -> Result<()> {
        fs::remove_file(self.root.join(rel))?;
        Ok(())
    }

    /// Full gather followed by a throw; returns the new throw ID
    pub fn commit(&self, message: &str) -> Result<String> {
        self.pebble(&["gather"]).assert_success()?;
        let result: CommandResult = self.pebble(&["throw", "-m", message]).assert_success()?;
        result
            .parse_throw_id()
            .ok_or_else(|| anyhow::anyhow!("no throw id in output: {}", result.stdout))
    }
}
