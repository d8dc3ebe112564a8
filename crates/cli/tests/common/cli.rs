//! CLI command execution helpers
//!
//! Wraps the `pebble` binary built for this test run. Every command gets an
//! isolated registry directory and a config path that does not exist, so the
//! user's own configuration never leaks into a test.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// CLI command builder
pub struct PebbleCommand {
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    stdin_data: Option<String>,
}

impl PebbleCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>, registry_dir: impl AsRef<Path>) -> Self {
        let registry_dir = registry_dir.as_ref();
        let mut env = HashMap::new();
        env.insert(
            "PEBBLE_REGISTRY_DIR".to_string(),
            registry_dir.display().to_string(),
        );
        env.insert(
            "PEBBLE_CONFIG".to_string(),
            registry_dir.join("no-config.toml").display().to_string(),
        );

        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
            env,
            stdin_data: None,
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Provide stdin data
    pub fn stdin(&mut self, data: &str) -> &mut Self {
        self.stdin_data = Some(data.to_string());
        self
    }

    /// Execute command and return result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let mut command = Command::new(env!("CARGO_BIN_EXE_pebble"));
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().context("Failed to spawn pebble")?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Some(data) = &self.stdin_data {
                stdin.write_all(data.as_bytes())?;
            }
        }
        let output = child
            .wait_with_output()
            .context("Failed to wait for pebble")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;
        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }
        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;
        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }
        Ok(result)
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Parse the throw ID from `pebble throw` output
    pub fn parse_throw_id(&self) -> Option<String> {
        self.stdout.lines().find_map(extract_throw_id)
    }
}

/// Extract the ID from a "Throw created successfully with ID: <id>" line
pub fn extract_throw_id(line: &str) -> Option<String> {
    let rest = line.split("with ID: ").nth(1)?;
    let id: String = rest.chars().take_while(char::is_ascii_alphanumeric).collect();
    (id.len() == 10).then_some(id)
}

#[test]
fn test_throw_id_extraction() {
    assert_eq!(
        extract_throw_id("Throw created successfully with ID: Ab3dE6gH9k"),
        Some("Ab3dE6gH9k".to_string())
    );
    assert_eq!(extract_throw_id("Throw created successfully with ID: short"), None);
    assert_eq!(extract_throw_id("unrelated"), None);
}
