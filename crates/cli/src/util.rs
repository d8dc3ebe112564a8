//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use pebble_core::store::CONTROL_DIR;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Install the stderr log subscriber
///
/// `-v` flags win over the configured level; the default is WARN.
pub fn init_tracing(verbose: u8, configured: Option<&str>) {
    let level = match verbose {
        0 => configured
            .and_then(|s| Level::from_str(s).ok())
            .unwrap_or(Level::WARN),
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// The project root: the explicit `-C` path, or the nearest directory
/// upward from cwd that has a `.pebble/`
pub fn project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            find_project_root(&cwd)
        }
    }
}

/// Find project root by walking up from `start` to find .pebble/
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONTROL_DIR).is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            anyhow::bail!("Not a pebble project (no {} directory found)", CONTROL_DIR);
        }
    }
}

/// Make user-supplied paths absolute against the current directory
pub fn absolutize(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(paths.iter().map(|p| cwd.join(p)).collect())
}

fn to_datetime(ts_ms: u64) -> Option<DateTime<Utc>> {
    i64::try_from(ts_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts_ms: u64) -> String {
    let Some(then) = to_datetime(ts_ms) else {
        return "at an unknown time".to_string();
    };

    let elapsed = Utc::now().signed_duration_since(then);
    if elapsed < Duration::zero() {
        "in the future".to_string()
    } else if elapsed < Duration::minutes(1) {
        format!("{} seconds ago", elapsed.num_seconds())
    } else if elapsed < Duration::hours(1) {
        format!("{} minutes ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{} hours ago", elapsed.num_hours())
    } else if elapsed < Duration::weeks(1) {
        format!("{} days ago", elapsed.num_days())
    } else {
        format!("{} weeks ago", elapsed.num_weeks())
    }
}

/// Format timestamp as absolute UTC time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts_ms: u64) -> String {
    match to_datetime(ts_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "unknown time".to_string(),
    }
}
