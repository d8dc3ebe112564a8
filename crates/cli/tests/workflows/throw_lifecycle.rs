//! Gather and throw from the command line

use crate::common::TestProject;
use anyhow::Result;

#[test]
fn test_gather_then_throw() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("a.txt", "hello")?;

    let gather = project.pebble(&["gather"]).assert_success()?;
    assert!(gather.contains_stdout("Added:"));
    assert!(gather.contains_stdout("a.txt"));

    let status = project.pebble(&["status"]).assert_success()?;
    assert!(status.contains_stdout("a.txt"));

    let throw = project.pebble(&["throw", "-m", "first"]).assert_success()?;
    assert!(throw.contains_stdout("Throw created successfully with ID: "));
    let id = throw.parse_throw_id().expect("throw id");

    let log = project.pebble(&["log"]).assert_success()?;
    assert!(log.contains_stdout(&id));
    assert!(log.contains_stdout("first"));

    // Second gather without edits finds nothing
    let again = project.pebble(&["gather"]).assert_success()?;
    assert!(again.contains_stdout("No changes detected"));
    Ok(())
}

#[test]
fn test_throw_without_staged_changes_fails() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("a.txt", "hello")?;
    let first = project.commit("first")?;

    let result = project.pebble(&["throw", "-m", "empty"]).assert_failure()?;
    assert!(result.contains_stderr("Unable to create throw"));

    let log = project.pebble(&["log"]).assert_success()?;
    assert_eq!(log.stdout.matches(&first).count(), 1);
    assert_eq!(log.stdout.lines().filter(|l| l.contains("ago")).count(), 1);
    Ok(())
}

#[test]
fn test_modify_and_add_second_throw() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("a.txt", "hello")?;
    let s1 = project.commit("first")?;

    project.write("a.txt", "hello world")?;
    project.write("b.txt", "world")?;
    let gather = project.pebble(&["gather"]).assert_success()?;
    assert!(gather.contains_stdout("Modified:"));
    assert!(gather.contains_stdout("Added:"));

    let s2 = project
        .pebble(&["throw", "-m", "second"])
        .assert_success()?
        .parse_throw_id()
        .expect("throw id");
    assert_ne!(s1, s2);

    let log = project.pebble(&["log"]).assert_success()?;
    let first_pos = log.stdout.find(&s1).expect("s1 in log");
    let second_pos = log.stdout.find(&s2).expect("s2 in log");
    assert!(second_pos < first_pos, "log lists newest first");
    Ok(())
}

#[test]
fn test_partial_gather_never_reports_deletions() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("src/main.rs", "fn main() {}")?;
    project.write("docs/old.md", "old")?;
    project.commit("base")?;

    project.remove("docs/old.md")?;
    project.write("src/lib.rs", "pub fn f() {}")?;

    let partial = project.pebble(&["gather", "src"]).assert_success()?;
    assert!(partial.contains_stdout("src/lib.rs"));
    assert!(!partial.contains_stdout("Deleted:"));

    let full = project.pebble(&["gather"]).assert_success()?;
    assert!(full.contains_stdout("Deleted:"));
    assert!(full.contains_stdout("docs/old.md"));
    Ok(())
}

#[test]
fn test_gather_from_subdirectory() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("src/main.rs", "fn main() {}")?;
    project.write("top.txt", "top")?;

    // The project root is found by walking up; scope is relative to cwd
    let result = project
        .pebble_in(&project.root().join("src"), &["gather", "."])
        .assert_success()?;
    assert!(result.contains_stdout("src/main.rs"));
    assert!(!result.contains_stdout("top.txt"));
    Ok(())
}

#[test]
fn test_ignored_files_are_not_staged() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write(".pebbleignore", "target\nsecret.env\n")?;
    project.write("target/debug/app", "binary")?;
    project.write("config/secret.env", "KEY=1")?;
    project.write("main.rs", "fn main() {}")?;

    let result = project.pebble(&["gather"]).assert_success()?;
    assert!(result.contains_stdout("main.rs"));
    assert!(result.contains_stdout(".pebbleignore"));
    assert!(!result.contains_stdout("target"));
    assert!(!result.contains_stdout("secret.env"));
    Ok(())
}
