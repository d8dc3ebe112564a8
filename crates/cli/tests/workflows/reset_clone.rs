//! Reset and clone from the command line

use crate::common::TestProject;
use anyhow::Result;
use std::fs;

#[test]
fn test_step_back_restores_previous_throw() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("a.txt", "hello")?;
    let s1 = project.commit("first")?;
    project.write("a.txt", "hello world")?;
    project.write("b.txt", "world")?;
    project.commit("second")?;

    let reset = project.pebble(&["reset"]).assert_success()?;
    assert!(reset.contains_stdout(&s1));

    assert_eq!(project.read("a.txt").as_deref(), Some("hello"));
    assert_eq!(project.read("b.txt"), None);

    let gather = project.pebble(&["gather"]).assert_success()?;
    assert!(gather.contains_stdout("No changes detected"));

    let status = project.pebble(&["status"]).assert_success()?;
    assert!(status.contains_stdout(&s1));
    Ok(())
}

#[test]
fn test_reset_at_first_throw_fails() -> Result<()> {
    let project = TestProject::initialized()?;
    project.pebble(&["reset"]).assert_failure()?;

    project.write("a.txt", "only")?;
    project.commit("only")?;
    let result = project.pebble(&["reset"]).assert_failure()?;
    assert!(result.contains_stderr("no previous throw"));
    assert_eq!(project.read("a.txt").as_deref(), Some("only"));
    Ok(())
}

#[test]
fn test_reset_to_head_discards_local_edits() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("a.txt", "committed")?;
    project.commit("base")?;

    project.write("a.txt", "scribbles")?;
    project.write("notes/draft.md", "draft")?;
    project.pebble(&["reset", "--to-head"]).assert_success()?;

    assert_eq!(project.read("a.txt").as_deref(), Some("committed"));
    assert!(!project.root().join("notes").exists());
    Ok(())
}

#[test]
fn test_clone_registered_project() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("src/lib.rs", "pub fn f() {}")?;
    project.write("README.md", "readme")?;
    project.commit("base")?;

    let dest = project.scratch().join("copy");
    project
        .pebble_in(project.scratch(), &["clone", "proj", "copy"])
        .assert_success()?;

    assert_eq!(fs::read_to_string(dest.join("README.md"))?, "readme");
    assert_eq!(fs::read_to_string(dest.join("src/lib.rs"))?, "pub fn f() {}");
    assert!(!dest.join(".pebble").exists());

    // A second clone into the same, now populated, directory is refused
    project
        .pebble_in(project.scratch(), &["clone", "proj", "copy"])
        .assert_failure()?;
    Ok(())
}

#[test]
fn test_clone_unknown_project_fails() -> Result<()> {
    let project = TestProject::new()?;
    let result = project
        .pebble_in(project.scratch(), &["clone", "ghost", "dest"])
        .assert_failure()?;
    assert!(result.contains_stderr("not registered"));
    Ok(())
}
